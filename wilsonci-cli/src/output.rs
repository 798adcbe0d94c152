//! Output formatting: terminal table, JSON and the summary CSV.
use serde::Serialize;
use std::io::Write;
use wilsonci_core::{ConfidenceInterval, SummaryRow};

/// One computed key result, ready to print.
#[derive(Debug, Clone, Serialize)]
pub struct IntervalRow {
    pub label: String,
    pub successes: u64,
    pub total: u64,
    pub point_estimate: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub confidence_level: f64,
}

impl IntervalRow {
    pub fn new(label: String, successes: u64, total: u64, ci: &ConfidenceInterval) -> Self {
        IntervalRow {
            label,
            successes,
            total,
            point_estimate: successes as f64 / total as f64,
            ci_lower: ci.lower_bound,
            ci_upper: ci.upper_bound,
            confidence_level: ci.confidence_level,
        }
    }
}

/// How proportions are shown in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    Percent,
    Proportion,
}

/// "95" for 0.95, "99.9" for 0.999.
fn level_label(confidence_level: f64) -> String {
    let pct = confidence_level * 100.0;
    if (pct - pct.round()).abs() < 1e-9 {
        format!("{}", pct.round() as i64)
    } else {
        format!("{}", (pct * 1e6).round() / 1e6)
    }
}

/// Render the fixed-width key-results table.
pub fn render_table(rows: &[IntervalRow], confidence_level: f64, scale: Scale, digits: usize) -> String {
    let level = level_label(confidence_level);
    let header = [
        "Label".to_string(),
        "k".to_string(),
        "n".to_string(),
        match scale {
            Scale::Percent => "%".to_string(),
            Scale::Proportion => "p_hat".to_string(),
        },
        format!("Wilson {level}% CI [low, high]"),
    ];

    let body: Vec<[String; 5]> = rows
        .iter()
        .map(|r| {
            let (p, ci) = match scale {
                Scale::Percent => (
                    format!("{:.digits$}", r.point_estimate * 100.0),
                    format!("[{:.digits$}%, {:.digits$}%]", r.ci_lower * 100.0, r.ci_upper * 100.0),
                ),
                Scale::Proportion => (
                    format!("{:.digits$}", r.point_estimate),
                    format!("[{:.digits$}, {:.digits$}]", r.ci_lower, r.ci_upper),
                ),
            };
            [r.label.clone(), r.successes.to_string(), r.total.to_string(), p, ci]
        })
        .collect();

    let mut widths = header.clone().map(|h| h.chars().count());
    for row in &body {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let render_row = |cells: &[String; 5]| -> String {
        let line: Vec<String> = cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, &w)| format!("{cell:<w$}"))
            .collect();
        line.join("  ").trim_end().to_string()
    };

    let mut out = String::new();
    out.push_str(&render_row(&header));
    out.push('\n');
    out.push_str(&render_row(&widths.map(|w| "-".repeat(w))));
    out.push('\n');
    for row in &body {
        out.push_str(&render_row(row));
        out.push('\n');
    }
    out
}

/// Print results as a formatted terminal table.
pub fn print_table(rows: &[IntervalRow], confidence_level: f64, scale: Scale, digits: usize) {
    print!("{}", render_table(rows, confidence_level, scale, digits));
}

/// Write `value` as pretty JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize + ?Sized>(mut writer: W, value: &T) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer).map_err(serde_json::Error::io)?;
    writer.flush().map_err(serde_json::Error::io)
}

/// Print results as JSON.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<()> {
    write_json(std::io::stdout().lock(), value)
}

/// Write the summary-statistics table as CSV, header row first.
pub fn write_summary_csv<W: Write>(writer: W, rows: &[SummaryRow]) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
