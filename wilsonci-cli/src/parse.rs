//! Parsing of ad-hoc key results given as `"Label=k/n"`.
use thiserror::Error;

/// A labelled count, e.g. `"Smartphone apps=28/42"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledCount {
    pub label: String,
    pub successes: u64,
    pub total: u64,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCountError {
    #[error("missing '=' in '{0}'. Expected format: Label=k/n")]
    MissingEquals(String),
    #[error("bad fraction '{fraction}' in '{input}'. Expected k/n like 28/42")]
    BadFraction { fraction: String, input: String },
    #[error("n must be > 0 in '{0}'")]
    ZeroTotal(String),
    #[error("k must be in [0,n] in '{0}'")]
    SuccessesExceedTotal(String),
}

/// Digits only; `str::parse::<u64>` alone would also take a leading '+'.
fn parse_count(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

/// Parse `Label=k/n` with flexible whitespace around `=` and `/`.
///
/// Only the first `=` separates label from fraction, so labels may not contain
/// one but fractions are free of it anyway. An empty label becomes `"k/n"`.
pub fn parse_labeled_count(input: &str) -> Result<LabeledCount, ParseCountError> {
    let s = input.trim();
    let (label, fraction) = s
        .split_once('=')
        .ok_or_else(|| ParseCountError::MissingEquals(s.to_string()))?;
    let label = label.trim();
    let fraction = fraction.trim();

    let bad_fraction = || ParseCountError::BadFraction {
        fraction: fraction.to_string(),
        input: s.to_string(),
    };
    let (k, n) = fraction.split_once('/').ok_or_else(bad_fraction)?;
    let successes = parse_count(k.trim()).ok_or_else(bad_fraction)?;
    let total = parse_count(n.trim()).ok_or_else(bad_fraction)?;

    if total == 0 {
        return Err(ParseCountError::ZeroTotal(s.to_string()));
    }
    if successes > total {
        return Err(ParseCountError::SuccessesExceedTotal(s.to_string()));
    }

    let label = if label.is_empty() {
        format!("{successes}/{total}")
    } else {
        label.to_string()
    };
    Ok(LabeledCount { label, successes, total })
}
