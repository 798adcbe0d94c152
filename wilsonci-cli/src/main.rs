mod config;
mod dataset;
mod output;
mod parse;

use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;
use wilsonci_core::{
    DEFAULT_CONFIDENCE_LEVEL, IntervalMethod, ProportionEstimate, SummaryOptions, SummaryRow, compute_interval,
    summarize,
};

use crate::output::{IntervalRow, Scale};

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "wilsonci", version, about = "Wilson score confidence intervals for survey proportions")]
struct Cli {
    /// Show progress on stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Compute intervals for key results given as "Label=k/n"
    Interval(IntervalArgs),
    /// Tally a response CSV and write the summary-statistics CSV
    Summarize(SummarizeArgs),
    /// Create a default config file at ~/.config/wilsonci/config.toml
    Init {
        /// Where to write the config instead of the default location
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

/// Flags shared by both computing subcommands.
#[derive(clap::Args)]
struct IntervalFlags {
    /// Confidence level, strictly between 0 and 1. Default: 0.95
    #[arg(long = "conf")]
    confidence_level: Option<f64>,

    /// Apply the continuity correction
    #[arg(long)]
    continuity_correction: bool,

    /// Path to config file (default: ~/.config/wilsonci/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct IntervalArgs {
    /// Key results as "Label=k/n" (e.g. "Smartphone apps=28/42")
    #[arg(required = true)]
    results: Vec<String>,

    #[command(flatten)]
    flags: IntervalFlags,

    /// Decimal digits for proportions and bounds. Default: 2
    #[arg(long)]
    digits: Option<usize>,

    /// Print proportion and interval as percentages (the default)
    #[arg(long, conflicts_with = "as_prop")]
    as_percent: bool,

    /// Print proportion and interval as proportions in [0,1]
    #[arg(long)]
    as_prop: bool,

    /// Output JSON instead of table
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct SummarizeArgs {
    /// Anonymized response CSV: one row per respondent, one column per question
    #[arg(long)]
    responses: PathBuf,

    /// File to write the summary to, as CSV or JSON (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    flags: IntervalFlags,

    /// Multi-select question column (repeatable)
    #[arg(long = "multi-select")]
    multi_select: Vec<String>,

    /// Character separating options in a multi-select cell. Default: ';'
    #[arg(long)]
    delimiter: Option<char>,

    /// Free-text question column, never tallied (repeatable)
    #[arg(long = "free-text")]
    free_text: Vec<String>,

    /// Non-question column such as a respondent id (repeatable)
    #[arg(long = "ignore")]
    ignore: Vec<String>,

    /// Write JSON instead of CSV
    #[arg(long)]
    json: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Interval(args) => run_interval(args),
        Commands::Summarize(args) => run_summarize(args),
        Commands::Init { config } => {
            let path = config.unwrap_or_else(default_config_path);
            config::create_default_config(&path).unwrap_or_else(|e| bail(e));
            println!("Created config at {}", path.display());
            println!("Edit it to set your default confidence level, column roles, etc.");
        }
    }
}

/// Confidence level and method after merging CLI flags over the config file.
fn resolve_options(flags: &IntervalFlags, cfg: &config::WilsonciConfig) -> SummaryOptions {
    let confidence_level = flags
        .confidence_level
        .or(cfg.confidence_level)
        .unwrap_or(DEFAULT_CONFIDENCE_LEVEL);
    if !(confidence_level > 0.0 && confidence_level < 1.0) {
        bail(format!("--conf must be strictly between 0 and 1, got {confidence_level}"));
    }

    let method = if flags.continuity_correction || cfg.continuity_correction.unwrap_or(false) {
        IntervalMethod::WilsonContinuityCorrected
    } else {
        IntervalMethod::Wilson
    };

    SummaryOptions { confidence_level, method }
}

fn default_config_path() -> PathBuf {
    config::default_config_path().unwrap_or_else(|| bail("Could not determine home directory (HOME is unset)"))
}

fn load_config(flags: &IntervalFlags) -> config::WilsonciConfig {
    let config_path = flags.config.clone().unwrap_or_else(default_config_path);
    debug!(path = %config_path.display(), "loading config");
    config::load_config(&config_path).unwrap_or_else(|e| bail(e))
}

fn run_interval(args: IntervalArgs) {
    let cfg = load_config(&args.flags);
    let options = resolve_options(&args.flags, &cfg);
    let digits = args.digits.or(cfg.digits).unwrap_or(2);
    let scale = if args.as_prop { Scale::Proportion } else { Scale::Percent };

    let mut rows = Vec::with_capacity(args.results.len());
    for raw in &args.results {
        let parsed = parse::parse_labeled_count(raw).unwrap_or_else(|e| bail(e));
        let estimate = ProportionEstimate::new(parsed.successes, parsed.total).unwrap_or_else(|e| bail(e));
        let ci = compute_interval(&estimate, options.confidence_level, options.method)
            .unwrap_or_else(|e| bail(format!("{}: {e}", parsed.label)));
        rows.push(IntervalRow::new(parsed.label, parsed.successes, parsed.total, &ci));
    }
    info!(results = rows.len(), method = ?options.method, "computed intervals");

    if args.json {
        output::print_json(&rows).unwrap_or_else(|e| bail(format!("Failed to encode JSON: {e}")));
    } else {
        output::print_table(&rows, options.confidence_level, scale, digits);
    }
}

fn run_summarize(args: SummarizeArgs) {
    let cfg = load_config(&args.flags);
    let options = resolve_options(&args.flags, &cfg);

    let roles = cfg.column_roles(&args.multi_select, &args.free_text, &args.ignore, args.delimiter);
    let schema = roles.to_schema();

    let responses = dataset::load_responses(&args.responses, &schema)
        .unwrap_or_else(|e| bail(format!("Failed to read responses {}: {e}", args.responses.display())));
    info!(
        respondents = responses.len(),
        questions = responses.question_ids().len(),
        path = %args.responses.display(),
        "loaded responses"
    );
    if responses.is_empty() {
        warn!("response file has no rows; summary will be empty");
    }

    for column in roles.missing_from(responses.question_ids()) {
        warn!(column, "configured column not present in response file");
    }

    let rows = summarize(&responses, &schema, &options).unwrap_or_else(|e| bail(e));
    info!(rows = rows.len(), "summary computed");

    match args.output {
        Some(ref path) => {
            let file = std::fs::File::create(path)
                .unwrap_or_else(|e| bail(format!("Failed to create {}: {e}", path.display())));
            write_summary(io::BufWriter::new(file), &rows, args.json, Some(path));
            info!(path = %path.display(), "wrote summary");
        }
        None => write_summary(io::stdout().lock(), &rows, args.json, None),
    }
}

fn write_summary<W: Write>(writer: W, rows: &[SummaryRow], json: bool, path: Option<&Path>) {
    let target = path.map_or_else(|| "summary".to_string(), |p| p.display().to_string());
    let result = if json {
        output::write_json(writer, rows).map_err(|e| e.to_string())
    } else {
        output::write_summary_csv(writer, rows).map_err(|e| e.to_string())
    };
    result.unwrap_or_else(|e| bail(format!("Failed to write {target}: {e}")));
}
