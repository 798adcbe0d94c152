//! wilsonci-core: Wilson score confidence intervals for survey proportions.
//!
//! Response set → per-category counts → proportions with confidence intervals.
//! No IO, no filesystem: loading the CSV and writing the table belong to the caller.
//!
//! # Quick start
//!
//! ```rust
//! use wilsonci_core::{wilson_interval, DEFAULT_CONFIDENCE_LEVEL};
//!
//! // 28 of 42 respondents use a smartphone-based aid.
//! let ci = wilson_interval(28, 42, DEFAULT_CONFIDENCE_LEVEL).unwrap();
//! println!("[{:.1}%, {:.1}%]", ci.lower_bound * 100.0, ci.upper_bound * 100.0); // [51.6%, 79.0%]
//! ```

pub mod constants;
pub mod error;
pub mod summary;
pub mod tally;
pub mod types;
pub mod wilson;

// Re-export primary public API at crate root.
pub use constants::{DEFAULT_CONFIDENCE_LEVEL, DEFAULT_MULTI_SELECT_DELIMITER};
pub use error::CiError;
pub use summary::{summarize, summary_row};
pub use tally::tally;
pub use types::{
    AnswerValue, CategoryCount, ConfidenceInterval, IntervalMethod, ProportionEstimate, QuestionKind,
    QuestionSchema, ResponseRecord, SummaryOptions, SummaryRow, SurveyResponseSet,
};
pub use wilson::{
    compute_interval, normal_quantile, wilson_interval, wilson_interval_corrected, z_for_confidence,
};
