//! Error type for the interval calculator.
use thiserror::Error;

/// The only failure mode of this crate: a precondition on the inputs was violated.
///
/// Carries the offending values so a report generator can surface exactly
/// which statistic could not be computed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CiError {
    #[error(
        "invalid input: {reason} (successes={successes}, total={total}{})",
        level_suffix(.confidence_level)
    )]
    InvalidInput {
        reason: &'static str,
        successes: u64,
        total: u64,
        /// `None` when the failing check ran before a confidence level was involved.
        confidence_level: Option<f64>,
    },
}

fn level_suffix(level: &Option<f64>) -> String {
    match level {
        Some(l) => format!(", confidence_level={l}"),
        None => String::new(),
    }
}

impl CiError {
    pub(crate) fn counts(reason: &'static str, successes: u64, total: u64) -> Self {
        CiError::InvalidInput { reason, successes, total, confidence_level: None }
    }

    pub(crate) fn level(reason: &'static str, successes: u64, total: u64, confidence_level: f64) -> Self {
        CiError::InvalidInput { reason, successes, total, confidence_level: Some(confidence_level) }
    }
}
