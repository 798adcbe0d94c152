//! Summary-statistics table: one row per (question, category) with its interval.
//!
//! One function, one options struct. Pure, like the rest of the crate; writing
//! the table out is the caller's job.
use crate::error::CiError;
use crate::tally::tally;
use crate::types::{CategoryCount, QuestionSchema, SummaryOptions, SummaryRow, SurveyResponseSet};
use crate::wilson::compute_interval;

/// Tally `responses` and attach a confidence interval to every category.
///
/// Aborts on the first statistic whose interval cannot be computed; the error
/// carries the offending counts and confidence level.
pub fn summarize(
    responses: &SurveyResponseSet,
    schema: &QuestionSchema,
    options: &SummaryOptions,
) -> Result<Vec<SummaryRow>, CiError> {
    let counts = tally(responses, schema)?;
    counts.iter().map(|count| summary_row(count, options)).collect()
}

/// Interval for a single tallied category.
pub fn summary_row(count: &CategoryCount, options: &SummaryOptions) -> Result<SummaryRow, CiError> {
    let ci = compute_interval(&count.estimate, options.confidence_level, options.method)?;
    Ok(SummaryRow {
        question_id: count.question_id.clone(),
        category: count.category.clone(),
        successes: count.estimate.numerator(),
        total: count.estimate.denominator(),
        point_estimate: count.estimate.point_estimate(),
        ci_lower: ci.lower_bound,
        ci_upper: ci.upper_bound,
        confidence_level: ci.confidence_level,
    })
}
