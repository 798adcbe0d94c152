use std::collections::HashMap;

use crate::constants::DEFAULT_MULTI_SELECT_DELIMITER;
use crate::error::CiError;

/// Observed proportion: how many of the valid respondents picked a category.
///
/// Construction enforces `0 <= numerator <= denominator` and `denominator > 0`,
/// so `point_estimate()` is always defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ProportionEstimate {
    numerator: u64,
    denominator: u64,
}

impl ProportionEstimate {
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, CiError> {
        if denominator == 0 {
            return Err(CiError::counts("total must be greater than zero", numerator, denominator));
        }
        if numerator > denominator {
            return Err(CiError::counts("successes exceeds total", numerator, denominator));
        }
        Ok(ProportionEstimate { numerator, denominator })
    }

    pub fn numerator(&self) -> u64 {
        self.numerator
    }

    pub fn denominator(&self) -> u64 {
        self.denominator
    }

    /// `numerator / denominator`.
    pub fn point_estimate(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

/// A two-sided interval for a binomial proportion.
///
/// Invariant: `0 <= lower_bound <= point_estimate <= upper_bound <= 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConfidenceInterval {
    pub lower_bound: f64,
    pub upper_bound: f64,
    /// Target coverage, e.g. 0.95.
    pub confidence_level: f64,
}

impl ConfidenceInterval {
    pub fn width(&self) -> f64 {
        self.upper_bound - self.lower_bound
    }

    pub fn contains(&self, p: f64) -> bool {
        self.lower_bound <= p && p <= self.upper_bound
    }
}

/// Which interval formula to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum IntervalMethod {
    /// Plain Wilson score interval.
    #[default]
    Wilson,
    /// Wilson with Yates-style continuity correction (Newcombe 1998, method 4).
    WilsonContinuityCorrected,
}

/// One respondent's answer to one question.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnswerValue {
    Categorical(String),
    MultiSelect(Vec<String>),
    FreeText(String),
    Missing,
}

impl AnswerValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, AnswerValue::Missing)
    }
}

/// How a question's raw answer cells should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Categorical,
    MultiSelect { delimiter: char },
    FreeText,
    /// Respondent IDs, timestamps and other columns that are not questions.
    Ignored,
}

impl QuestionKind {
    pub fn multi_select() -> Self {
        QuestionKind::MultiSelect { delimiter: DEFAULT_MULTI_SELECT_DELIMITER }
    }

    /// Whether proportions are reported for this kind of question.
    pub fn is_tallied(&self) -> bool {
        matches!(self, QuestionKind::Categorical | QuestionKind::MultiSelect { .. })
    }

    /// Turn a raw cell into an answer. Blank cells are `Missing` for every kind.
    pub fn interpret(&self, raw: &str) -> AnswerValue {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return AnswerValue::Missing;
        }
        match self {
            QuestionKind::Categorical => AnswerValue::Categorical(trimmed.to_string()),
            QuestionKind::MultiSelect { delimiter } => {
                let mut options: Vec<String> = Vec::new();
                for part in trimmed.split(*delimiter) {
                    let part = part.trim();
                    if !part.is_empty() && !options.iter().any(|o| o == part) {
                        options.push(part.to_string());
                    }
                }
                if options.is_empty() {
                    AnswerValue::Missing
                } else {
                    AnswerValue::MultiSelect(options)
                }
            }
            QuestionKind::FreeText | QuestionKind::Ignored => AnswerValue::FreeText(trimmed.to_string()),
        }
    }
}

/// Per-question interpretation. Questions not listed are categorical.
#[derive(Debug, Clone, Default)]
pub struct QuestionSchema {
    kinds: HashMap<String, QuestionKind>,
}

impl QuestionSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, question_id: impl Into<String>, kind: QuestionKind) -> Self {
        self.set(question_id, kind);
        self
    }

    pub fn set(&mut self, question_id: impl Into<String>, kind: QuestionKind) {
        self.kinds.insert(question_id.into(), kind);
    }

    pub fn kind_of(&self, question_id: &str) -> QuestionKind {
        self.kinds.get(question_id).copied().unwrap_or(QuestionKind::Categorical)
    }
}

static MISSING: AnswerValue = AnswerValue::Missing;

/// One anonymized respondent: question id → answer.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResponseRecord {
    answers: HashMap<String, AnswerValue>,
}

impl ResponseRecord {
    /// Unknown questions read as `Missing`.
    pub fn answer(&self, question_id: &str) -> &AnswerValue {
        self.answers.get(question_id).unwrap_or(&MISSING)
    }
}

impl FromIterator<(String, AnswerValue)> for ResponseRecord {
    fn from_iter<I: IntoIterator<Item = (String, AnswerValue)>>(iter: I) -> Self {
        ResponseRecord { answers: iter.into_iter().collect() }
    }
}

/// The loaded survey: ordered questions and ordered respondents.
///
/// Immutable once built; there is no API to add or edit records.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurveyResponseSet {
    question_ids: Vec<String>,
    records: Vec<ResponseRecord>,
}

impl SurveyResponseSet {
    pub fn new(question_ids: Vec<String>, records: Vec<ResponseRecord>) -> Self {
        SurveyResponseSet { question_ids, records }
    }

    /// Question ids in source column order.
    pub fn question_ids(&self) -> &[String] {
        &self.question_ids
    }

    pub fn records(&self) -> &[ResponseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A category's estimate, labelled with where it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCount {
    pub question_id: String,
    pub category: String,
    pub estimate: ProportionEstimate,
}

/// Options for `summarize()`.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummaryOptions {
    pub confidence_level: f64,
    pub method: IntervalMethod,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        SummaryOptions {
            confidence_level: crate::constants::DEFAULT_CONFIDENCE_LEVEL,
            method: IntervalMethod::Wilson,
        }
    }
}

/// One line of the processed summary-statistics table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SummaryRow {
    pub question_id: String,
    pub category: String,
    pub successes: u64,
    pub total: u64,
    pub point_estimate: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub confidence_level: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proportion_rejects_zero_total() {
        let err = ProportionEstimate::new(5, 0).unwrap_err();
        assert!(matches!(err, CiError::InvalidInput { successes: 5, total: 0, .. }));
    }

    #[test]
    fn test_proportion_rejects_numerator_above_denominator() {
        assert!(ProportionEstimate::new(43, 42).is_err());
        assert!(ProportionEstimate::new(42, 42).is_ok());
        assert!(ProportionEstimate::new(0, 42).is_ok());
    }

    #[test]
    fn test_point_estimate() {
        let p = ProportionEstimate::new(21, 42).unwrap();
        assert_eq!(p.point_estimate(), 0.5);
        assert_eq!(p.numerator(), 21);
        assert_eq!(p.denominator(), 42);
    }

    #[test]
    fn test_interpret_blank_is_missing() {
        assert_eq!(QuestionKind::Categorical.interpret("   "), AnswerValue::Missing);
        assert_eq!(QuestionKind::multi_select().interpret(""), AnswerValue::Missing);
        assert_eq!(QuestionKind::multi_select().interpret(" ; ;"), AnswerValue::Missing);
    }

    #[test]
    fn test_interpret_multi_select_dedupes_and_trims() {
        let answer = QuestionKind::multi_select().interpret("Speech ; Tactile;Speech;");
        assert_eq!(
            answer,
            AnswerValue::MultiSelect(vec!["Speech".to_string(), "Tactile".to_string()])
        );

        let answer = QuestionKind::MultiSelect { delimiter: '|' }.interpret("a|b");
        assert_eq!(answer, AnswerValue::MultiSelect(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn test_schema_defaults_to_categorical() {
        let schema = QuestionSchema::new()
            .with("Q14", QuestionKind::multi_select())
            .with("comments", QuestionKind::FreeText);
        assert_eq!(schema.kind_of("Q6"), QuestionKind::Categorical);
        assert_eq!(schema.kind_of("Q14"), QuestionKind::multi_select());
        assert!(!schema.kind_of("comments").is_tallied());
    }

    #[test]
    fn test_record_unknown_question_is_missing() {
        let record: ResponseRecord = [("Q6".to_string(), AnswerValue::Categorical("Yes".to_string()))]
            .into_iter()
            .collect();
        assert!(record.answer("Q7").is_missing());
        assert_eq!(record.answer("Q6"), &AnswerValue::Categorical("Yes".to_string()));
    }
}
