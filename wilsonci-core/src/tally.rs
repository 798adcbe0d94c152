//! Counting respondents per (question, category).
use std::collections::HashMap;

use tracing::debug;

use crate::error::CiError;
use crate::types::{AnswerValue, CategoryCount, ProportionEstimate, QuestionSchema, SurveyResponseSet};

/// Count, for every tallied question, how many respondents chose each category.
///
/// The denominator of every estimate is the number of respondents who answered
/// the question at all. For multi-select questions a respondent counts once per
/// selected option, so a question's numerators may sum past its denominator.
///
/// Questions are visited in column order, categories in first-seen order.
/// Questions nobody answered produce no entries.
pub fn tally(responses: &SurveyResponseSet, schema: &QuestionSchema) -> Result<Vec<CategoryCount>, CiError> {
    let mut out = Vec::new();

    for question_id in responses.question_ids() {
        if !schema.kind_of(question_id).is_tallied() {
            continue;
        }

        let mut valid: u64 = 0;
        let mut order: Vec<&str> = Vec::new();
        let mut counts: HashMap<&str, u64> = HashMap::new();

        for record in responses.records() {
            let selected: Vec<&str> = match record.answer(question_id) {
                AnswerValue::Categorical(value) => vec![value.as_str()],
                // Records built without `QuestionKind::interpret` may repeat an option.
                AnswerValue::MultiSelect(values) => {
                    let mut seen: Vec<&str> = Vec::with_capacity(values.len());
                    for v in values {
                        if !seen.contains(&v.as_str()) {
                            seen.push(v.as_str());
                        }
                    }
                    seen
                }
                AnswerValue::FreeText(_) | AnswerValue::Missing => continue,
            };

            valid += 1;
            for category in selected {
                let count = counts.entry(category).or_insert_with(|| {
                    order.push(category);
                    0
                });
                *count += 1;
            }
        }

        if valid == 0 {
            debug!(question_id = %question_id, "no valid responses, skipping");
            continue;
        }
        debug!(question_id = %question_id, valid, categories = order.len(), "tallied question");

        for category in order {
            let estimate = ProportionEstimate::new(counts[category], valid)?;
            out.push(CategoryCount {
                question_id: question_id.clone(),
                category: category.to_string(),
                estimate,
            });
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{QuestionKind, ResponseRecord};

    fn record(cells: &[(&str, &str)], schema: &QuestionSchema) -> ResponseRecord {
        cells
            .iter()
            .map(|(q, raw)| (q.to_string(), schema.kind_of(q).interpret(raw)))
            .collect()
    }

    fn survey(schema: &QuestionSchema) -> SurveyResponseSet {
        let questions = ["id", "Q6", "Q14", "comments"].iter().map(|s| s.to_string()).collect();
        let rows = [
            [("id", "1"), ("Q6", "Smartphone"), ("Q14", "Speech;Tactile"), ("comments", "too heavy")],
            [("id", "2"), ("Q6", "None"), ("Q14", "Speech"), ("comments", "")],
            [("id", "3"), ("Q6", "Smartphone"), ("Q14", ""), ("comments", "")],
            [("id", "4"), ("Q6", ""), ("Q14", "Multimodal; Speech ;Speech"), ("comments", "ok")],
        ];
        let records = rows.iter().map(|r| record(r, schema)).collect();
        SurveyResponseSet::new(questions, records)
    }

    fn schema() -> QuestionSchema {
        QuestionSchema::new()
            .with("id", QuestionKind::Ignored)
            .with("Q14", QuestionKind::multi_select())
            .with("comments", QuestionKind::FreeText)
    }

    fn find<'a>(counts: &'a [CategoryCount], q: &str, c: &str) -> &'a CategoryCount {
        counts
            .iter()
            .find(|cc| cc.question_id == q && cc.category == c)
            .unwrap_or_else(|| panic!("missing {q}/{c}"))
    }

    #[test]
    fn test_categorical_excludes_missing_from_denominator() {
        let schema = schema();
        let counts = tally(&survey(&schema), &schema).unwrap();

        let smartphone = find(&counts, "Q6", "Smartphone");
        assert_eq!(smartphone.estimate.numerator(), 2);
        assert_eq!(smartphone.estimate.denominator(), 3);

        let none = find(&counts, "Q6", "None");
        assert_eq!(none.estimate.numerator(), 1);
        assert_eq!(none.estimate.denominator(), 3);
    }

    #[test]
    fn test_multi_select_counts_each_respondent_once() {
        let schema = schema();
        let counts = tally(&survey(&schema), &schema).unwrap();

        let speech = find(&counts, "Q14", "Speech");
        assert_eq!(speech.estimate.numerator(), 3);
        assert_eq!(speech.estimate.denominator(), 3);
        assert_eq!(find(&counts, "Q14", "Tactile").estimate.numerator(), 1);
        assert_eq!(find(&counts, "Q14", "Multimodal").estimate.numerator(), 1);
    }

    #[test]
    fn test_repeated_option_in_hand_built_record_counts_once() {
        let schema = schema();
        let repeated = AnswerValue::MultiSelect(vec!["Speech".to_string(), "Speech".to_string()]);
        let records = vec![[("Q14".to_string(), repeated)].into_iter().collect::<ResponseRecord>()];
        let responses = SurveyResponseSet::new(vec!["Q14".to_string()], records);

        let counts = tally(&responses, &schema).unwrap();
        assert_eq!(counts.len(), 1);
        assert_eq!(counts[0].estimate.numerator(), 1);
        assert_eq!(counts[0].estimate.denominator(), 1);
    }

    #[test]
    fn test_skips_free_text_and_ignored_columns() {
        let schema = schema();
        let counts = tally(&survey(&schema), &schema).unwrap();
        assert!(counts.iter().all(|c| c.question_id != "id" && c.question_id != "comments"));
    }

    #[test]
    fn test_order_is_column_then_first_seen() {
        let schema = schema();
        let counts = tally(&survey(&schema), &schema).unwrap();
        let keys: Vec<(&str, &str)> = counts
            .iter()
            .map(|c| (c.question_id.as_str(), c.category.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("Q6", "Smartphone"),
                ("Q6", "None"),
                ("Q14", "Speech"),
                ("Q14", "Tactile"),
                ("Q14", "Multimodal"),
            ]
        );
    }

    #[test]
    fn test_unanswered_question_produces_nothing() {
        let schema = QuestionSchema::new();
        let questions = vec!["Q1".to_string()];
        let records = vec![record(&[("Q1", " ")], &schema), ResponseRecord::default()];
        let counts = tally(&SurveyResponseSet::new(questions, records), &schema).unwrap();
        assert!(counts.is_empty());
    }
}
