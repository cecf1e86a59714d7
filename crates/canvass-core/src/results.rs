//! Per-question result summaries over submitted responses.
//!
//! These are the numbers behind the results views: option counts, numeric
//! statistics, average ranks, and raw text values. Rendering is left to the
//! caller.

use std::collections::HashMap;

use serde::Serialize;

use crate::answer::AnswerValue;
use crate::entities::{Question, SurveyResponse};
use crate::enums::QuestionType;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyResults {
    pub survey_id: String,
    pub response_count: usize,
    pub questions: Vec<QuestionSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionSummary {
    pub question_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    /// Responses that answered this question.
    pub answered: usize,
    pub tally: Tally,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Tally {
    /// Yes/no, radio, and multiple choice. One entry per option in option
    /// order.
    Choices { counts: Vec<OptionCount> },
    /// Slider and star.
    Numeric {
        count: usize,
        mean: Option<f64>,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Drag-and-drop ranking, best average position first.
    Ranking { positions: Vec<RankPosition> },
    /// Free text and dates, in submission order.
    Values { values: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionCount {
    pub option: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankPosition {
    pub option: String,
    /// 1-based average rank.
    pub average_position: f64,
}

/// Summarize `responses` for the survey's `questions` (already in display
/// order).
#[must_use]
pub fn tally(survey_id: &str, questions: &[Question], responses: &[SurveyResponse]) -> SurveyResults {
    let summaries = questions
        .iter()
        .map(|question| {
            let values: Vec<&AnswerValue> = responses
                .iter()
                .filter_map(|response| response.answer_for(&question.id))
                .filter(|value| value.question_type() == question.kind)
                .collect();
            QuestionSummary {
                question_id: question.id.clone(),
                title: question.title.clone(),
                kind: question.kind,
                answered: values.len(),
                tally: tally_question(question, &values),
            }
        })
        .collect();

    SurveyResults {
        survey_id: survey_id.to_string(),
        response_count: responses.len(),
        questions: summaries,
    }
}

fn tally_question(question: &Question, values: &[&AnswerValue]) -> Tally {
    match question.kind {
        QuestionType::YesNo => {
            let yes = values
                .iter()
                .filter(|value| matches!(value, AnswerValue::YesNo(true)))
                .count();
            Tally::Choices {
                counts: vec![
                    OptionCount {
                        option: "yes".into(),
                        count: yes,
                    },
                    OptionCount {
                        option: "no".into(),
                        count: values.len() - yes,
                    },
                ],
            }
        }
        QuestionType::Radio | QuestionType::Multiple => {
            let mut counts: HashMap<&str, usize> = HashMap::new();
            for value in values {
                match value {
                    AnswerValue::Radio(choice) => *counts.entry(choice.as_str()).or_default() += 1,
                    AnswerValue::Multiple(choices) => {
                        for choice in choices {
                            *counts.entry(choice.as_str()).or_default() += 1;
                        }
                    }
                    _ => {}
                }
            }
            Tally::Choices {
                counts: question
                    .option_list()
                    .iter()
                    .map(|option| OptionCount {
                        option: option.clone(),
                        count: counts.get(option.as_str()).copied().unwrap_or(0),
                    })
                    .collect(),
            }
        }
        QuestionType::Slider | QuestionType::Star => {
            let numbers: Vec<f64> = values
                .iter()
                .filter_map(|value| match value {
                    AnswerValue::Slider(n) | AnswerValue::Star(n) => Some(*n),
                    _ => None,
                })
                .collect();
            let count = numbers.len();
            #[allow(clippy::cast_precision_loss)]
            let mean = (count > 0).then(|| numbers.iter().sum::<f64>() / count as f64);
            Tally::Numeric {
                count,
                mean,
                min: numbers.iter().copied().reduce(f64::min),
                max: numbers.iter().copied().reduce(f64::max),
            }
        }
        QuestionType::DragDrop => {
            let mut sums: HashMap<&str, (usize, usize)> = HashMap::new();
            for value in values {
                if let AnswerValue::DragDrop(ranking) = value {
                    for (idx, option) in ranking.iter().enumerate() {
                        let entry = sums.entry(option.as_str()).or_default();
                        entry.0 += idx + 1;
                        entry.1 += 1;
                    }
                }
            }
            #[allow(clippy::cast_precision_loss)]
            let mut positions: Vec<RankPosition> = question
                .option_list()
                .iter()
                .filter_map(|option| {
                    sums.get(option.as_str()).map(|(total, seen)| RankPosition {
                        option: option.clone(),
                        average_position: *total as f64 / *seen as f64,
                    })
                })
                .collect();
            positions.sort_by(|a, b| a.average_position.total_cmp(&b.average_position));
            Tally::Ranking { positions }
        }
        QuestionType::Freitext | QuestionType::Date => Tally::Values {
            values: values
                .iter()
                .filter_map(|value| match value.to_raw() {
                    serde_json::Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        },
    }
}
