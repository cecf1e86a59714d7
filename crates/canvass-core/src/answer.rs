//! Typed answer values.
//!
//! Every question type has exactly one answer variant carrying only the value
//! that type produces. Raw JSON answers (from the CLI or a client) are
//! resolved by matching on the referenced question's type.
//!
//! Stored form is adjacently tagged: `{"type": "slider", "value": 42.0}`.

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::Question;
use crate::enums::QuestionType;
use crate::errors::ValidationError;

/// Floating-point slack when checking slider steps.
const STEP_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AnswerValue {
    #[serde(rename = "yesno")]
    YesNo(bool),
    /// Selected options, in the order the respondent picked them.
    Multiple(Vec<String>),
    Slider(f64),
    Star(f64),
    Date(NaiveDate),
    /// Every option, most preferred first.
    #[serde(rename = "dragdrop")]
    DragDrop(Vec<String>),
    Freitext(String),
    Radio(String),
}

impl AnswerValue {
    /// The question type this value answers.
    #[must_use]
    pub const fn question_type(&self) -> QuestionType {
        match self {
            Self::YesNo(_) => QuestionType::YesNo,
            Self::Multiple(_) => QuestionType::Multiple,
            Self::Slider(_) => QuestionType::Slider,
            Self::Star(_) => QuestionType::Star,
            Self::Date(_) => QuestionType::Date,
            Self::DragDrop(_) => QuestionType::DragDrop,
            Self::Freitext(_) => QuestionType::Freitext,
            Self::Radio(_) => QuestionType::Radio,
        }
    }

    /// Decode an untyped JSON answer for a question of type `kind`.
    ///
    /// Yes/no accepts a boolean or the strings `yes`/`no`. Numeric types
    /// accept numbers or numeric strings. List types accept an array of
    /// strings, or a single comma-separated string.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` on `field` if `raw` has the wrong shape
    /// for `kind`.
    pub fn decode(kind: QuestionType, raw: &Value, field: &str) -> Result<Self, ValidationError> {
        let shape_error = |expected: &str| {
            ValidationError::new(field, format!("expected {expected} for a {kind} question"))
        };

        match kind {
            QuestionType::YesNo => match raw {
                Value::Bool(b) => Ok(Self::YesNo(*b)),
                Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                    "yes" | "y" | "true" => Ok(Self::YesNo(true)),
                    "no" | "n" | "false" => Ok(Self::YesNo(false)),
                    _ => Err(shape_error("yes or no")),
                },
                _ => Err(shape_error("yes or no")),
            },
            QuestionType::Slider | QuestionType::Star => {
                let number = match raw {
                    Value::Number(n) => n.as_f64(),
                    Value::String(s) => s.trim().parse::<f64>().ok(),
                    _ => None,
                }
                .ok_or_else(|| shape_error("a number"))?;
                if kind == QuestionType::Slider {
                    Ok(Self::Slider(number))
                } else {
                    Ok(Self::Star(number))
                }
            }
            QuestionType::Date => {
                let s = raw.as_str().ok_or_else(|| shape_error("a YYYY-MM-DD date"))?;
                NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                    .map(Self::Date)
                    .map_err(|_| shape_error("a YYYY-MM-DD date"))
            }
            QuestionType::Freitext => raw
                .as_str()
                .map(|s| Self::Freitext(s.to_string()))
                .ok_or_else(|| shape_error("text")),
            QuestionType::Radio => raw
                .as_str()
                .map(|s| Self::Radio(s.to_string()))
                .ok_or_else(|| shape_error("one option")),
            QuestionType::Multiple | QuestionType::DragDrop => {
                let items = match raw {
                    Value::Array(items) => items
                        .iter()
                        .map(|item| item.as_str().map(String::from))
                        .collect::<Option<Vec<_>>>(),
                    Value::String(s) => Some(
                        s.split(',')
                            .map(str::trim)
                            .filter(|part| !part.is_empty())
                            .map(String::from)
                            .collect(),
                    ),
                    _ => None,
                }
                .ok_or_else(|| shape_error("a list of options"))?;
                if kind == QuestionType::Multiple {
                    Ok(Self::Multiple(items))
                } else {
                    Ok(Self::DragDrop(items))
                }
            }
        }
    }

    /// Check this value against the question it answers: matching type,
    /// option membership, and numeric range.
    ///
    /// # Errors
    ///
    /// Returns the first violated rule as a `ValidationError` on `field`.
    pub fn validate_for(&self, question: &Question, field: &str) -> Result<(), ValidationError> {
        if self.question_type() != question.kind {
            return Err(ValidationError::new(
                field,
                format!(
                    "{} answer given for a {} question",
                    self.question_type(),
                    question.kind
                ),
            ));
        }

        let options = question.option_list();
        match self {
            Self::YesNo(_) | Self::Date(_) => Ok(()),
            Self::Freitext(text) => {
                if text.trim().is_empty() {
                    Err(ValidationError::new(field, "answer must not be empty"))
                } else {
                    Ok(())
                }
            }
            Self::Radio(choice) => {
                if options.contains(choice) {
                    Ok(())
                } else {
                    Err(ValidationError::new(field, format!("'{choice}' is not an option")))
                }
            }
            Self::Multiple(choices) => {
                if choices.is_empty() {
                    return Err(ValidationError::new(field, "select at least one option"));
                }
                for (idx, choice) in choices.iter().enumerate() {
                    if !options.contains(choice) {
                        return Err(ValidationError::new(
                            field,
                            format!("'{choice}' is not an option"),
                        ));
                    }
                    if choices[..idx].contains(choice) {
                        return Err(ValidationError::new(
                            field,
                            format!("'{choice}' selected twice"),
                        ));
                    }
                }
                Ok(())
            }
            Self::DragDrop(ranking) => {
                let mut sorted_ranking = ranking.clone();
                sorted_ranking.sort();
                let mut sorted_options = options.to_vec();
                sorted_options.sort();
                if sorted_ranking == sorted_options {
                    Ok(())
                } else {
                    Err(ValidationError::new(
                        field,
                        "ranking must contain every option exactly once",
                    ))
                }
            }
            Self::Slider(value) | Self::Star(value) => validate_numeric(*value, question, field),
        }
    }

    /// The plain value without its type tag: a string, a number, or a list
    /// of strings.
    #[must_use]
    pub fn to_raw(&self) -> Value {
        match self {
            Self::YesNo(b) => Value::String(if *b { "yes" } else { "no" }.to_string()),
            Self::Slider(n) | Self::Star(n) => {
                serde_json::Number::from_f64(*n).map_or(Value::Null, Value::Number)
            }
            Self::Date(date) => Value::String(date.format("%Y-%m-%d").to_string()),
            Self::Freitext(s) | Self::Radio(s) => Value::String(s.clone()),
            Self::Multiple(items) | Self::DragDrop(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

fn validate_numeric(value: f64, question: &Question, field: &str) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::new(field, "answer must be a finite number"));
    }
    let (min, max) = question.numeric_bounds();
    if value < min || value > max {
        return Err(ValidationError::new(
            field,
            format!("{value} is outside {min}..={max}"),
        ));
    }
    if question.kind == QuestionType::Star && value.fract() != 0.0 {
        return Err(ValidationError::new(field, "star ratings are whole numbers"));
    }
    if let Some(step) = question.step.filter(|step| *step > 0.0) {
        let steps = (value - min) / step;
        if (steps - steps.round()).abs() > STEP_EPSILON {
            return Err(ValidationError::new(
                field,
                format!("{value} is not a multiple of step {step} from {min}"),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::QuestionInput;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn question(input: QuestionInput) -> Question {
        input.into_question("qst-00000001".into(), "srv-00000001")
    }

    #[test]
    fn stored_form_is_adjacently_tagged() {
        let value = AnswerValue::Slider(42.0);
        assert_eq!(
            serde_json::to_value(&value).unwrap(),
            json!({"type": "slider", "value": 42.0})
        );
        let back: AnswerValue =
            serde_json::from_value(json!({"type": "dragdrop", "value": ["b", "a"]})).unwrap();
        assert_eq!(back, AnswerValue::DragDrop(vec!["b".into(), "a".into()]));
    }

    #[test]
    fn decode_resolves_by_question_type() {
        assert_eq!(
            AnswerValue::decode(QuestionType::YesNo, &json!("Yes"), "a").unwrap(),
            AnswerValue::YesNo(true)
        );
        assert_eq!(
            AnswerValue::decode(QuestionType::Star, &json!("4"), "a").unwrap(),
            AnswerValue::Star(4.0)
        );
        assert_eq!(
            AnswerValue::decode(QuestionType::Multiple, &json!("red, blue"), "a").unwrap(),
            AnswerValue::Multiple(vec!["red".into(), "blue".into()])
        );
        assert_eq!(
            AnswerValue::decode(QuestionType::Date, &json!("2026-03-01"), "a").unwrap(),
            AnswerValue::Date(NaiveDate::from_ymd_opt(2026, 3, 1).unwrap())
        );
    }

    #[test]
    fn decode_rejects_wrong_shape() {
        let err = AnswerValue::decode(QuestionType::Slider, &json!(["x"]), "answers[0]").unwrap_err();
        assert_eq!(err.field, "answers[0]");
        assert!(AnswerValue::decode(QuestionType::Date, &json!("03/01/2026"), "a").is_err());
        assert!(AnswerValue::decode(QuestionType::Freitext, &json!(5), "a").is_err());
    }

    #[test]
    fn radio_must_pick_an_option() {
        let q = question(QuestionInput::new(QuestionType::Radio, "Pick").with_options(["a", "b"]));
        assert!(AnswerValue::Radio("a".into()).validate_for(&q, "x").is_ok());
        assert!(AnswerValue::Radio("c".into()).validate_for(&q, "x").is_err());
    }

    #[test]
    fn multiple_rejects_duplicates() {
        let q = question(QuestionInput::new(QuestionType::Multiple, "Pick").with_options(["a", "b"]));
        let err = AnswerValue::Multiple(vec!["a".into(), "a".into()])
            .validate_for(&q, "x")
            .unwrap_err();
        assert!(err.message.contains("twice"));
    }

    #[test]
    fn dragdrop_must_rank_every_option() {
        let q = question(QuestionInput::new(QuestionType::DragDrop, "Rank").with_options(["a", "b", "c"]));
        assert!(
            AnswerValue::DragDrop(vec!["c".into(), "a".into(), "b".into()])
                .validate_for(&q, "x")
                .is_ok()
        );
        assert!(
            AnswerValue::DragDrop(vec!["c".into(), "a".into()])
                .validate_for(&q, "x")
                .is_err()
        );
    }

    #[test]
    fn slider_respects_range_and_step() {
        let q = question(QuestionInput::new(QuestionType::Slider, "How much").with_range(0.0, 10.0, Some(2.5)));
        assert!(AnswerValue::Slider(7.5).validate_for(&q, "x").is_ok());
        assert!(AnswerValue::Slider(7.0).validate_for(&q, "x").is_err());
        assert!(AnswerValue::Slider(12.5).validate_for(&q, "x").is_err());
    }

    #[test]
    fn star_must_be_whole() {
        let q = question(QuestionInput::new(QuestionType::Star, "Rate"));
        assert!(AnswerValue::Star(5.0).validate_for(&q, "x").is_ok());
        assert!(AnswerValue::Star(3.5).validate_for(&q, "x").is_err());
        assert!(AnswerValue::Star(0.0).validate_for(&q, "x").is_err());
    }

    #[test]
    fn type_mismatch_is_rejected() {
        let q = question(QuestionInput::new(QuestionType::Freitext, "Say"));
        let err = AnswerValue::Star(3.0).validate_for(&q, "x").unwrap_err();
        assert!(err.message.contains("star answer given for a freitext question"));
    }

    #[test]
    fn raw_form_is_untagged() {
        assert_eq!(AnswerValue::YesNo(false).to_raw(), json!("no"));
        assert_eq!(AnswerValue::Star(3.0).to_raw(), json!(3.0));
        assert_eq!(
            AnswerValue::Multiple(vec!["a".into()]).to_raw(),
            json!(["a"])
        );
    }
}
