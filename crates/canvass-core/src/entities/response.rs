use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::answer::AnswerValue;

/// One answered question inside a submitted response.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Answer {
    pub question_id: String,
    pub value: AnswerValue,
}

impl Answer {
    #[must_use]
    pub fn new(question_id: impl Into<String>, value: AnswerValue) -> Self {
        Self {
            question_id: question_id.into(),
            value,
        }
    }
}

/// What a respondent sends when filling in a survey.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ResponseSubmission {
    #[serde(default)]
    pub name: Option<String>,
    pub answers: Vec<Answer>,
}

/// A stored response document with its answers embedded.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SurveyResponse {
    pub id: String,
    pub survey_id: String,
    /// Opaque, pseudo-anonymous respondent reference.
    pub respondent_id: String,
    pub name: Option<String>,
    pub answers: Vec<Answer>,
    pub submitted_at: DateTime<Utc>,
}

/// Flattened view of a single answer with its provenance.
#[derive(Debug, Clone, Serialize, JsonSchema, PartialEq)]
pub struct AnswerRecord {
    /// `{response_id}/{index}`.
    pub id: String,
    pub question_id: String,
    pub respondent_id: String,
    pub value: AnswerValue,
    pub submitted_at: DateTime<Utc>,
}

impl SurveyResponse {
    /// One record per embedded answer, in submission order.
    #[must_use]
    pub fn answer_records(&self) -> Vec<AnswerRecord> {
        self.answers
            .iter()
            .enumerate()
            .map(|(idx, answer)| AnswerRecord {
                id: format!("{}/{idx}", self.id),
                question_id: answer.question_id.clone(),
                respondent_id: self.respondent_id.clone(),
                value: answer.value.clone(),
                submitted_at: self.submitted_at,
            })
            .collect()
    }

    /// The answer for `question_id`, if the respondent gave one.
    #[must_use]
    pub fn answer_for(&self, question_id: &str) -> Option<&AnswerValue> {
        self.answers
            .iter()
            .find(|answer| answer.question_id == question_id)
            .map(|answer| &answer.value)
    }
}
