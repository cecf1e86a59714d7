use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::QuestionType;

/// One stored prompt within a survey.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct Question {
    pub id: String,
    pub survey_id: String,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub title: String,
    pub text: Option<String>,
    pub options: Option<Vec<String>>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
    /// Display position within the survey. Unique per survey.
    pub order: i64,
}

impl Question {
    /// Effective numeric bounds for slider and star questions.
    ///
    /// Sliders default to `0..=100`, stars to `1..=5`.
    #[must_use]
    pub fn numeric_bounds(&self) -> (f64, f64) {
        let (default_min, default_max) = match self.kind {
            QuestionType::Star => (1.0, 5.0),
            _ => (0.0, 100.0),
        };
        (
            self.min.unwrap_or(default_min),
            self.max.unwrap_or(default_max),
        )
    }

    /// Option list, empty when unset.
    #[must_use]
    pub fn option_list(&self) -> &[String] {
        self.options.as_deref().unwrap_or_default()
    }

    /// Turn a stored question back into an input that keeps its ID.
    #[must_use]
    pub fn to_input(&self) -> QuestionInput {
        QuestionInput {
            id: Some(self.id.clone()),
            kind: self.kind,
            title: self.title.clone(),
            text: self.text.clone(),
            options: self.options.clone(),
            min: self.min,
            max: self.max,
            step: self.step,
            order: self.order,
        }
    }
}

/// A question body as held by the builder.
///
/// `id` is `None` for questions that were never saved. Reconciliation
/// overwrites the stored question with a matching ID and creates a new one
/// otherwise.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct QuestionInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub title: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub step: Option<f64>,
    #[serde(default)]
    pub order: i64,
}

impl QuestionInput {
    #[must_use]
    pub fn new(kind: QuestionType, title: impl Into<String>) -> Self {
        Self {
            id: None,
            kind,
            title: title.into(),
            text: None,
            options: None,
            min: None,
            max: None,
            step: None,
            order: 0,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub const fn with_range(mut self, min: f64, max: f64, step: Option<f64>) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self.step = step;
        self
    }

    #[must_use]
    pub const fn with_order(mut self, order: i64) -> Self {
        self.order = order;
        self
    }

    /// Materialize as a stored question under `id`.
    #[must_use]
    pub fn into_question(self, id: String, survey_id: &str) -> Question {
        Question {
            id,
            survey_id: survey_id.to_string(),
            kind: self.kind,
            title: self.title,
            text: self.text,
            options: self.options,
            min: self.min,
            max: self.max,
            step: self.step,
            order: self.order,
        }
    }
}
