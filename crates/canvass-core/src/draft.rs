//! In-memory survey draft held by the builder.
//!
//! The draft owns the ordered question list. Every structural edit rewrites
//! `order` as `0..N-1`, so the persisted order always matches list position.
//! Saved IDs are applied only after the backend confirms a save; a failed
//! save leaves the draft exactly as it was.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{NewSurvey, QuestionInput, SurveyWithQuestions};
use crate::errors::ValidationError;
use crate::updates::{SurveyUpdate, SurveyUpdateBuilder};
use crate::validation::{validate_questions, validate_title, validate_window};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurveyDraft {
    /// `None` until the first successful save.
    #[serde(default)]
    pub survey_id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub questions: Vec<QuestionInput>,
}

impl SurveyDraft {
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Load a stored aggregate for re-editing.
    #[must_use]
    pub fn from_aggregate(aggregate: &SurveyWithQuestions) -> Self {
        let survey = &aggregate.survey;
        let mut draft = Self {
            survey_id: Some(survey.id.clone()),
            title: survey.title.clone(),
            description: survey.description.clone(),
            starts_at: survey.starts_at,
            ends_at: survey.ends_at,
            questions: aggregate.questions.iter().map(|q| q.to_input()).collect(),
        };
        draft.renumber();
        draft
    }

    /// Append a question and return its index.
    pub fn add_question(&mut self, question: QuestionInput) -> usize {
        self.questions.push(question);
        self.renumber();
        self.questions.len() - 1
    }

    /// Insert a question at `index` (clamped to the end).
    pub fn insert_question(&mut self, index: usize, question: QuestionInput) -> usize {
        let index = index.min(self.questions.len());
        self.questions.insert(index, question);
        self.renumber();
        index
    }

    pub fn remove_question(&mut self, index: usize) -> Option<QuestionInput> {
        if index >= self.questions.len() {
            return None;
        }
        let removed = self.questions.remove(index);
        self.renumber();
        Some(removed)
    }

    /// Drag the question at `from` to position `to`. Returns `false` when
    /// either index is out of range.
    pub fn move_question(&mut self, from: usize, to: usize) -> bool {
        let len = self.questions.len();
        if from >= len || to >= len {
            return false;
        }
        let question = self.questions.remove(from);
        self.questions.insert(to, question);
        self.renumber();
        true
    }

    /// Rewrite `order` as list position.
    pub fn renumber(&mut self) {
        for (position, question) in self.questions.iter_mut().enumerate() {
            question.order = i64::try_from(position).unwrap_or(i64::MAX);
        }
    }

    /// Everything wrong with the draft as it stands.
    #[must_use]
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        errors.extend(validate_title(&self.title));
        errors.extend(validate_window(self.starts_at, self.ends_at));
        errors.extend(validate_questions(&self.questions));
        errors
    }

    /// Body for a first-time create.
    #[must_use]
    pub fn new_survey(&self, owner_id: &str) -> NewSurvey {
        NewSurvey {
            owner_id: owner_id.to_string(),
            title: self.title.clone(),
            description: self.description.clone(),
            starts_at: self.starts_at,
            ends_at: self.ends_at,
        }
    }

    /// Body for a save of an existing survey. Every editable field is set,
    /// so the stored survey ends up matching the draft.
    #[must_use]
    pub fn survey_update(&self) -> SurveyUpdate {
        SurveyUpdateBuilder::new()
            .title(self.title.clone())
            .description(self.description.clone())
            .starts_at(self.starts_at)
            .ends_at(self.ends_at)
            .build()
    }

    /// Record the IDs a save returned, in question order.
    ///
    /// # Errors
    ///
    /// Returns a `ValidationError` and leaves the draft untouched when the
    /// number of IDs does not match the number of questions.
    pub fn apply_saved_ids(
        &mut self,
        survey_id: &str,
        question_ids: &[String],
    ) -> Result<(), ValidationError> {
        if question_ids.len() != self.questions.len() {
            return Err(ValidationError::new(
                "questions",
                format!(
                    "save returned {} ids for {} questions",
                    question_ids.len(),
                    self.questions.len()
                ),
            ));
        }
        self.survey_id = Some(survey_id.to_string());
        for (question, id) in self.questions.iter_mut().zip(question_ids) {
            question.id = Some(id.clone());
        }
        Ok(())
    }
}
