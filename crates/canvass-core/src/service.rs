//! Application service.
//!
//! `SurveyService` is what the CLI talks to. It holds one backend, chosen at
//! wiring time, and the caller's identity. Operations forward to the backend
//! after the caller-side checks: draft bodies are validated before a save,
//! the lifecycle and publish window before a status change, and answers
//! against their question types before a submission.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::answer::AnswerValue;
use crate::backend::SurveyBackend;
use crate::draft::SurveyDraft;
use crate::entities::{
    Answer, NewSurvey, Question, QuestionInput, ResponseSubmission, Survey, SurveyResponse,
    SurveyWithQuestions,
};
use crate::enums::SurveyStatus;
use crate::errors::{BackendError, ValidationError};
use crate::identity::AuthContext;
use crate::results::{SurveyResults, tally};
use crate::validation::{
    validate_publish_window, validate_question, validate_submission, validate_title,
    validate_window,
};

pub struct SurveyService {
    backend: Arc<dyn SurveyBackend>,
    auth: AuthContext,
}

impl SurveyService {
    #[must_use]
    pub fn new(backend: Arc<dyn SurveyBackend>, auth: AuthContext) -> Self {
        Self { backend, auth }
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    #[must_use]
    pub const fn auth(&self) -> &AuthContext {
        &self.auth
    }

    fn require_user(&self) -> Result<&str, BackendError> {
        self.auth
            .current_user_id()
            .ok_or_else(|| BackendError::Unauthorized("sign in required".into()))
    }

    /// Create an empty draft owned by the current user.
    ///
    /// # Errors
    ///
    /// `Unauthorized` when nobody is signed in, `ValidationFailed` for a
    /// blank title or inverted window, otherwise whatever the backend
    /// returns.
    pub async fn create_draft(&self, survey: NewSurvey) -> Result<String, BackendError> {
        let owner = self.require_user()?;
        let mut errors: Vec<ValidationError> = Vec::new();
        errors.extend(validate_title(&survey.title));
        errors.extend(validate_window(survey.starts_at, survey.ends_at));
        if !errors.is_empty() {
            return Err(errors.into());
        }
        let survey = NewSurvey {
            owner_id: owner.to_string(),
            ..survey
        };
        debug!(backend = self.backend.name(), title = %survey.title, "create draft");
        self.backend.create_draft(survey).await
    }

    pub async fn get(&self, survey_id: &str) -> Result<Survey, BackendError> {
        self.backend.get_by_id(survey_id).await
    }

    pub async fn get_with_questions(
        &self,
        survey_id: &str,
    ) -> Result<SurveyWithQuestions, BackendError> {
        self.backend.get_survey_with_questions(survey_id).await
    }

    /// Surveys owned by the current user.
    pub async fn list_mine(&self) -> Result<Vec<Survey>, BackendError> {
        let owner = self.require_user()?;
        self.backend.list_by_owner(owner).await
    }

    pub async fn list_questions(&self, survey_id: &str) -> Result<Vec<Question>, BackendError> {
        self.backend.list_questions(survey_id).await
    }

    /// Append a question after the survey's current last question.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` when the body is invalid, otherwise whatever the
    /// backend returns.
    pub async fn append_question(
        &self,
        survey_id: &str,
        question: QuestionInput,
    ) -> Result<String, BackendError> {
        let existing = self.backend.list_questions(survey_id).await?;
        let order = existing.iter().map(|q| q.order).max().map_or(0, |max| max + 1);
        let question = QuestionInput {
            id: None,
            order,
            ..question
        };
        let errors = validate_question(existing.len(), &question);
        if !errors.is_empty() {
            return Err(errors.into());
        }
        debug!(survey_id, order, kind = %question.kind, "append question");
        self.backend.add_question(survey_id, question).await
    }

    /// Load a stored survey into a draft for editing.
    pub async fn load_draft(&self, survey_id: &str) -> Result<SurveyDraft, BackendError> {
        let aggregate = self.backend.get_survey_with_questions(survey_id).await?;
        Ok(SurveyDraft::from_aggregate(&aggregate))
    }

    /// Save a draft as one atomic aggregate write.
    ///
    /// A draft that was never saved is created with all of its questions; a
    /// saved one is reconciled against the stored aggregate. Returned IDs are
    /// written back into `draft` only after the backend succeeds, so a
    /// failed save leaves the draft untouched.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` when the draft is invalid, otherwise whatever the
    /// backend returns.
    pub async fn save_draft(&self, draft: &mut SurveyDraft) -> Result<Vec<String>, BackendError> {
        let errors = draft.validate();
        if !errors.is_empty() {
            return Err(errors.into());
        }

        let (survey_id, question_ids) = match draft.survey_id.clone() {
            Some(survey_id) => {
                debug!(%survey_id, questions = draft.questions.len(), "reconcile draft");
                let ids = self
                    .backend
                    .update_survey_with_questions(
                        &survey_id,
                        draft.survey_update(),
                        draft.questions.clone(),
                    )
                    .await?;
                (survey_id, ids)
            }
            None => {
                let owner = self.require_user()?;
                debug!(questions = draft.questions.len(), "create draft aggregate");
                let created = self
                    .backend
                    .create_survey_with_questions(draft.new_survey(owner), draft.questions.clone())
                    .await?;
                (created.survey_id, created.question_ids)
            }
        };

        draft
            .apply_saved_ids(&survey_id, &question_ids)
            .map_err(|e| BackendError::BackendUnavailable(e.to_string()))?;
        Ok(question_ids)
    }

    /// Publish a survey. Window bounds not given fall back to the stored
    /// ones; the resulting window must be complete and not inverted.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` when the lifecycle forbids publishing, the window
    /// is incomplete or inverted, or the survey has no questions.
    pub async fn publish(
        &self,
        survey_id: &str,
        starts_at: Option<DateTime<Utc>>,
        ends_at: Option<DateTime<Utc>>,
    ) -> Result<(), BackendError> {
        let survey = self.backend.get_by_id(survey_id).await?;
        check_transition(&survey, SurveyStatus::Published)?;
        let (start, end) = validate_publish_window(
            starts_at.or(survey.starts_at),
            ends_at.or(survey.ends_at),
        )?;
        if self.backend.list_questions(survey_id).await?.is_empty() {
            return Err(BackendError::ValidationFailed(
                "a survey needs at least one question to be published".into(),
            ));
        }
        debug!(survey_id, %start, %end, "publish");
        self.backend.publish(survey_id, start, end).await
    }

    /// Stop accepting responses.
    pub async fn close(&self, survey_id: &str) -> Result<(), BackendError> {
        self.transition(survey_id, SurveyStatus::Closed).await
    }

    /// Take a published survey back to draft.
    pub async fn unpublish(&self, survey_id: &str) -> Result<(), BackendError> {
        self.transition(survey_id, SurveyStatus::Draft).await
    }

    async fn transition(&self, survey_id: &str, to: SurveyStatus) -> Result<(), BackendError> {
        let survey = self.backend.get_by_id(survey_id).await?;
        check_transition(&survey, to)?;
        debug!(survey_id, from = %survey.status, %to, "status transition");
        self.backend.update_status(survey_id, to).await
    }

    /// Write a status directly, without lifecycle checks.
    pub async fn update_status(
        &self,
        survey_id: &str,
        status: SurveyStatus,
    ) -> Result<(), BackendError> {
        self.backend.update_status(survey_id, status).await
    }

    pub async fn delete(&self, survey_id: &str) -> Result<(), BackendError> {
        debug!(survey_id, "delete survey");
        self.backend.delete_survey(survey_id).await
    }

    /// Submit typed answers.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` when the survey is not open or any answer does not
    /// fit its question, otherwise whatever the backend returns.
    pub async fn submit(
        &self,
        survey_id: &str,
        submission: ResponseSubmission,
    ) -> Result<String, BackendError> {
        let survey = self.backend.get_by_id(survey_id).await?;
        if !survey.is_open_at(Utc::now()) {
            return Err(BackendError::ValidationFailed(format!(
                "survey {survey_id} is not open for responses"
            )));
        }
        let questions = self.backend.list_questions(survey_id).await?;
        let errors = validate_submission(&questions, &submission);
        if !errors.is_empty() {
            return Err(errors.into());
        }
        debug!(survey_id, answers = submission.answers.len(), "submit response");
        self.backend.submit_response(survey_id, submission).await
    }

    /// Submit untyped answers, each decoded by its question's type.
    ///
    /// # Errors
    ///
    /// `ValidationFailed` when an answer references an unknown question or
    /// cannot be decoded, plus everything [`Self::submit`] returns.
    pub async fn submit_raw(
        &self,
        survey_id: &str,
        name: Option<String>,
        raw: &[(String, Value)],
    ) -> Result<String, BackendError> {
        let questions = self.backend.list_questions(survey_id).await?;
        let mut errors = Vec::new();
        let mut answers = Vec::with_capacity(raw.len());
        for (idx, (question_id, value)) in raw.iter().enumerate() {
            let field = format!("answers[{idx}]");
            let Some(question) = questions.iter().find(|q| &q.id == question_id) else {
                errors.push(ValidationError::new(
                    field,
                    format!("unknown question {question_id}"),
                ));
                continue;
            };
            match AnswerValue::decode(question.kind, value, &field) {
                Ok(value) => answers.push(Answer::new(question_id.clone(), value)),
                Err(error) => errors.push(error),
            }
        }
        if !errors.is_empty() {
            return Err(errors.into());
        }
        self.submit(survey_id, ResponseSubmission { name, answers })
            .await
    }

    pub async fn responses(&self, survey_id: &str) -> Result<Vec<SurveyResponse>, BackendError> {
        self.backend.list_responses(survey_id).await
    }

    /// Per-question summaries over every response.
    pub async fn results(&self, survey_id: &str) -> Result<SurveyResults, BackendError> {
        let questions = self.backend.list_questions(survey_id).await?;
        let responses = self.backend.list_responses(survey_id).await?;
        Ok(tally(survey_id, &questions, &responses))
    }
}

fn check_transition(survey: &Survey, to: SurveyStatus) -> Result<(), BackendError> {
    if survey.status.can_transition_to(to) {
        Ok(())
    } else {
        Err(BackendError::ValidationFailed(format!(
            "survey {} cannot move from {} to {to}",
            survey.id, survey.status
        )))
    }
}
