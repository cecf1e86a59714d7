//! The backend port.
//!
//! Every persistence backend (the embedded document store, the HTTP API)
//! implements [`SurveyBackend`] in full. The application picks one
//! implementation at wiring time and hands it to
//! [`SurveyService`](crate::SurveyService) as `Arc<dyn SurveyBackend>`.
//!
//! Access rules are the backend's job: each adapter knows who is calling and
//! answers [`BackendError::Unauthorized`] when the caller may not perform an
//! operation. Body validation is the caller's job; backends persist what
//! they are given.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    CreatedSurvey, NewSurvey, Question, QuestionInput, ResponseSubmission, Survey, SurveyResponse,
    SurveyWithQuestions,
};
use crate::enums::SurveyStatus;
use crate::errors::BackendError;
use crate::updates::SurveyUpdate;

#[async_trait]
pub trait SurveyBackend: Send + Sync {
    /// Short name for logs and `--verbose` output.
    fn name(&self) -> &'static str;

    /// Create a survey in `Draft` with no questions and return its ID.
    async fn create_draft(&self, survey: NewSurvey) -> Result<String, BackendError>;

    async fn get_by_id(&self, survey_id: &str) -> Result<Survey, BackendError>;

    /// Surveys owned by `owner_id`, most recently updated first.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Survey>, BackendError>;

    /// Add one question to an existing survey and return its ID.
    async fn add_question(
        &self,
        survey_id: &str,
        question: QuestionInput,
    ) -> Result<String, BackendError>;

    /// Set both window timestamps and move the survey to `Published`.
    async fn publish(
        &self,
        survey_id: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<(), BackendError>;

    /// Questions of a survey, `order` ascending.
    async fn list_questions(&self, survey_id: &str) -> Result<Vec<Question>, BackendError>;

    /// Store a response document and return its ID.
    async fn submit_response(
        &self,
        survey_id: &str,
        submission: ResponseSubmission,
    ) -> Result<String, BackendError>;

    /// Create a survey and all of its questions as one atomic unit. IDs on
    /// the inputs are ignored; every question becomes a new document.
    ///
    /// Returns the survey ID and the new question IDs in input order, so a
    /// caller never needs a second read to learn them.
    async fn create_survey_with_questions(
        &self,
        survey: NewSurvey,
        questions: Vec<QuestionInput>,
    ) -> Result<CreatedSurvey, BackendError>;

    /// The survey with its questions, `order` ascending.
    async fn get_survey_with_questions(
        &self,
        survey_id: &str,
    ) -> Result<SurveyWithQuestions, BackendError>;

    /// Reconcile the stored aggregate with `update` and `questions` as one
    /// atomic unit.
    ///
    /// The survey fields present in `update` are merged in. An input whose
    /// ID matches a stored question overwrites it; any other input becomes a
    /// new question. Stored questions no input kept are deleted, and
    /// `updated_at` is stamped. Returns the final question IDs in input
    /// order. On failure nothing is applied.
    ///
    /// There is no optimistic concurrency check: two reconciliations of the
    /// same survey race and the last commit wins.
    async fn update_survey_with_questions(
        &self,
        survey_id: &str,
        update: SurveyUpdate,
        questions: Vec<QuestionInput>,
    ) -> Result<Vec<String>, BackendError>;

    /// Write `status` and nothing else. No lifecycle or window checks.
    async fn update_status(&self, survey_id: &str, status: SurveyStatus)
    -> Result<(), BackendError>;

    /// Delete a survey together with its questions and responses.
    async fn delete_survey(&self, survey_id: &str) -> Result<(), BackendError>;

    /// Responses to a survey, oldest first.
    async fn list_responses(&self, survey_id: &str) -> Result<Vec<SurveyResponse>, BackendError>;
}
