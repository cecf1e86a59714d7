//! # canvass-http
//!
//! REST client implementing [`SurveyBackend`] against a remote canvass API.
//!
//! The remote service owns persistence, access control, and the atomicity
//! of aggregate writes; this crate maps each port operation to one request,
//! sends the configured bearer token, and translates statuses into
//! [`BackendError`] kinds. Bodies are camelCase JSON (see [`dto`]).
//!
//! | Operation | Request |
//! |---|---|
//! | `create_draft` | `POST /surveys` |
//! | `get_by_id` | `GET /surveys/{id}` |
//! | `list_by_owner` | `GET /surveys?ownerId=` |
//! | `add_question` | `POST /surveys/{id}/questions` |
//! | `publish` | `POST /surveys/{id}/publish` |
//! | `list_questions` | `GET /surveys/{id}/questions` |
//! | `submit_response` | `POST /surveys/{id}/responses` |
//! | `create_survey_with_questions` | `POST /surveys/aggregate` (replies `{id, questionIds}`) |
//! | `get_survey_with_questions` | `GET /surveys/{id}/aggregate` |
//! | `update_survey_with_questions` | `PUT /surveys/{id}/aggregate` |
//! | `update_status` | `PATCH /surveys/{id}/status` |
//! | `delete_survey` | `DELETE /surveys/{id}` |
//! | `list_responses` | `GET /surveys/{id}/responses` |

pub mod dto;
mod error;
mod http;

use std::time::Duration;

use async_trait::async_trait;
use canvass_core::entities::{
    CreatedSurvey, NewSurvey, Question, QuestionInput, ResponseSubmission, Survey, SurveyResponse,
    SurveyWithQuestions,
};
use canvass_core::enums::SurveyStatus;
use canvass_core::updates::SurveyUpdate;
use canvass_core::{BackendError, SurveyBackend};
use chrono::{DateTime, Utc};
use reqwest::Method;

pub use error::HttpBackendError;

use crate::http::{check_response, read_json};
use dto::{
    AggregateDto, CreateAggregateBody, CreatedAggregateResponse, IdResponse, NewSurveyDto, PublishBody, QuestionDto,
    QuestionIdsResponse, QuestionInputDto, ResponseDto, StatusBody, SubmissionBody, SurveyDto,
    UpdateAggregateBody,
};

// ── Client ─────────────────────────────────────────────────────────

/// HTTP adapter for the survey backend port.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpBackend {
    /// Build a client for `base_url`. A trailing slash is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`HttpBackendError::Http`] if the underlying client fails to
    /// build (e.g. TLS backend initialisation).
    pub fn new(
        base_url: &str,
        token: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, HttpBackendError> {
        let http = reqwest::Client::builder()
            .user_agent("canvass/0.1")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(str::to_string),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, HttpBackendError> {
        check_response(builder.send().await?).await
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
    ) -> Result<T, HttpBackendError> {
        read_json(self.send(builder).await?).await
    }
}

fn survey_path(survey_id: &str) -> String {
    format!("/surveys/{}", urlencoding::encode(survey_id))
}

// ── Port ───────────────────────────────────────────────────────────

#[async_trait]
impl SurveyBackend for HttpBackend {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn create_draft(&self, survey: NewSurvey) -> Result<String, BackendError> {
        let body = NewSurveyDto::from(survey);
        let created: IdResponse = self
            .fetch(self.request(Method::POST, "/surveys").json(&body))
            .await?;
        tracing::debug!(id = %created.id, "created draft over http");
        Ok(created.id)
    }

    async fn get_by_id(&self, survey_id: &str) -> Result<Survey, BackendError> {
        let path = survey_path(survey_id);
        let survey: SurveyDto = self
            .fetch(self.request(Method::GET, &path))
            .await
            .map_err(|e| e.for_survey(survey_id))?;
        Ok(survey.into())
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Survey>, BackendError> {
        let path = format!("/surveys?ownerId={}", urlencoding::encode(owner_id));
        let surveys: Vec<SurveyDto> = self.fetch(self.request(Method::GET, &path)).await?;
        Ok(surveys.into_iter().map(Into::into).collect())
    }

    async fn add_question(
        &self,
        survey_id: &str,
        question: QuestionInput,
    ) -> Result<String, BackendError> {
        let path = format!("{}/questions", survey_path(survey_id));
        let body = QuestionInputDto::from(question).without_id();
        let created: IdResponse = self
            .fetch(self.request(Method::POST, &path).json(&body))
            .await
            .map_err(|e| e.for_survey(survey_id))?;
        Ok(created.id)
    }

    async fn publish(
        &self,
        survey_id: &str,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    ) -> Result<(), BackendError> {
        let path = format!("{}/publish", survey_path(survey_id));
        let body = PublishBody { starts_at, ends_at };
        self.send(self.request(Method::POST, &path).json(&body))
            .await
            .map_err(|e| e.for_survey(survey_id))?;
        Ok(())
    }

    async fn list_questions(&self, survey_id: &str) -> Result<Vec<Question>, BackendError> {
        let path = format!("{}/questions", survey_path(survey_id));
        let questions: Vec<QuestionDto> = self
            .fetch(self.request(Method::GET, &path))
            .await
            .map_err(|e| e.for_survey(survey_id))?;
        let mut questions: Vec<Question> = questions.into_iter().map(Into::into).collect();
        questions.sort_by_key(|q| q.order);
        Ok(questions)
    }

    async fn submit_response(
        &self,
        survey_id: &str,
        submission: ResponseSubmission,
    ) -> Result<String, BackendError> {
        let path = format!("{}/responses", survey_path(survey_id));
        let body = SubmissionBody::from(submission);
        let created: IdResponse = self
            .fetch(self.request(Method::POST, &path).json(&body))
            .await
            .map_err(|e| e.for_survey(survey_id))?;
        Ok(created.id)
    }

    async fn create_survey_with_questions(
        &self,
        survey: NewSurvey,
        questions: Vec<QuestionInput>,
    ) -> Result<CreatedSurvey, BackendError> {
        let count = questions.len();
        let body = CreateAggregateBody {
            survey: survey.into(),
            questions: questions
                .into_iter()
                .map(|q| QuestionInputDto::from(q).without_id())
                .collect(),
        };
        let created: CreatedAggregateResponse = self
            .fetch(self.request(Method::POST, "/surveys/aggregate").json(&body))
            .await?;
        tracing::debug!(id = %created.id, questions = count, "created aggregate over http");
        Ok(created.into())
    }

    async fn get_survey_with_questions(
        &self,
        survey_id: &str,
    ) -> Result<SurveyWithQuestions, BackendError> {
        let path = format!("{}/aggregate", survey_path(survey_id));
        let aggregate: AggregateDto = self
            .fetch(self.request(Method::GET, &path))
            .await
            .map_err(|e| e.for_survey(survey_id))?;
        let mut aggregate = SurveyWithQuestions::from(aggregate);
        aggregate.questions.sort_by_key(|q| q.order);
        Ok(aggregate)
    }

    async fn update_survey_with_questions(
        &self,
        survey_id: &str,
        update: SurveyUpdate,
        questions: Vec<QuestionInput>,
    ) -> Result<Vec<String>, BackendError> {
        let path = format!("{}/aggregate", survey_path(survey_id));
        let body = UpdateAggregateBody {
            survey: update.into(),
            questions: questions.into_iter().map(Into::into).collect(),
        };
        let saved: QuestionIdsResponse = self
            .fetch(self.request(Method::PUT, &path).json(&body))
            .await
            .map_err(|e| e.for_survey(survey_id))?;
        tracing::debug!(survey_id, questions = saved.question_ids.len(), "reconciled over http");
        Ok(saved.question_ids)
    }

    async fn update_status(&self, survey_id: &str, status: SurveyStatus) -> Result<(), BackendError> {
        let path = format!("{}/status", survey_path(survey_id));
        self.send(self.request(Method::PATCH, &path).json(&StatusBody { status }))
            .await
            .map_err(|e| e.for_survey(survey_id))?;
        Ok(())
    }

    async fn delete_survey(&self, survey_id: &str) -> Result<(), BackendError> {
        self.send(self.request(Method::DELETE, &survey_path(survey_id)))
            .await
            .map_err(|e| e.for_survey(survey_id))?;
        Ok(())
    }

    async fn list_responses(&self, survey_id: &str) -> Result<Vec<SurveyResponse>, BackendError> {
        let path = format!("{}/responses", survey_path(survey_id));
        let responses: Vec<ResponseDto> = self
            .fetch(self.request(Method::GET, &path))
            .await
            .map_err(|e| e.for_survey(survey_id))?;
        Ok(responses.into_iter().map(Into::into).collect())
    }
}
