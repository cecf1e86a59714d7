//! Wire types. The API speaks camelCase JSON; these mirror the domain
//! entities field for field and convert both ways.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use canvass_core::answer::AnswerValue;
use canvass_core::entities::{
    Answer, CreatedSurvey, NewSurvey, Question, QuestionInput, ResponseSubmission, Survey, SurveyResponse,
    SurveyWithQuestions,
};
use canvass_core::enums::{QuestionType, SurveyStatus};
use canvass_core::updates::SurveyUpdate;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyDto {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
    pub status: SurveyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<SurveyDto> for Survey {
    fn from(dto: SurveyDto) -> Self {
        Self {
            id: dto.id,
            owner_id: dto.owner_id,
            title: dto.title,
            description: dto.description,
            starts_at: dto.starts_at,
            ends_at: dto.ends_at,
            status: dto.status,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSurveyDto {
    pub owner_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<DateTime<Utc>>,
}

impl From<NewSurvey> for NewSurveyDto {
    fn from(survey: NewSurvey) -> Self {
        Self {
            owner_id: survey.owner_id,
            title: survey.title,
            description: survey.description,
            starts_at: survey.starts_at,
            ends_at: survey.ends_at,
        }
    }
}

/// Merge body: absent keys stay untouched, `null` clears.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyUpdateDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starts_at: Option<Option<DateTime<Utc>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_at: Option<Option<DateTime<Utc>>>,
}

impl From<SurveyUpdate> for SurveyUpdateDto {
    fn from(update: SurveyUpdate) -> Self {
        Self {
            title: update.title,
            description: update.description,
            starts_at: update.starts_at,
            ends_at: update.ends_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDto {
    pub id: String,
    pub survey_id: String,
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
    pub order: i64,
}

impl From<QuestionDto> for Question {
    fn from(dto: QuestionDto) -> Self {
        Self {
            id: dto.id,
            survey_id: dto.survey_id,
            kind: dto.kind,
            title: dto.title,
            text: dto.text,
            options: dto.options,
            min: dto.min,
            max: dto.max,
            step: dto.step,
            order: dto.order,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionInputDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub kind: QuestionType,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    pub order: i64,
}

impl From<QuestionInput> for QuestionInputDto {
    fn from(input: QuestionInput) -> Self {
        Self {
            id: input.id,
            kind: input.kind,
            title: input.title,
            text: input.text,
            options: input.options,
            min: input.min,
            max: input.max,
            step: input.step,
            order: input.order,
        }
    }
}

impl QuestionInputDto {
    /// Same body without the ID, for endpoints that always create.
    #[must_use]
    pub fn without_id(self) -> Self {
        Self { id: None, ..self }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AggregateDto {
    #[serde(flatten)]
    pub survey: SurveyDto,
    #[serde(default)]
    pub questions: Vec<QuestionDto>,
}

impl From<AggregateDto> for SurveyWithQuestions {
    fn from(dto: AggregateDto) -> Self {
        Self {
            survey: dto.survey.into(),
            questions: dto.questions.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CreateAggregateBody {
    pub survey: NewSurveyDto,
    pub questions: Vec<QuestionInputDto>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateAggregateBody {
    pub survey: SurveyUpdateDto,
    pub questions: Vec<QuestionInputDto>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishBody {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusBody {
    pub status: SurveyStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerDto {
    pub question_id: String,
    pub value: AnswerValue,
}

impl From<Answer> for AnswerDto {
    fn from(answer: Answer) -> Self {
        Self {
            question_id: answer.question_id,
            value: answer.value,
        }
    }
}

impl From<AnswerDto> for Answer {
    fn from(dto: AnswerDto) -> Self {
        Self {
            question_id: dto.question_id,
            value: dto.value,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmissionBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub answers: Vec<AnswerDto>,
}

impl From<ResponseSubmission> for SubmissionBody {
    fn from(submission: ResponseSubmission) -> Self {
        Self {
            name: submission.name,
            answers: submission.answers.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseDto {
    pub id: String,
    pub survey_id: String,
    pub respondent_id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub answers: Vec<AnswerDto>,
    pub submitted_at: DateTime<Utc>,
}

impl From<ResponseDto> for SurveyResponse {
    fn from(dto: ResponseDto) -> Self {
        Self {
            id: dto.id,
            survey_id: dto.survey_id,
            respondent_id: dto.respondent_id,
            name: dto.name,
            answers: dto.answers.into_iter().map(Into::into).collect(),
            submitted_at: dto.submitted_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdResponse {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionIdsResponse {
    pub question_ids: Vec<String>,
}

/// Reply to an aggregate create: the survey ID plus question IDs in the
/// order the questions were sent.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedAggregateResponse {
    pub id: String,
    pub question_ids: Vec<String>,
}

impl From<CreatedAggregateResponse> for CreatedSurvey {
    fn from(dto: CreatedAggregateResponse) -> Self {
        Self {
            survey_id: dto.id,
            question_ids: dto.question_ids,
        }
    }
}
