use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Question;
use crate::enums::SurveyStatus;

/// A named, time-bounded questionnaire owned by one user.
///
/// When `status` is `Published`, both `starts_at` and `ends_at` are set and
/// `ends_at >= starts_at`. The store does not check this; the service does
/// before publishing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Survey {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
    pub status: SurveyStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Survey {
    /// Whether the survey accepts responses at `now`.
    ///
    /// Open means published and inside the configured window.
    #[must_use]
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.status == SurveyStatus::Published
            && self.starts_at.is_none_or(|start| start <= now)
            && self.ends_at.is_none_or(|end| now <= end)
    }
}

/// Fields for a new survey. The store assigns the ID and timestamps, and
/// every new survey starts as a `Draft`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewSurvey {
    pub owner_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
}

impl NewSurvey {
    #[must_use]
    pub fn new(owner_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            owner_id: owner_id.into(),
            title: title.into(),
            ..Self::default()
        }
    }
}

/// A survey together with its questions ordered by `order` ascending.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct SurveyWithQuestions {
    #[serde(flatten)]
    pub survey: Survey,
    pub questions: Vec<Question>,
}

/// IDs assigned by an aggregate create. `question_ids` follows the order of
/// the input list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct CreatedSurvey {
    pub survey_id: String,
    pub question_ids: Vec<String>,
}
