//! Survey update builder.
//!
//! The builder produces a `SurveyUpdate` with `Option` fields. Only `Some`
//! fields are written, which gives the aggregate upsert its merge semantics:
//! fields absent from the body stay untouched. Nullable fields use
//! `Option<Option<_>>` so they can be explicitly cleared.
//!
//! Status is not part of an update; `update_status` is the only way to move a
//! survey through its lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "explicit_null"
    )]
    pub description: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "explicit_null"
    )]
    pub starts_at: Option<Option<DateTime<Utc>>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "explicit_null"
    )]
    pub ends_at: Option<Option<DateTime<Utc>>>,
}

/// A present key always yields `Some`, so `null` means "clear" instead of
/// collapsing into "absent".
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default)]
pub struct SurveyUpdateBuilder(SurveyUpdate);

impl SurveyUpdateBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self(SurveyUpdate::default())
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.0.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.0.description = Some(description);
        self
    }

    #[must_use]
    pub const fn starts_at(mut self, starts_at: Option<DateTime<Utc>>) -> Self {
        self.0.starts_at = Some(starts_at);
        self
    }

    #[must_use]
    pub const fn ends_at(mut self, ends_at: Option<DateTime<Utc>>) -> Self {
        self.0.ends_at = Some(ends_at);
        self
    }

    #[must_use]
    pub fn build(self) -> SurveyUpdate {
        self.0
    }
}
