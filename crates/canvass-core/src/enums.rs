//! Survey status and question type enums.
//!
//! All enums use `snake_case` serialization. `SurveyStatus` carries the
//! lifecycle through `allowed_next_states()`; the persistence layer does not
//! enforce it, callers do.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// SurveyStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of a survey.
///
/// ```text
/// draft → published → closed
///       ← published            (explicit unpublish)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SurveyStatus {
    Draft,
    Published,
    Closed,
}

impl SurveyStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Draft => &[Self::Published],
            Self::Published => &[Self::Closed, Self::Draft],
            Self::Closed => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    /// Whether respondents may read the survey and its questions.
    #[must_use]
    pub const fn is_public(self) -> bool {
        matches!(self, Self::Published | Self::Closed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for SurveyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SurveyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "published" => Ok(Self::Published),
            "closed" => Ok(Self::Closed),
            other => Err(format!("unknown survey status '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// QuestionType
// ---------------------------------------------------------------------------

/// Type of a question. Determines how it is rendered and which
/// [`AnswerValue`](crate::answer::AnswerValue) variant answers it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// Yes or no.
    #[serde(rename = "yesno")]
    YesNo,
    /// Any subset of the options.
    Multiple,
    /// A number on a `min..=max` scale with `step` increments.
    Slider,
    /// A star rating up to `max`.
    Star,
    /// A calendar date.
    Date,
    /// All options, ranked by dragging.
    #[serde(rename = "dragdrop")]
    DragDrop,
    /// Free text.
    Freitext,
    /// Exactly one of the options.
    Radio,
}

impl QuestionType {
    pub const ALL: [Self; 8] = [
        Self::YesNo,
        Self::Multiple,
        Self::Slider,
        Self::Star,
        Self::Date,
        Self::DragDrop,
        Self::Freitext,
        Self::Radio,
    ];

    /// Whether questions of this type need a non-empty option list.
    #[must_use]
    pub const fn requires_options(self) -> bool {
        matches!(self, Self::Multiple | Self::DragDrop | Self::Radio)
    }

    /// Whether `min`/`max`/`step` carry meaning for this type.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Self::Slider | Self::Star)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::YesNo => "yesno",
            Self::Multiple => "multiple",
            Self::Slider => "slider",
            Self::Star => "star",
            Self::Date => "date",
            Self::DragDrop => "dragdrop",
            Self::Freitext => "freitext",
            Self::Radio => "radio",
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown question type '{s}'"))
    }
}
