//! Error taxonomy shared by every backend.
//!
//! Adapter crates keep their own error enums (`StoreError`,
//! `HttpBackendError`) and convert into [`BackendError`] at the port
//! boundary. Nothing between the adapter and the caller translates or
//! swallows these errors.

use serde::Serialize;
use thiserror::Error;

/// Coarse classification of a [`BackendError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Unauthorized,
    ValidationFailed,
    BackendUnavailable,
}

/// Errors surfaced by any [`SurveyBackend`](crate::SurveyBackend) operation.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Referenced survey, question, or response does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The caller is not permitted to perform the operation.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A survey, question, or answer body violates a required-field or
    /// range constraint.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// Network, transport, or storage failure.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),
}

impl BackendError {
    #[must_use]
    pub fn survey_not_found(id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "survey",
            id: id.into(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Unauthorized(_) => ErrorKind::Unauthorized,
            Self::ValidationFailed(_) => ErrorKind::ValidationFailed,
            Self::BackendUnavailable(_) => ErrorKind::BackendUnavailable,
        }
    }
}

/// A single failed validation rule, keyed by the offending field path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<Vec<ValidationError>> for BackendError {
    fn from(errors: Vec<ValidationError>) -> Self {
        let joined = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Self::ValidationFailed(joined)
    }
}
