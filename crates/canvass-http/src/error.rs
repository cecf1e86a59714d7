//! HTTP backend error types.

use canvass_core::BackendError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpBackendError {
    /// Transport failure: connect, timeout, TLS, or body read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, or the reason phrase when the body is empty.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("parse error: {0}")]
    Parse(String),
}

impl HttpBackendError {
    /// Map onto the port taxonomy, naming `survey_id` in a 404.
    #[must_use]
    pub fn for_survey(self, survey_id: &str) -> BackendError {
        match self {
            Self::Api { status: 404, .. } => BackendError::survey_not_found(survey_id),
            other => other.into(),
        }
    }
}

impl From<HttpBackendError> for BackendError {
    fn from(error: HttpBackendError) -> Self {
        match error {
            HttpBackendError::Api { status: 404, message } => Self::NotFound {
                entity: "resource",
                id: message,
            },
            HttpBackendError::Api {
                status: 401 | 403,
                message,
            } => Self::Unauthorized(message),
            HttpBackendError::Api {
                status: 400 | 409 | 422,
                message,
            } => Self::ValidationFailed(message),
            HttpBackendError::Api { status, message } => {
                Self::BackendUnavailable(format!("HTTP {status}: {message}"))
            }
            other => Self::BackendUnavailable(other.to_string()),
        }
    }
}
