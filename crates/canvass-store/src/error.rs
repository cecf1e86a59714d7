//! Store error types and their mapping onto the port's taxonomy.

use canvass_core::BackendError;
use thiserror::Error;

/// `SQLITE_CONSTRAINT` primary result code.
const SQLITE_CONSTRAINT: i32 = 19;
/// Extended codes for a duplicate key.
const SQLITE_CONSTRAINT_PRIMARYKEY: i32 = 1555;
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// A referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The caller's identity does not pass the access rules.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Embedded JSON column could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn survey_not_found(id: &str) -> Self {
        Self::NotFound {
            entity: "survey",
            id: id.to_string(),
        }
    }

    /// Whether this is a constraint violation raised by the database.
    #[must_use]
    pub fn is_constraint(&self) -> bool {
        match self {
            Self::LibSql(libsql::Error::SqliteFailure(code, _)) => {
                code & 0xff == SQLITE_CONSTRAINT
            }
            Self::LibSql(other) => other.to_string().contains("constraint failed"),
            _ => false,
        }
    }

    /// Whether this is a duplicate key. The only unique columns are the
    /// generated primary keys, so this means an ID collision.
    #[must_use]
    pub fn is_key_collision(&self) -> bool {
        match self {
            Self::LibSql(libsql::Error::SqliteFailure(code, message)) => {
                matches!(*code, SQLITE_CONSTRAINT_PRIMARYKEY | SQLITE_CONSTRAINT_UNIQUE)
                    || message.contains("UNIQUE constraint failed")
            }
            Self::LibSql(other) => other.to_string().contains("UNIQUE constraint failed"),
            _ => false,
        }
    }
}

impl From<StoreError> for BackendError {
    fn from(error: StoreError) -> Self {
        if error.is_key_collision() {
            return Self::BackendUnavailable(format!("generated id collided, retry: {error}"));
        }
        if error.is_constraint() {
            return Self::ValidationFailed(error.to_string());
        }
        match error {
            StoreError::NotFound { entity, id } => Self::NotFound { entity, id },
            StoreError::Forbidden(message) => Self::Unauthorized(message),
            other => Self::BackendUnavailable(other.to_string()),
        }
    }
}
