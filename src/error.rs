use rusqlite::ErrorCode;
use thiserror::Error;

use crate::models::EntityKind;

/// Errors produced by the entity model and the persistence gateway.
///
/// The first four variants are request-level failures that the HTTP layer
/// reports to the client. The rest are internal and are never exposed
/// verbatim.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field is missing or empty.
    #[error("Validation error: {message}")]
    Validation { field: &'static str, message: String },

    /// A uniqueness constraint was violated.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A foreign key points at a record that does not exist.
    #[error("Reference error: {0}")]
    Reference(String),

    #[error("{entity} not found")]
    NotFound { entity: EntityKind, id: i64 },

    #[error("Database error: {0}")]
    Database(rusqlite::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl StoreError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn reference(field: &str, id: i64) -> Self {
        Self::Reference(format!("{} {} does not exist", field, id))
    }

    pub fn not_found(entity: EntityKind, id: i64) -> Self {
        Self::NotFound { entity, id }
    }

    /// True for failures caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. } | Self::Conflict(_) | Self::Reference(_) | Self::NotFound { .. }
        )
    }
}

impl From<rusqlite::Error> for StoreError {
    /// Classifies SQLite constraint failures; anything else stays a database error.
    fn from(e: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(ref failure, ref message) = e {
            if failure.code == ErrorCode::ConstraintViolation {
                let detail = message.clone().unwrap_or_default();
                match failure.extended_code {
                    rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => {
                        return Self::Conflict(unique_message(&detail));
                    }
                    rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                        return Self::Reference("foreign key constraint failed".to_string());
                    }
                    _ => {}
                }
            }
        }
        Self::Database(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        Self::Internal(e.to_string())
    }
}

/// Turns "UNIQUE constraint failed: scientists.name" into a client-facing message.
fn unique_message(detail: &str) -> String {
    match detail.rsplit_once('.') {
        Some((_, column)) => format!("{} is already taken", column.trim()),
        None => "record already exists".to_string(),
    }
}
