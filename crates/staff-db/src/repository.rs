//! Repository errors
//!
//! Storage failures are classified here once, then converted into
//! [`StaffError`] at the service boundary.

use staff_core::error::StaffError;
use staff_core::traits::Id;

/// SQLSTATE for `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";
/// SQLSTATE for `foreign_key_violation`
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("{entity} not found: id={id}")]
    NotFound { entity: &'static str, id: Id },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl RepositoryError {
    pub fn not_found(entity: &'static str, id: Id) -> Self {
        RepositoryError::NotFound { entity, id }
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            match db_err.code().as_deref() {
                Some(UNIQUE_VIOLATION) => {
                    return RepositoryError::Conflict(db_err.message().to_string())
                }
                Some(FOREIGN_KEY_VIOLATION) => {
                    return RepositoryError::InvalidReference(db_err.message().to_string())
                }
                _ => {}
            }
        }
        RepositoryError::Database(err)
    }
}

impl From<RepositoryError> for StaffError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => StaffError::not_found(entity, id),
            RepositoryError::Conflict(message) => StaffError::conflict(message),
            RepositoryError::InvalidReference(message) => StaffError::validation(message),
            RepositoryError::Database(err) => StaffError::Database(err.to_string()),
        }
    }
}

/// Result type for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;
