//! Database error types for inv-db.

use inv_core::errors::CoreError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or a column could not be decoded.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// A referenced entity does not exist (or is not visible to the actor).
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Operation not allowed in the entity's current state
    /// (e.g., repairing disposed equipment).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Input rejected by a business rule.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The acting user lacks the required role or ownership.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Shorthand for `DatabaseError::NotFound`.
pub(crate) fn not_found(entity: impl Into<String>, id: impl Into<String>) -> DatabaseError {
    DatabaseError::NotFound {
        entity: entity.into(),
        id: id.into(),
    }
}

impl From<CoreError> for DatabaseError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::NotFound { entity_type, id } => Self::NotFound {
                entity: entity_type,
                id,
            },
            CoreError::InvalidTransition {
                entity_type,
                id,
                from,
                to,
            } => Self::InvalidState(format!("Cannot transition {entity_type} {id} from {from} to {to}")),
            CoreError::Validation(msg) => Self::Validation(msg),
            CoreError::PermissionDenied(msg) => Self::PermissionDenied(msg),
            CoreError::Other(e) => Self::Other(e),
        }
    }
}

impl From<serde_json::Error> for DatabaseError {
    fn from(e: serde_json::Error) -> Self {
        Self::Other(e.into())
    }
}
