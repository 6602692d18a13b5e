//! Cross-cutting error types for campus-inventory.
//!
//! Storage-specific errors (`DatabaseError`) live in `inv-db`; configuration
//! errors live in `inv-config`. `CoreError` covers failures that can be
//! detected from domain types alone.

use thiserror::Error;

/// Errors that can be raised by domain logic in any crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// A state machine transition was attempted that is not allowed.
    #[error("Invalid state transition: {entity_type} {id} from {from} to {to}")]
    InvalidTransition {
        entity_type: String,
        id: String,
        from: String,
        to: String,
    },

    /// Data failed validation (format, constraints, type/characteristic mismatch).
    #[error("Validation error: {0}")]
    Validation(String),

    /// The acting user is not allowed to perform the operation.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
