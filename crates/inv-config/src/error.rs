//! Configuration error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A layer could not be read or a value has the wrong shape.
    #[error("Configuration error: {0}")]
    Figment(#[from] figment::Error),

    /// A section the service needs is empty.
    #[error("Configuration section '{section}' is empty; set it in .inventory/config.toml or INVENTORY_* variables")]
    NotConfigured { section: String },

    /// A value is present but out of range.
    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
