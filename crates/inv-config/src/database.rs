//! Local libSQL database configuration.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    ".inventory/inventory.db".to_string()
}

/// Default number of attempts for a statement hitting a locked database.
const fn default_busy_retries() -> u32 {
    4
}

/// Default initial backoff between busy retries, in milliseconds.
const fn default_busy_backoff_ms() -> u64 {
    50
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    /// Path to the database file. `":memory:"` keeps everything in RAM.
    #[serde(default = "default_path")]
    pub path: String,

    /// Attempts (including the first) for statements that fail with
    /// `database is locked`.
    #[serde(default = "default_busy_retries")]
    pub busy_retries: u32,

    /// Initial backoff between attempts; doubles on each retry.
    #[serde(default = "default_busy_backoff_ms")]
    pub busy_backoff_ms: u64,
}

impl DatabaseConfig {
    /// Whether the database lives only in memory.
    #[must_use]
    pub fn is_memory(&self) -> bool {
        self.path == ":memory:"
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            busy_retries: default_busy_retries(),
            busy_backoff_ms: default_busy_backoff_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = DatabaseConfig::default();
        assert_eq!(config.path, ".inventory/inventory.db");
        assert_eq!(config.busy_retries, 4);
        assert_eq!(config.busy_backoff_ms, 50);
        assert!(!config.is_memory());
    }
}
