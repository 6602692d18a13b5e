//! Busy-database retry policy.
//!
//! A CLI invocation can overlap with another process holding a write lock on
//! the same database file. `SQLite` reports this as `database is locked` (or
//! `database table is locked`) and the lock usually clears within
//! milliseconds, so `InventoryDb::execute_with` / `query_with` retry such
//! statements with exponential backoff.

use std::time::Duration;

/// Configuration for retry behavior on a locked database.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl RetryConfig {
    /// Build from the `database.busy_*` config values.
    #[must_use]
    pub fn from_settings(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay: Duration::from_millis(base_delay_ms),
            ..Self::default()
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(50),
            max_delay: Duration::from_secs(2),
        }
    }
}

/// Detect lock contention errors that are worth retrying.
///
/// The predicate is intentionally narrow to avoid retrying genuine SQL or
/// constraint errors.
pub fn is_busy_error(e: &libsql::Error) -> bool {
    let msg = e.to_string();
    msg.contains("database is locked") || msg.contains("database table is locked")
}
