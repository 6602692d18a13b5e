//! JSONL trail configuration.

use serde::{Deserialize, Serialize};

const fn default_enabled() -> bool {
    true
}

fn default_dir() -> String {
    ".inventory/trail".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrailConfig {
    /// Whether mutations are appended to the JSONL trail.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Directory holding the per-day trail files.
    #[serde(default = "default_dir")]
    pub dir: String,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            dir: default_dir(),
        }
    }
}
