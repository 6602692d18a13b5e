//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default page size for paginated listings.
const fn default_page_size() -> u32 {
    10
}

/// Largest page size a listing may request.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Username to act as when `--user` is not given.
    #[serde(default)]
    pub user: Option<String>,

    /// Default page size for paginated listings.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Default output format (`json`, `table`, or `raw`). Empty means `json`.
    #[serde(default)]
    pub default_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            user: None,
            page_size: default_page_size(),
            default_format: String::new(),
        }
    }
}
