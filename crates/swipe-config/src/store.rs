//! libSQL store configuration.

use serde::{Deserialize, Serialize};

fn default_path() -> String {
    "swipe.db".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    /// Local database file. `":memory:"` opens a throwaway database.
    #[serde(default = "default_path")]
    pub path: String,

    /// Remote database URL (e.g., `libsql://swipe-prod.turso.io`).
    #[serde(default)]
    pub url: String,

    /// Auth token for the remote database.
    #[serde(default)]
    pub auth_token: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            url: String::new(),
            auth_token: String::new(),
        }
    }
}

impl StoreConfig {
    /// Remote mode needs both the URL and a token.
    #[must_use]
    pub fn is_remote(&self) -> bool {
        !self.url.is_empty() && !self.auth_token.is_empty()
    }
}
