//! # swipe-config
//!
//! Layered configuration loading using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`SWIPE_*` prefix, `__` as separator)
//! 2. Project-level `.swipe/config.toml`
//! 3. User-level `~/.config/swipe/config.toml`
//! 4. Built-in defaults
//!
//! Figment maps `SWIPE_GESTURE__HORIZONTAL_THRESHOLD` -> `gesture.horizontal_threshold`,
//! `SWIPE_STORE__URL` -> `store.url`, etc.
//!
//! ```no_run
//! use swipe_config::SwipeConfig;
//!
//! let config = SwipeConfig::load_with_dotenv().expect("config");
//! let thresholds = config.gesture.thresholds();
//! ```

mod discovery;
mod error;
mod gesture;
mod store;

pub use discovery::{DiscoveryConfig, STORY_TTL_HOURS};
pub use error::ConfigError;
pub use gesture::GestureConfig;
pub use store::StoreConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SwipeConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

impl SwipeConfig {
    /// Load and validate configuration from TOML files and environment variables.
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load `.env` from the workspace root first, then [`Self::load`].
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if extraction fails or a value is out of range.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain. Public so tests can layer providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        let local_path = PathBuf::from(".swipe/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("SWIPE_").split("__"))
    }

    /// Check ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::InvalidValue` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.gesture.validate()?;
        self.discovery.validate()
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("swipe").join("config.toml"))
    }

    /// Walk up from `CARGO_MANIFEST_DIR` (crate -> crates/ -> root) looking for
    /// `.env`, then fall back to the current directory.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
