//! Candidate discovery and content lifecycle settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Stories are visible for exactly one day.
pub const STORY_TTL_HOURS: u32 = 24;

const fn default_story_ttl_hours() -> u32 {
    STORY_TTL_HOURS
}

const fn default_request_timeout_ms() -> u64 {
    5_000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DiscoveryConfig {
    /// Story visibility window after creation. Loaded configs must keep
    /// [`STORY_TTL_HOURS`]; other values are only for struct-built test configs.
    #[serde(default = "default_story_ttl_hours")]
    pub story_ttl_hours: u32,

    /// Upper bound on any single store request issued by the engine.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            story_ttl_hours: default_story_ttl_hours(),
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

impl DiscoveryConfig {
    #[must_use]
    pub fn story_ttl(&self) -> chrono::TimeDelta {
        chrono::TimeDelta::hours(i64::from(self.story_ttl_hours))
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when the TTL differs from
    /// [`STORY_TTL_HOURS`] or the timeout is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.story_ttl_hours != STORY_TTL_HOURS {
            return Err(ConfigError::InvalidValue {
                field: "discovery.story_ttl_hours".into(),
                reason: format!("stories live {STORY_TTL_HOURS} hours, got {}", self.story_ttl_hours),
            });
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "discovery.request_timeout_ms".into(),
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }
}
