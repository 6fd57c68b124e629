//! Swipe gesture thresholds.
//!
//! The same gesture used to resolve at 80 units on one surface and 100 on
//! another. One value now applies everywhere and stays tunable.

use serde::{Deserialize, Serialize};
use swipe_core::gesture::SwipeThresholds;

use crate::error::ConfigError;

const fn default_threshold() -> f64 {
    100.0
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GestureConfig {
    /// Horizontal drag distance past which a release becomes like/pass.
    #[serde(default = "default_threshold")]
    pub horizontal_threshold: f64,

    /// Upward drag distance past which a release becomes a super like.
    #[serde(default = "default_threshold")]
    pub vertical_threshold: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            horizontal_threshold: default_threshold(),
            vertical_threshold: default_threshold(),
        }
    }
}

impl GestureConfig {
    #[must_use]
    pub const fn thresholds(&self) -> SwipeThresholds {
        SwipeThresholds {
            horizontal: self.horizontal_threshold,
            vertical: self.vertical_threshold,
        }
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` for non-finite or non-positive thresholds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("gesture.horizontal_threshold", self.horizontal_threshold),
            ("gesture.vertical_threshold", self.vertical_threshold),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: format!("must be a positive number, got {value}"),
                });
            }
        }
        Ok(())
    }
}
