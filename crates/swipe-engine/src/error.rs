//! Engine error types.
//!
//! Only `InvalidInput` asks the caller to correct something. Store failures
//! and timeouts are recoverable; selection and impressions turn them into
//! degraded results instead of returning them.

use std::time::Duration;

use swipe_core::errors::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Input rejected before any write was attempted.
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] CoreError),

    /// The data store reported a failure.
    #[error("Store operation '{op}' failed: {source}")]
    Store {
        op: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The data store did not answer within the configured limit.
    #[error("Store operation '{op}' timed out after {limit:?}")]
    Timeout { op: &'static str, limit: Duration },
}

impl EngineError {
    /// Whether retrying later may succeed without caller changes.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::InvalidInput(_))
    }
}
