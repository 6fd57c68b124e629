//! Cross-cutting error types.
//!
//! Storage and engine errors (`DatabaseError`, `EngineError`) live in their
//! own crates and wrap `CoreError` where validation happens at the boundary.

use thiserror::Error;

/// Errors that can be raised by any swipe crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Entity lookup returned no result.
    #[error("Entity not found: {entity_type} {id}")]
    NotFound { entity_type: String, id: String },

    /// Data failed validation (format, ranges, required fields).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
