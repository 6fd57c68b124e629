//! Repository modules implementing store operations.
//!
//! Each module adds methods to `SwipeService` via `impl SwipeService` blocks.

pub mod content;
pub mod matches;
pub mod professional;
pub mod user;
