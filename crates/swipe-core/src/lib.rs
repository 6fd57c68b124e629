//! # swipe-core
//!
//! Core types shared by every crate of the swipe matching engine.
//!
//! - Entity structs for users, professional details, content and match records
//! - Normalized enums (`Role`, `ContentKind`, `SwipeAction`)
//! - ID prefix constants
//! - Cross-cutting error types
//! - Great-circle distance and its display convention
//! - The pointer-gesture state machine that resolves swipe actions
//! - Store query filters and insert payloads

pub mod classification;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod geo;
pub mod gesture;
pub mod ids;
pub mod query;
