//! Roles, content kinds and swipe actions.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`
//! and expose `as_str()` for SQL storage. Role labels arrive from the outside in
//! two languages; they are normalized once here and never compared as raw
//! strings elsewhere.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Which side of the marketplace a user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Offers services and swipes on requests.
    #[serde(alias = "professionnel")]
    Professional,
    /// Posts requests and reviews the professionals who liked them.
    #[serde(alias = "particulier")]
    Individual,
}

impl Role {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Individual => "individual",
        }
    }

    /// Resolve an external role label (English or French, any case).
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` for labels that name neither role.
    pub fn parse(label: &str) -> Result<Self, CoreError> {
        match label.trim().to_lowercase().as_str() {
            "professional" | "professionnel" => Ok(Self::Professional),
            "individual" | "particulier" => Ok(Self::Individual),
            other => Err(CoreError::Validation(format!("unknown role '{other}'"))),
        }
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ContentKind
// ---------------------------------------------------------------------------

/// A post lives until deleted; a story disappears from listings after its TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Post,
    Story,
}

impl ContentKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Story => "story",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SwipeAction
// ---------------------------------------------------------------------------

/// Resolved outcome of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SwipeAction {
    Like,
    Pass,
    SuperLike,
}

impl SwipeAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Pass => "pass",
            Self::SuperLike => "super_like",
        }
    }

    /// Whether the action expresses interest (everything but `pass`).
    #[must_use]
    pub const fn is_positive(self) -> bool {
        matches!(self, Self::Like | Self::SuperLike)
    }
}

impl fmt::Display for SwipeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
