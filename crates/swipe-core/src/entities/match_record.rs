use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::SwipeAction;

/// A directional swipe decision. Immutable once written.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MatchRecord {
    pub id: String,
    pub actor_id: String,
    pub target_id: String,
    pub action: SwipeAction,
    /// Mutual-match flag. Always written `false` and never recomputed.
    pub matched: bool,
    pub content_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One row of a user's match history, seen from that user's side.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MatchSummary {
    pub match_id: String,
    pub other_user_id: String,
    pub other_user_name: Option<String>,
    pub action: SwipeAction,
    pub created_at: DateTime<Utc>,
}
