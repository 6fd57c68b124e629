//! Store-facing query filters and insert payloads.
//!
//! These are the shapes the engine hands to whatever backs the data store.
//! `swipe-db` translates them to SQL; test doubles can evaluate them in memory.

use chrono::{DateTime, Utc};

use crate::classification::ClassificationCode;
use crate::entities::Content;
use crate::enums::{ContentKind, SwipeAction};

/// How a content query treats `classification_code`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ClassificationFilter {
    #[default]
    Any,
    Exactly(ClassificationCode),
    /// The given code, or general content with no code at all.
    ExactlyOrGeneral(ClassificationCode),
}

impl ClassificationFilter {
    #[must_use]
    pub fn accepts(&self, code: Option<&ClassificationCode>) -> bool {
        match self {
            Self::Any => true,
            Self::Exactly(want) => code == Some(want),
            Self::ExactlyOrGeneral(want) => code.is_none_or(|c| c == want),
        }
    }
}

/// Filter criteria for content queries. Results are always newest first.
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    pub owner_id: Option<String>,
    pub exclude_owner_id: Option<String>,
    pub kind: Option<ContentKind>,
    pub classification: ClassificationFilter,
    /// Drop stories whose `expires_at <= active_at`.
    pub active_at: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
}

impl ContentFilter {
    /// Evaluate the filter against one item (limit excluded).
    #[must_use]
    pub fn matches(&self, content: &Content) -> bool {
        self.owner_id.as_ref().is_none_or(|o| *o == content.owner_id)
            && self
                .exclude_owner_id
                .as_ref()
                .is_none_or(|o| *o != content.owner_id)
            && self.kind.is_none_or(|k| k == content.kind)
            && self
                .classification
                .accepts(content.classification_code.as_ref())
            && self.active_at.is_none_or(|now| content.is_active_at(now))
    }
}

/// Filter criteria for match record queries. Results are always newest first.
#[derive(Debug, Clone, Default)]
pub struct MatchFilter {
    pub actor_id: Option<String>,
    pub target_id: Option<String>,
    /// Records where this user is either actor or target.
    pub involving: Option<String>,
    /// Restrict to records referencing one of these content ids. An empty
    /// list matches nothing.
    pub content_ids: Option<Vec<String>>,
    pub limit: Option<u32>,
}

/// Insert payload for a content row. The store assigns `id` and starts
/// `views` at zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContent {
    pub owner_id: String,
    pub caption: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub kind: ContentKind,
    pub expires_at: Option<DateTime<Utc>>,
    pub classification_code: Option<ClassificationCode>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a match record. `matched` is always written `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMatch {
    pub actor_id: String,
    pub target_id: String,
    pub action: SwipeAction,
    pub content_id: Option<String>,
    pub created_at: DateTime<Utc>,
}
