use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::classification::ClassificationCode;
use crate::enums::ContentKind;

/// A post or a story. Stories carry `expires_at` and vanish from every
/// listing once it passes; their rows may linger in storage.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Content {
    pub id: String,
    pub owner_id: String,
    pub caption: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
    pub kind: ContentKind,
    pub views: u64,
    pub expires_at: Option<DateTime<Utc>>,
    /// `None` marks a general request, shown to every profession.
    pub classification_code: Option<ClassificationCode>,
    pub created_at: DateTime<Utc>,
}

impl Content {
    /// Posts are always active. A story is active while `now < expires_at`;
    /// a story without an expiry is treated as expired.
    #[must_use]
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        match self.kind {
            ContentKind::Post => true,
            ContentKind::Story => self.expires_at.is_some_and(|exp| now < exp),
        }
    }

    #[must_use]
    pub const fn is_general(&self) -> bool {
        self.classification_code.is_none()
    }
}
