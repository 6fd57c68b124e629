//! Content creation, story expiry and view accounting.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use swipe_config::DiscoveryConfig;
use swipe_core::classification::ClassificationCode;
use swipe_core::entities::Content;
use swipe_core::enums::{ContentKind, Role};
use swipe_core::errors::CoreError;
use swipe_core::query::{ContentFilter, NewContent};

use crate::context::Viewer;
use crate::error::EngineError;
use crate::selector::Selection;
use crate::store::{DiscoveryStore, bounded};

/// Raw author input for a new post or story.
#[derive(Debug, Clone, Default)]
pub struct ContentInput {
    pub caption: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
    /// Only honored for individual authors.
    pub classification_code: Option<String>,
}

/// Result of showing a content item to a viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpressionOutcome {
    /// The view was counted; carries the new total.
    Counted(u64),
    /// Owners viewing their own content are not counted.
    OwnContent,
    /// The increment did not reach the store. The impression is dropped.
    Failed,
}

pub struct ContentLifecycle<S> {
    store: Arc<S>,
    story_ttl: TimeDelta,
    timeout: Duration,
}

impl<S> Clone for ContentLifecycle<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            story_ttl: self.story_ttl,
            timeout: self.timeout,
        }
    }
}

fn trimmed(value: Option<&String>) -> Option<String> {
    value
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl<S: DiscoveryStore> ContentLifecycle<S> {
    #[must_use]
    pub fn new(store: Arc<S>, config: &DiscoveryConfig) -> Self {
        Self {
            store,
            story_ttl: config.story_ttl(),
            timeout: config.request_timeout(),
        }
    }

    /// Create content authored by `author` at the current time.
    ///
    /// # Errors
    ///
    /// `EngineError::InvalidInput` when the input is incomplete or the
    /// classification code is malformed; `Store`/`Timeout` when the write fails.
    pub async fn create(
        &self,
        author: &Viewer,
        kind: ContentKind,
        input: &ContentInput,
    ) -> Result<Content, EngineError> {
        self.create_at(author, kind, input, Utc::now()).await
    }

    /// Create content with an explicit creation instant. Stories expire
    /// exactly one TTL after `now`.
    ///
    /// # Errors
    ///
    /// Same as [`ContentLifecycle::create`].
    pub async fn create_at(
        &self,
        author: &Viewer,
        kind: ContentKind,
        input: &ContentInput,
        now: DateTime<Utc>,
    ) -> Result<Content, EngineError> {
        let draft = self.draft(author, kind, input, now)?;
        let content = bounded(
            "insert_content",
            self.timeout,
            self.store.insert_content(&draft),
        )
        .await?;
        tracing::debug!(content_id = %content.id, kind = %content.kind, "content created");
        Ok(content)
    }

    fn draft(
        &self,
        author: &Viewer,
        kind: ContentKind,
        input: &ContentInput,
        now: DateTime<Utc>,
    ) -> Result<NewContent, CoreError> {
        if author.user_id.trim().is_empty() {
            return Err(CoreError::Validation("author id is required".into()));
        }
        let caption = trimmed(input.caption.as_ref());
        let body = trimmed(input.body.as_ref());
        let image_url = trimmed(input.image_url.as_ref());

        match kind {
            ContentKind::Post if caption.is_none() && body.is_none() && image_url.is_none() => {
                return Err(CoreError::Validation(
                    "a post needs a caption, a body or an image".into(),
                ));
            }
            ContentKind::Story if image_url.is_none() => {
                return Err(CoreError::Validation("a story needs an image".into()));
            }
            _ => {}
        }

        let classification_code = match (author.role, trimmed(input.classification_code.as_ref())) {
            (Role::Individual, Some(raw)) => Some(ClassificationCode::parse(&raw)?),
            (Role::Professional, Some(_)) => {
                tracing::debug!(author = %author.user_id, "ignoring classification code from professional author");
                None
            }
            (_, None) => None,
        };

        Ok(NewContent {
            owner_id: author.user_id.clone(),
            caption,
            body,
            image_url,
            kind,
            expires_at: (kind == ContentKind::Story).then(|| now + self.story_ttl),
            classification_code,
            created_at: now,
        })
    }

    /// Count one view of `content` by `viewer`. Never fails the caller.
    pub async fn record_impression(&self, viewer: &Viewer, content: &Content) -> ImpressionOutcome {
        if viewer.user_id == content.owner_id {
            return ImpressionOutcome::OwnContent;
        }
        match bounded(
            "increment_content_views",
            self.timeout,
            self.store.increment_content_views(&content.id),
        )
        .await
        {
            Ok(views) => ImpressionOutcome::Counted(views),
            Err(error) => {
                tracing::warn!(%error, content_id = %content.id, "view increment failed, dropping impression");
                ImpressionOutcome::Failed
            }
        }
    }

    /// Content by `owner_id` still visible at `now`, newest first.
    pub async fn list_active(&self, owner_id: &str, now: DateTime<Utc>) -> Selection<Content> {
        let filter = ContentFilter {
            owner_id: Some(owner_id.to_string()),
            active_at: Some(now),
            ..ContentFilter::default()
        };
        match bounded("fetch_content", self.timeout, self.store.fetch_content(&filter)).await {
            Ok(mut items) => {
                items.retain(|c| filter.matches(c));
                Selection::ready(items)
            }
            Err(error) => {
                tracing::warn!(%error, owner_id, "listing content failed");
                Selection::unavailable()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selector::SelectionStatus;
    use crate::test_support::{FailingStore, seed_user, test_service};
    use pretty_assertions::assert_eq;
    use swipe_db::service::SwipeService;

    async fn lifecycle() -> (Arc<SwipeService>, ContentLifecycle<SwipeService>) {
        let svc = Arc::new(test_service().await);
        let lc = ContentLifecycle::new(Arc::clone(&svc), &DiscoveryConfig::default());
        (svc, lc)
    }

    fn caption(text: &str) -> ContentInput {
        ContentInput {
            caption: Some(text.into()),
            ..ContentInput::default()
        }
    }

    #[tokio::test]
    async fn story_expires_one_day_after_creation() {
        let (svc, lc) = lifecycle().await;
        let author = Viewer::from(&seed_user(&svc, "usr-ind", Role::Individual).await);
        let now = Utc::now();
        let input = ContentInput {
            image_url: Some("stories/a.jpg".into()),
            ..ContentInput::default()
        };
        let story = lc
            .create_at(&author, ContentKind::Story, &input, now)
            .await
            .unwrap();
        assert_eq!(
            story.expires_at.map(|e| (e - story.created_at).num_hours()),
            Some(24)
        );
        assert!(story.is_active_at(now + TimeDelta::hours(23)));
        assert!(!story.is_active_at(now + TimeDelta::hours(24)));
    }

    #[tokio::test]
    async fn post_never_expires() {
        let (svc, lc) = lifecycle().await;
        let author = Viewer::from(&seed_user(&svc, "usr-ind", Role::Individual).await);
        let post = lc
            .create(&author, ContentKind::Post, &caption("Leaking sink"))
            .await
            .unwrap();
        assert_eq!(post.expires_at, None);
        assert_eq!(post.views, 0);
    }

    #[tokio::test]
    async fn empty_post_and_imageless_story_are_rejected() {
        let (svc, lc) = lifecycle().await;
        let author = Viewer::from(&seed_user(&svc, "usr-ind", Role::Individual).await);

        let blank = ContentInput {
            caption: Some("   ".into()),
            ..ContentInput::default()
        };
        let err = lc.create(&author, ContentKind::Post, &blank).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
        assert!(!err.is_recoverable());

        let err = lc
            .create(&author, ContentKind::Story, &caption("no image"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn classification_code_kept_for_individuals_only() {
        let (svc, lc) = lifecycle().await;
        let individual = Viewer::from(&seed_user(&svc, "usr-ind", Role::Individual).await);
        let professional = Viewer::from(&seed_user(&svc, "usr-pro", Role::Professional).await);
        let input = ContentInput {
            classification_code: Some("62.01z".into()),
            ..caption("Need a website")
        };

        let post = lc.create(&individual, ContentKind::Post, &input).await.unwrap();
        assert_eq!(
            post.classification_code.as_ref().map(ClassificationCode::as_str),
            Some("62.01Z")
        );

        let post = lc.create(&professional, ContentKind::Post, &input).await.unwrap();
        assert_eq!(post.classification_code, None);
    }

    #[tokio::test]
    async fn malformed_code_is_rejected() {
        let (svc, lc) = lifecycle().await;
        let author = Viewer::from(&seed_user(&svc, "usr-ind", Role::Individual).await);
        let input = ContentInput {
            classification_code: Some("6201".into()),
            ..caption("Need a website")
        };
        let err = lc.create(&author, ContentKind::Post, &input).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn impressions_count_once_per_view_except_for_owner() {
        let (svc, lc) = lifecycle().await;
        let owner = Viewer::from(&seed_user(&svc, "usr-ind", Role::Individual).await);
        let other = Viewer::from(&seed_user(&svc, "usr-pro", Role::Professional).await);
        let post = lc
            .create(&owner, ContentKind::Post, &caption("Roof repair"))
            .await
            .unwrap();

        assert_eq!(lc.record_impression(&owner, &post).await, ImpressionOutcome::OwnContent);
        assert_eq!(lc.record_impression(&other, &post).await, ImpressionOutcome::Counted(1));
        assert_eq!(lc.record_impression(&other, &post).await, ImpressionOutcome::Counted(2));
    }

    #[tokio::test]
    async fn list_active_hides_expired_stories() {
        let (svc, lc) = lifecycle().await;
        let author = Viewer::from(&seed_user(&svc, "usr-ind", Role::Individual).await);
        let now = Utc::now();
        let story = ContentInput {
            image_url: Some("stories/a.jpg".into()),
            ..ContentInput::default()
        };
        lc.create_at(&author, ContentKind::Story, &story, now - TimeDelta::hours(30))
            .await
            .unwrap();
        let fresh = lc
            .create_at(&author, ContentKind::Story, &story, now - TimeDelta::hours(1))
            .await
            .unwrap();
        let post = lc
            .create_at(&author, ContentKind::Post, &caption("old post"), now - TimeDelta::days(10))
            .await
            .unwrap();

        let listed = lc.list_active(&author.user_id, now).await;
        assert_eq!(listed.status, SelectionStatus::Ready);
        let ids: Vec<_> = listed.candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![fresh.id.as_str(), post.id.as_str()]);
    }

    #[tokio::test]
    async fn store_failures_degrade() {
        let store = Arc::new(FailingStore::default());
        let lc = ContentLifecycle::new(store, &DiscoveryConfig::default());
        let viewer = Viewer::new("usr-a", Role::Professional);
        let content = crate::test_support::content("cnt-x", "usr-b", ContentKind::Post);

        assert_eq!(lc.record_impression(&viewer, &content).await, ImpressionOutcome::Failed);
        let listed = lc.list_active("usr-b", Utc::now()).await;
        assert_eq!(listed.status, SelectionStatus::StoreUnavailable);
        assert!(listed.candidates.is_empty());

        let err = lc
            .create(&viewer, ContentKind::Post, &caption("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Store { .. }));
        assert!(err.is_recoverable());
    }
}
