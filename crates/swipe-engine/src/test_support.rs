//! Shared test utilities for swipe-engine unit tests.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use swipe_core::entities::{Content, MatchRecord, MatchSummary, ProfessionalDetail, User};
use swipe_core::enums::{ContentKind, Role};
use swipe_core::geo::Coordinates;
use swipe_core::query::{ContentFilter, MatchFilter, NewContent, NewMatch};
use swipe_db::SwipeDb;
use swipe_db::error::DatabaseError;
use swipe_db::service::SwipeService;
use tokio::sync::Notify;

use crate::store::DiscoveryStore;

pub async fn test_service() -> SwipeService {
    let db = SwipeDb::open_local(":memory:").await.unwrap();
    SwipeService::from_db(db)
}

pub fn user(id: &str, role: Role) -> User {
    User {
        id: id.to_string(),
        role,
        display_name: format!("name of {id}"),
        city: None,
        address: None,
        coordinates: None,
        classification_code: None,
        created_at: Utc::now(),
    }
}

pub fn located(mut user: User, lat: f64, lon: f64) -> User {
    user.coordinates = Some(Coordinates::new(lat, lon).unwrap());
    user
}

pub async fn seed_user(svc: &SwipeService, id: &str, role: Role) -> User {
    let u = user(id, role);
    svc.upsert_user(&u).await.unwrap();
    u
}

pub fn content(id: &str, owner: &str, kind: ContentKind) -> Content {
    Content {
        id: id.to_string(),
        owner_id: owner.to_string(),
        caption: Some("hello".into()),
        body: None,
        image_url: None,
        kind,
        views: 0,
        expires_at: None,
        classification_code: None,
        created_at: Utc::now(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TestStoreError {
    #[error("store offline")]
    Offline,
    #[error(transparent)]
    Db(#[from] DatabaseError),
}

/// Every call fails, or never answers when `hang` is set.
#[derive(Debug, Default)]
pub struct FailingStore {
    pub hang: bool,
}

impl FailingStore {
    async fn fail<T>(&self) -> Result<T, TestStoreError> {
        if self.hang {
            std::future::pending::<()>().await;
        }
        Err(TestStoreError::Offline)
    }
}

impl DiscoveryStore for FailingStore {
    type Error = TestStoreError;

    async fn fetch_user(&self, _: &str) -> Result<Option<User>, TestStoreError> {
        self.fail().await
    }
    async fn fetch_professional_detail(
        &self,
        _: &str,
    ) -> Result<Option<ProfessionalDetail>, TestStoreError> {
        self.fail().await
    }
    async fn fetch_content(&self, _: &ContentFilter) -> Result<Vec<Content>, TestStoreError> {
        self.fail().await
    }
    async fn insert_content(&self, _: &NewContent) -> Result<Content, TestStoreError> {
        self.fail().await
    }
    async fn increment_content_views(&self, _: &str) -> Result<u64, TestStoreError> {
        self.fail().await
    }
    async fn insert_match(&self, _: &NewMatch) -> Result<MatchRecord, TestStoreError> {
        self.fail().await
    }
    async fn fetch_matches(&self, _: &MatchFilter) -> Result<Vec<MatchRecord>, TestStoreError> {
        self.fail().await
    }
    async fn matches_involving(&self, _: &str) -> Result<Vec<MatchSummary>, TestStoreError> {
        self.fail().await
    }
}

/// A real store with injectable per-operation failures and an optional
/// gate that holds pool lookups until released.
pub struct ScriptedStore {
    pub inner: SwipeService,
    pub failing_users: HashSet<String>,
    pub fail_details: bool,
    pub fail_stories: bool,
    pub fail_insert_match: bool,
    pub gate: Option<Arc<Gate>>,
}

#[derive(Debug, Default)]
pub struct Gate {
    pub entered: Notify,
    pub released: Notify,
}

impl ScriptedStore {
    pub fn new(inner: SwipeService) -> Self {
        Self {
            inner,
            failing_users: HashSet::new(),
            fail_details: false,
            fail_stories: false,
            fail_insert_match: false,
            gate: None,
        }
    }
}

impl DiscoveryStore for ScriptedStore {
    type Error = TestStoreError;

    async fn fetch_user(&self, id: &str) -> Result<Option<User>, TestStoreError> {
        if self.failing_users.contains(id) {
            return Err(TestStoreError::Offline);
        }
        Ok(DiscoveryStore::fetch_user(&self.inner, id).await?)
    }

    async fn fetch_professional_detail(
        &self,
        user_id: &str,
    ) -> Result<Option<ProfessionalDetail>, TestStoreError> {
        if self.fail_details {
            return Err(TestStoreError::Offline);
        }
        Ok(DiscoveryStore::fetch_professional_detail(&self.inner, user_id).await?)
    }

    async fn fetch_content(&self, filter: &ContentFilter) -> Result<Vec<Content>, TestStoreError> {
        if filter.kind == Some(ContentKind::Story) && self.fail_stories {
            return Err(TestStoreError::Offline);
        }
        if let Some(gate) = &self.gate {
            gate.entered.notify_one();
            gate.released.notified().await;
        }
        Ok(self.inner.fetch_content(filter).await?)
    }

    async fn insert_content(&self, draft: &NewContent) -> Result<Content, TestStoreError> {
        Ok(self.inner.insert_content(draft).await?)
    }

    async fn increment_content_views(&self, id: &str) -> Result<u64, TestStoreError> {
        Ok(self.inner.increment_content_views(id).await?)
    }

    async fn insert_match(&self, new: &NewMatch) -> Result<MatchRecord, TestStoreError> {
        if self.fail_insert_match {
            return Err(TestStoreError::Offline);
        }
        Ok(self.inner.insert_match(new).await?)
    }

    async fn fetch_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchRecord>, TestStoreError> {
        Ok(self.inner.fetch_matches(filter).await?)
    }

    async fn matches_involving(&self, user_id: &str) -> Result<Vec<MatchSummary>, TestStoreError> {
        Ok(self.inner.matches_involving(user_id).await?)
    }
}
