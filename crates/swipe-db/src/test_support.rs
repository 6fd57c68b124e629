//! Shared test utilities for swipe-db unit tests.

use chrono::{DateTime, Duration, Utc};
use swipe_core::classification::ClassificationCode;
use swipe_core::entities::{Content, User};
use swipe_core::enums::{ContentKind, Role};
use swipe_core::geo::Coordinates;
use swipe_core::query::NewContent;

use crate::SwipeDb;
use crate::service::SwipeService;

/// Create an in-memory `SwipeService`.
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

pub fn post_draft(owner: &str, code: Option<&str>, created_at: DateTime<Utc>) -> NewContent {
    NewContent {
        owner_id: owner.to_string(),
        caption: Some("Need help".into()),
        body: None,
        image_url: None,
        kind: ContentKind::Post,
        expires_at: None,
        classification_code: code.map(|c| ClassificationCode::parse(c).unwrap()),
        created_at,
    }
}

pub fn story_draft(owner: &str, created_at: DateTime<Utc>) -> NewContent {
    NewContent {
        owner_id: owner.to_string(),
        caption: None,
        body: None,
        image_url: Some("stories/x.jpg".into()),
        kind: ContentKind::Story,
        expires_at: Some(created_at + Duration::hours(24)),
        classification_code: None,
        created_at,
    }
}

pub async fn seed_post(svc: &SwipeService, owner: &str, code: Option<&str>) -> Content {
    svc.insert_content(&post_draft(owner, code, Utc::now()))
        .await
        .unwrap()
}
