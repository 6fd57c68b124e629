//! Race-injection tests for the content view counter.
//!
//! Two viewers open the same content at the same moment. With a
//! read-then-write update both compute the same successor and one view is
//! lost; the single-statement increment keeps both.

use chrono::Utc;
use tempfile::TempDir;

use swipe_core::entities::User;
use swipe_core::enums::{ContentKind, Role};
use swipe_core::query::NewContent;
use swipe_db::service::SwipeService;

async fn seeded(svc: &SwipeService) -> String {
    svc.upsert_user(&User {
        id: "usr-owner".into(),
        role: Role::Individual,
        display_name: "Owner".into(),
        city: None,
        address: None,
        coordinates: None,
        classification_code: None,
        created_at: Utc::now(),
    })
    .await
    .unwrap();
    let content = svc
        .insert_content(&NewContent {
            owner_id: "usr-owner".into(),
            caption: Some("Repeindre un salon".into()),
            body: None,
            image_url: None,
            kind: ContentKind::Post,
            expires_at: None,
            classification_code: None,
            created_at: Utc::now(),
        })
        .await
        .unwrap();
    svc.update_content_views(&content.id, 5).await.unwrap();
    content.id
}

#[tokio::test]
async fn interleaved_read_then_write_loses_a_view() {
    let svc = SwipeService::new_local(":memory:").await.unwrap();
    let id = seeded(&svc).await;

    // Both viewers read before either writes.
    let seen_by_first = svc.get_content(&id).await.unwrap().views;
    let seen_by_second = svc.get_content(&id).await.unwrap().views;
    svc.update_content_views(&id, seen_by_first + 1).await.unwrap();
    svc.update_content_views(&id, seen_by_second + 1).await.unwrap();

    assert_eq!(svc.get_content(&id).await.unwrap().views, 6);
}

#[tokio::test]
async fn concurrent_atomic_increments_count_every_view() {
    let svc = SwipeService::new_local(":memory:").await.unwrap();
    let id = seeded(&svc).await;

    let (a, b) = tokio::join!(
        svc.increment_content_views(&id),
        svc.increment_content_views(&id)
    );
    let mut returned = vec![a.unwrap(), b.unwrap()];
    returned.sort_unstable();

    assert_eq!(returned, vec![6, 7]);
    assert_eq!(svc.get_content(&id).await.unwrap().views, 7);
}

#[tokio::test]
async fn increments_from_separate_connections_accumulate() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("swipe.db");
    let path = path.to_str().unwrap();

    let first = SwipeService::new_local(path).await.unwrap();
    let id = seeded(&first).await;
    let second = SwipeService::new_local(path).await.unwrap();

    for _ in 0..10 {
        let (a, b) = tokio::join!(
            first.increment_content_views(&id),
            second.increment_content_views(&id)
        );
        a.unwrap();
        b.unwrap();
    }

    assert_eq!(first.get_content(&id).await.unwrap().views, 25);
}
