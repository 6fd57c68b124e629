//! The data store contract the engine depends on.
//!
//! Every engine component is generic over [`DiscoveryStore`] so that the
//! `libSQL`-backed [`SwipeService`] and in-memory test doubles are
//! interchangeable. Absent rows are `Ok(None)`, never an error.

use std::time::Duration;

use swipe_core::entities::{Content, MatchRecord, MatchSummary, ProfessionalDetail, User};
use swipe_core::query::{ContentFilter, MatchFilter, NewContent, NewMatch};
use swipe_db::error::DatabaseError;
use swipe_db::service::SwipeService;

use crate::error::EngineError;

#[allow(async_fn_in_trait)]
pub trait DiscoveryStore {
    type Error: std::error::Error + Send + Sync + 'static;

    async fn fetch_user(&self, id: &str) -> Result<Option<User>, Self::Error>;

    async fn fetch_professional_detail(
        &self,
        user_id: &str,
    ) -> Result<Option<ProfessionalDetail>, Self::Error>;

    /// Content matching `filter`, newest first.
    async fn fetch_content(&self, filter: &ContentFilter) -> Result<Vec<Content>, Self::Error>;

    async fn insert_content(&self, draft: &NewContent) -> Result<Content, Self::Error>;

    /// Atomically add one view and return the new total.
    async fn increment_content_views(&self, id: &str) -> Result<u64, Self::Error>;

    async fn insert_match(&self, new: &NewMatch) -> Result<MatchRecord, Self::Error>;

    /// Match records matching `filter`, newest first.
    async fn fetch_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchRecord>, Self::Error>;

    async fn matches_involving(&self, user_id: &str) -> Result<Vec<MatchSummary>, Self::Error>;
}

fn absent_as_none<T>(result: Result<T, DatabaseError>) -> Result<Option<T>, DatabaseError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(DatabaseError::NoResult) => Ok(None),
        Err(e) => Err(e),
    }
}

impl DiscoveryStore for SwipeService {
    type Error = DatabaseError;

    async fn fetch_user(&self, id: &str) -> Result<Option<User>, DatabaseError> {
        absent_as_none(self.get_user(id).await)
    }

    async fn fetch_professional_detail(
        &self,
        user_id: &str,
    ) -> Result<Option<ProfessionalDetail>, DatabaseError> {
        absent_as_none(self.get_professional_detail(user_id).await)
    }

    async fn fetch_content(&self, filter: &ContentFilter) -> Result<Vec<Content>, DatabaseError> {
        Self::fetch_content(self, filter).await
    }

    async fn insert_content(&self, draft: &NewContent) -> Result<Content, DatabaseError> {
        Self::insert_content(self, draft).await
    }

    async fn increment_content_views(&self, id: &str) -> Result<u64, DatabaseError> {
        Self::increment_content_views(self, id).await
    }

    async fn insert_match(&self, new: &NewMatch) -> Result<MatchRecord, DatabaseError> {
        Self::insert_match(self, new).await
    }

    async fn fetch_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchRecord>, DatabaseError> {
        Self::fetch_matches(self, filter).await
    }

    async fn matches_involving(&self, user_id: &str) -> Result<Vec<MatchSummary>, DatabaseError> {
        Self::matches_involving(self, user_id).await
    }
}

/// Run one store call under `limit`, mapping both failure shapes into
/// [`EngineError`].
pub(crate) async fn bounded<T, E, F>(
    op: &'static str,
    limit: Duration,
    call: F,
) -> Result<T, EngineError>
where
    F: Future<Output = Result<T, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    match tokio::time::timeout(limit, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(EngineError::Store {
            op,
            source: Box::new(e),
        }),
        Err(_) => Err(EngineError::Timeout { op, limit }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{seed_user, test_service};
    use swipe_core::enums::Role;

    #[tokio::test]
    async fn missing_rows_are_none() {
        let svc = test_service().await;
        assert!(svc.fetch_user("usr-missing").await.unwrap().is_none());
        assert!(
            svc.fetch_professional_detail("usr-missing")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn existing_user_is_some() {
        let svc = test_service().await;
        seed_user(&svc, "usr-a", Role::Individual).await;
        let user = DiscoveryStore::fetch_user(&svc, "usr-a").await.unwrap();
        assert_eq!(user.map(|u| u.role), Some(Role::Individual));
    }

    #[tokio::test]
    async fn bounded_maps_store_errors() {
        let err = bounded("probe", Duration::from_secs(1), async {
            Err::<(), _>(DatabaseError::Query("boom".into()))
        })
        .await
        .unwrap_err();
        assert!(matches!(err, EngineError::Store { op: "probe", .. }));
        assert!(err.is_recoverable());
    }

    #[tokio::test]
    async fn bounded_times_out_hung_calls() {
        let err = bounded(
            "probe",
            Duration::from_millis(50),
            std::future::pending::<Result<(), DatabaseError>>(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, EngineError::Timeout { op: "probe", .. }));
    }
}
