//! Candidate selection for both roles.
//!
//! Professionals see open requests: active content from other users whose
//! code equals theirs or is absent, minus anything they already swiped.
//! Individuals see the professionals who swiped on their content, enriched
//! with profile details and sorted by distance.
//!
//! Selection never fails. A store outage yields an empty list tagged
//! [`SelectionStatus::StoreUnavailable`]; a per-candidate enrichment failure
//! only affects that candidate.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use swipe_config::DiscoveryConfig;
use swipe_core::entities::{Content, ProfessionalDetail, User};
use swipe_core::enums::{ContentKind, Role};
use swipe_core::geo::DisplayDistance;
use swipe_core::query::{ClassificationFilter, ContentFilter, MatchFilter};

use crate::context::Viewer;
use crate::store::{DiscoveryStore, bounded};

/// Why a selection came back empty without touching the candidate pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
    /// Professionals without a classification code have no requests to see.
    MissingClassificationCode,
    /// Individuals who never published anything cannot have been swiped on.
    NoOwnedContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStatus {
    Ready,
    PreconditionNotMet(Precondition),
    StoreUnavailable,
}

/// An ordered candidate list plus how it was obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<T> {
    pub candidates: Vec<T>,
    pub status: SelectionStatus,
}

impl<T> Selection<T> {
    #[must_use]
    pub const fn ready(candidates: Vec<T>) -> Self {
        Self {
            candidates,
            status: SelectionStatus::Ready,
        }
    }

    #[must_use]
    pub const fn precondition(reason: Precondition) -> Self {
        Self {
            candidates: Vec::new(),
            status: SelectionStatus::PreconditionNotMet(reason),
        }
    }

    #[must_use]
    pub const fn unavailable() -> Self {
        Self {
            candidates: Vec::new(),
            status: SelectionStatus::StoreUnavailable,
        }
    }

    fn map<U>(self, f: impl FnMut(T) -> U) -> Selection<U> {
        Selection {
            candidates: self.candidates.into_iter().map(f).collect(),
            status: self.status,
        }
    }
}

/// A professional who swiped on the viewer's content.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfessionalCandidate {
    pub user: User,
    /// `None` when the detail row is missing or could not be loaded.
    pub detail: Option<ProfessionalDetail>,
    /// `None` when either side has no coordinates.
    pub distance_km: Option<f64>,
    pub has_active_story: bool,
}

impl ProfessionalCandidate {
    #[must_use]
    pub fn display_distance(&self) -> Option<DisplayDistance> {
        self.distance_km.map(DisplayDistance::from_km)
    }
}

/// One card in a discovery deck.
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    Request(Content),
    Professional(ProfessionalCandidate),
}

impl Candidate {
    /// The user this card represents.
    #[must_use]
    pub fn owner_id(&self) -> &str {
        match self {
            Self::Request(content) => &content.owner_id,
            Self::Professional(p) => &p.user.id,
        }
    }
}

/// Defined distances ascending, then unknown distances, each group keeping
/// its incoming order.
fn by_distance(a: &ProfessionalCandidate, b: &ProfessionalCandidate) -> Ordering {
    match (a.distance_km, b.distance_km) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub struct CandidateSelector<S> {
    store: Arc<S>,
    timeout: Duration,
}

impl<S> Clone for CandidateSelector<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            timeout: self.timeout,
        }
    }
}

impl<S: DiscoveryStore> CandidateSelector<S> {
    #[must_use]
    pub fn new(store: Arc<S>, config: &DiscoveryConfig) -> Self {
        Self {
            store,
            timeout: config.request_timeout(),
        }
    }

    /// Candidates for `viewer`, dispatched on role.
    pub async fn select(&self, viewer: &Viewer) -> Selection<Candidate> {
        self.select_at(viewer, Utc::now()).await
    }

    pub async fn select_at(&self, viewer: &Viewer, now: DateTime<Utc>) -> Selection<Candidate> {
        match viewer.role {
            Role::Professional => self
                .professional_requests(viewer, now)
                .await
                .map(Candidate::Request),
            Role::Individual => self
                .interested_professionals(viewer, now)
                .await
                .map(Candidate::Professional),
        }
    }

    /// Open requests a professional has not acted on yet, newest first.
    pub async fn professional_requests(
        &self,
        viewer: &Viewer,
        now: DateTime<Utc>,
    ) -> Selection<Content> {
        let Some(code) = viewer.classification_code.clone() else {
            return Selection::precondition(Precondition::MissingClassificationCode);
        };
        let pool_filter = ContentFilter {
            exclude_owner_id: Some(viewer.user_id.clone()),
            classification: ClassificationFilter::ExactlyOrGeneral(code),
            active_at: Some(now),
            ..ContentFilter::default()
        };
        let acted_filter = MatchFilter {
            actor_id: Some(viewer.user_id.clone()),
            ..MatchFilter::default()
        };

        let (pool, acted) = tokio::join!(
            bounded("fetch_content", self.timeout, self.store.fetch_content(&pool_filter)),
            bounded("fetch_matches", self.timeout, self.store.fetch_matches(&acted_filter)),
        );
        let (mut pool, acted) = match (pool, acted) {
            (Ok(pool), Ok(acted)) => (pool, acted),
            (Err(error), _) | (_, Err(error)) => {
                tracing::warn!(%error, viewer = %viewer.user_id, "request selection degraded to empty");
                return Selection::unavailable();
            }
        };

        let seen: HashSet<String> = acted.into_iter().filter_map(|m| m.content_id).collect();
        pool.retain(|c| pool_filter.matches(c) && !seen.contains(&c.id));
        pool.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        tracing::debug!(viewer = %viewer.user_id, count = pool.len(), "requests selected");
        Selection::ready(pool)
    }

    /// Professionals who swiped on the viewer's content, nearest first.
    pub async fn interested_professionals(
        &self,
        viewer: &Viewer,
        now: DateTime<Utc>,
    ) -> Selection<ProfessionalCandidate> {
        let owned_filter = ContentFilter {
            owner_id: Some(viewer.user_id.clone()),
            ..ContentFilter::default()
        };
        let owned = match bounded(
            "fetch_content",
            self.timeout,
            self.store.fetch_content(&owned_filter),
        )
        .await
        {
            Ok(owned) => owned,
            Err(error) => {
                tracing::warn!(%error, viewer = %viewer.user_id, "owned content lookup failed");
                return Selection::unavailable();
            }
        };
        if owned.is_empty() {
            return Selection::precondition(Precondition::NoOwnedContent);
        }

        let interest_filter = MatchFilter {
            target_id: Some(viewer.user_id.clone()),
            content_ids: Some(owned.into_iter().map(|c| c.id).collect()),
            ..MatchFilter::default()
        };
        let records = match bounded(
            "fetch_matches",
            self.timeout,
            self.store.fetch_matches(&interest_filter),
        )
        .await
        {
            Ok(records) => records,
            Err(error) => {
                tracing::warn!(%error, viewer = %viewer.user_id, "interest lookup failed");
                return Selection::unavailable();
            }
        };

        let mut seen = HashSet::new();
        let actors: Vec<String> = records
            .into_iter()
            .map(|m| m.actor_id)
            .filter(|id| *id != viewer.user_id && seen.insert(id.clone()))
            .collect();

        let enriched = join_all(actors.iter().map(|id| self.enrich(viewer, id, now))).await;
        let mut candidates: Vec<ProfessionalCandidate> = enriched.into_iter().flatten().collect();
        candidates.sort_by(by_distance);
        tracing::debug!(viewer = %viewer.user_id, count = candidates.len(), "professionals selected");
        Selection::ready(candidates)
    }

    async fn enrich(
        &self,
        viewer: &Viewer,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Option<ProfessionalCandidate> {
        let stories_filter = ContentFilter {
            owner_id: Some(user_id.to_string()),
            kind: Some(ContentKind::Story),
            active_at: Some(now),
            limit: Some(1),
            ..ContentFilter::default()
        };
        let (user, detail, stories) = tokio::join!(
            bounded("fetch_user", self.timeout, self.store.fetch_user(user_id)),
            bounded(
                "fetch_professional_detail",
                self.timeout,
                self.store.fetch_professional_detail(user_id),
            ),
            bounded("fetch_content", self.timeout, self.store.fetch_content(&stories_filter)),
        );

        let user = match user {
            Ok(Some(user)) if user.role == Role::Professional => user,
            Ok(_) => return None,
            Err(error) => {
                tracing::warn!(%error, user_id, "dropping candidate without profile");
                return None;
            }
        };
        let detail = detail.unwrap_or_else(|error| {
            tracing::warn!(%error, user_id, "professional detail unavailable");
            None
        });
        let has_active_story = match stories {
            Ok(stories) => stories.iter().any(|s| stories_filter.matches(s)),
            Err(error) => {
                tracing::warn!(%error, user_id, "story lookup failed");
                false
            }
        };
        let distance_km = viewer
            .coordinates
            .zip(user.coordinates)
            .map(|(from, to)| from.distance_km(&to));

        Some(ProfessionalCandidate {
            user,
            detail,
            distance_km,
            has_active_story,
        })
    }
}
