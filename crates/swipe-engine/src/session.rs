//! A viewer's discovery deck.
//!
//! The session owns the ordered candidates and resolves the top card with
//! whatever the gesture classifier produced. Loads are tagged with an epoch;
//! ending the session or starting a newer load makes older results stale and
//! they are dropped on arrival.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use swipe_core::entities::MatchRecord;
use swipe_core::enums::SwipeAction;
use swipe_core::gesture::GestureClassifier;

use crate::context::Viewer;
use crate::ledger::MatchLedger;
use crate::selector::{Candidate, CandidateSelector, SelectionStatus};
use crate::store::DiscoveryStore;

/// Cancellation handle shared between a session and whoever owns its
/// lifetime (a screen, a connection). Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct SessionHandle {
    epoch: Arc<AtomicU64>,
    ended: Arc<AtomicBool>,
}

impl SessionHandle {
    /// Stop the session. In-flight loads complete but their results are
    /// discarded.
    pub fn end(&self) {
        self.ended.store(true, Ordering::SeqCst);
        self.epoch.fetch_add(1, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_ended(&self) -> bool {
        self.ended.load(Ordering::SeqCst)
    }

    fn next_ticket(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, ticket: u64) -> bool {
        !self.is_ended() && self.epoch.load(Ordering::SeqCst) == ticket
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied(SelectionStatus),
    /// The session ended or a newer load started while this one ran.
    Discarded,
}

/// What resolving the top card did.
#[derive(Debug, Clone, PartialEq)]
pub struct SwipeOutcome {
    pub action: SwipeAction,
    pub candidate: Candidate,
    /// `None` when no record applies (interest decks) or the write failed.
    pub record: Option<MatchRecord>,
}

pub struct DiscoverySession<S> {
    viewer: Viewer,
    selector: CandidateSelector<S>,
    ledger: MatchLedger<S>,
    deck: VecDeque<Candidate>,
    status: Option<SelectionStatus>,
    handle: SessionHandle,
}

impl<S: DiscoveryStore> DiscoverySession<S> {
    #[must_use]
    pub fn new(viewer: Viewer, selector: CandidateSelector<S>, ledger: MatchLedger<S>) -> Self {
        Self {
            viewer,
            selector,
            ledger,
            deck: VecDeque::new(),
            status: None,
            handle: SessionHandle::default(),
        }
    }

    #[must_use]
    pub const fn viewer(&self) -> &Viewer {
        &self.viewer
    }

    #[must_use]
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Status of the last applied load; `None` before the first one.
    #[must_use]
    pub const fn status(&self) -> Option<SelectionStatus> {
        self.status
    }

    /// Replace the deck with a fresh selection.
    pub async fn reload(&mut self) -> LoadOutcome {
        if self.handle.is_ended() {
            return LoadOutcome::Discarded;
        }
        let ticket = self.handle.next_ticket();
        let selection = self.selector.select(&self.viewer).await;
        if !self.handle.is_current(ticket) {
            tracing::debug!(viewer = %self.viewer.user_id, "discarding stale candidate load");
            return LoadOutcome::Discarded;
        }
        self.deck = selection.candidates.into();
        self.status = Some(selection.status);
        LoadOutcome::Applied(selection.status)
    }

    /// The card on top of the deck.
    #[must_use]
    pub fn current(&self) -> Option<&Candidate> {
        self.deck.front()
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.deck.len()
    }

    /// Apply a classified gesture to the top card. `None` means the card
    /// snapped back and nothing changes.
    ///
    /// Swipes on requests are written to the ledger. A failed write is
    /// logged and the deck still advances.
    pub async fn resolve(&mut self, action: Option<SwipeAction>) -> Option<SwipeOutcome> {
        let action = action?;
        let candidate = self.deck.pop_front()?;
        let record = match &candidate {
            Candidate::Request(content) => match self
                .ledger
                .record(&self.viewer.user_id, &content.owner_id, action, Some(content))
                .await
            {
                Ok(record) => Some(record),
                Err(error) => {
                    tracing::warn!(%error, content_id = %content.id, "swipe not recorded");
                    None
                }
            },
            Candidate::Professional(_) => None,
        };
        Some(SwipeOutcome {
            action,
            candidate,
            record,
        })
    }

    /// Finish the classifier's drag and resolve the top card with the result.
    pub async fn release(&mut self, classifier: &mut GestureClassifier) -> Option<SwipeOutcome> {
        let action = classifier.end();
        self.resolve(action).await
    }
}
