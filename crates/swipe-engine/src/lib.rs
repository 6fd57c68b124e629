//! # swipe-engine
//!
//! Discovery and matching on top of any [`DiscoveryStore`]:
//!
//! - [`selector::CandidateSelector`] builds role-specific candidate decks
//! - [`lifecycle::ContentLifecycle`] creates content, expires stories and counts views
//! - [`ledger::MatchLedger`] appends swipe decisions and reads match history
//! - [`session::DiscoverySession`] walks a deck with gesture outcomes
//!
//! Every store call is bounded by the configured request timeout.

pub mod context;
pub mod error;
pub mod ledger;
pub mod lifecycle;
pub mod selector;
pub mod session;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

use std::sync::Arc;

use swipe_config::SwipeConfig;
use swipe_core::gesture::GestureClassifier;

pub use context::Viewer;
pub use error::EngineError;
pub use store::DiscoveryStore;

use ledger::MatchLedger;
use lifecycle::ContentLifecycle;
use selector::CandidateSelector;
use session::DiscoverySession;

/// Wires every engine component to one store and one configuration.
pub struct SwipeEngine<S> {
    config: SwipeConfig,
    lifecycle: ContentLifecycle<S>,
    selector: CandidateSelector<S>,
    ledger: MatchLedger<S>,
}

impl<S: DiscoveryStore> SwipeEngine<S> {
    #[must_use]
    pub fn new(store: Arc<S>, config: SwipeConfig) -> Self {
        Self {
            lifecycle: ContentLifecycle::new(Arc::clone(&store), &config.discovery),
            selector: CandidateSelector::new(Arc::clone(&store), &config.discovery),
            ledger: MatchLedger::new(store, &config.discovery),
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &SwipeConfig {
        &self.config
    }

    #[must_use]
    pub const fn lifecycle(&self) -> &ContentLifecycle<S> {
        &self.lifecycle
    }

    #[must_use]
    pub const fn selector(&self) -> &CandidateSelector<S> {
        &self.selector
    }

    #[must_use]
    pub const fn ledger(&self) -> &MatchLedger<S> {
        &self.ledger
    }

    /// A fresh, unloaded deck for `viewer`.
    #[must_use]
    pub fn session(&self, viewer: Viewer) -> DiscoverySession<S> {
        DiscoverySession::new(viewer, self.selector.clone(), self.ledger.clone())
    }

    /// A classifier using the configured thresholds.
    #[must_use]
    pub const fn gesture_classifier(&self) -> GestureClassifier {
        GestureClassifier::new(self.config.gesture.thresholds())
    }
}
