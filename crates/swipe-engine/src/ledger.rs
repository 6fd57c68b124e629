//! Append-only record of swipe decisions.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use swipe_config::DiscoveryConfig;
use swipe_core::entities::{Content, MatchRecord, MatchSummary};
use swipe_core::enums::SwipeAction;
use swipe_core::errors::CoreError;
use swipe_core::query::NewMatch;

use crate::error::EngineError;
use crate::store::{DiscoveryStore, bounded};

pub struct MatchLedger<S> {
    store: Arc<S>,
    timeout: Duration,
}

impl<S> Clone for MatchLedger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            timeout: self.timeout,
        }
    }
}

impl<S: DiscoveryStore> MatchLedger<S> {
    #[must_use]
    pub fn new(store: Arc<S>, config: &DiscoveryConfig) -> Self {
        Self {
            store,
            timeout: config.request_timeout(),
        }
    }

    /// Append a decision by `actor_id` about `target_id`, optionally tied to
    /// the content that prompted it, which `target_id` must own. Recording the
    /// same content twice for the same actor returns the first record.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for blank or identical ids, or content owned by someone
    /// other than the target; `Store`/`Timeout` when the write fails.
    pub async fn record(
        &self,
        actor_id: &str,
        target_id: &str,
        action: SwipeAction,
        content: Option<&Content>,
    ) -> Result<MatchRecord, EngineError> {
        if actor_id.trim().is_empty() || target_id.trim().is_empty() {
            return Err(CoreError::Validation("actor and target ids are required".into()).into());
        }
        if actor_id == target_id {
            return Err(CoreError::Validation("cannot swipe on yourself".into()).into());
        }
        if let Some(content) = content.filter(|c| c.owner_id != target_id) {
            return Err(CoreError::Validation(format!(
                "content {} belongs to {}, not {target_id}",
                content.id, content.owner_id
            ))
            .into());
        }
        let new = NewMatch {
            actor_id: actor_id.to_string(),
            target_id: target_id.to_string(),
            action,
            content_id: content.map(|c| c.id.clone()),
            created_at: Utc::now(),
        };
        let record = bounded("insert_match", self.timeout, self.store.insert_match(&new)).await?;
        tracing::debug!(match_id = %record.id, actor_id, target_id, %action, "swipe recorded");
        Ok(record)
    }

    /// Every record where `user_id` is actor or target, newest first.
    ///
    /// # Errors
    ///
    /// `Store`/`Timeout` when the lookup fails.
    pub async fn matches_involving(&self, user_id: &str) -> Result<Vec<MatchSummary>, EngineError> {
        bounded(
            "matches_involving",
            self.timeout,
            self.store.matches_involving(user_id),
        )
        .await
    }
}
