//! Service layer over the raw database handle.
//!
//! `SwipeService` wraps `SwipeDb`. All repo methods are implemented as
//! `impl SwipeService` blocks under `repos/`.

use swipe_config::StoreConfig;

use crate::SwipeDb;
use crate::error::DatabaseError;

/// Entry point for every store operation.
pub struct SwipeService {
    db: SwipeDb,
}

impl SwipeService {
    /// Create a service over a local database file (`":memory:"` for tests).
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = SwipeDb::open_local(db_path).await?;
        Ok(Self { db })
    }

    /// Create a service over a remote libSQL database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be established.
    pub async fn new_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = SwipeDb::open_remote(url, auth_token).await?;
        Ok(Self { db })
    }

    /// Open whichever database the configuration points at: remote when a URL
    /// and token are both set, otherwise the local file.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn from_config(config: &StoreConfig) -> Result<Self, DatabaseError> {
        if config.is_remote() {
            tracing::debug!(url = %config.url, "opening remote store");
            Self::new_remote(&config.url, &config.auth_token).await
        } else {
            tracing::debug!(path = %config.path, "opening local store");
            Self::new_local(&config.path).await
        }
    }

    /// Create from an existing `SwipeDb` (for testing).
    #[must_use]
    pub const fn from_db(db: SwipeDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &SwipeDb {
        &self.db
    }
}
