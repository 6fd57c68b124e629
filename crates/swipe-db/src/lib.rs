//! # swipe-db
//!
//! libSQL data store for the swipe matching engine.
//!
//! Holds users, professional details, content (posts and stories) and the
//! match ledger. Every operation the engine consumes from its environment is
//! implemented here as a method on [`service::SwipeService`], including the
//! atomic view-counter increment.

pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod retry;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

use error::DatabaseError;
use libsql::Builder;
use libsql::params::IntoParams;

use crate::retry::{RetryConfig, is_transient_error};

/// Central database handle.
///
/// Wraps a libSQL database and a single connection. All statements go
/// through [`SwipeDb::execute_with`] / [`SwipeDb::query_with`] so transient
/// failures are retried uniformly.
pub struct SwipeDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    retry: RetryConfig,
    remote: bool,
}

impl SwipeDb {
    /// Open a local database at the given path (`":memory:"` for tests).
    ///
    /// Runs migrations automatically on first open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let swipe_db = Self {
            db,
            conn,
            retry: RetryConfig::default(),
            remote: false,
        };
        swipe_db.run_migrations().await?;
        Ok(swipe_db)
    }

    /// Open a remote libSQL database.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the connection cannot be established or
    /// migrations fail.
    pub async fn open_remote(url: &str, auth_token: &str) -> Result<Self, DatabaseError> {
        let db = Builder::new_remote(url.to_string(), auth_token.to_string())
            .build()
            .await?;
        let conn = db.connect()?;
        let swipe_db = Self {
            db,
            conn,
            retry: RetryConfig::default(),
            remote: true,
        };
        swipe_db.run_migrations().await?;
        Ok(swipe_db)
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.remote
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"cnt-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .query_with("SELECT ?1 || '-' || lower(hex(randomblob(4)))", || [prefix])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }

    /// Execute a statement, re-issuing it on transient errors.
    ///
    /// `params` is called once per attempt because libSQL consumes the
    /// parameter list.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` once retries are exhausted or the error
    /// is not transient.
    pub async fn execute_with<F, P>(&self, sql: &str, params: F) -> Result<u64, DatabaseError>
    where
        F: Fn() -> P,
        P: IntoParams,
    {
        let mut attempt = 1;
        loop {
            match self.conn.execute(sql, params()).await {
                Ok(n) => return Ok(n),
                Err(e) if attempt < self.retry.max_attempts && is_transient_error(&e) => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(attempt, ?delay, error = %e, "transient store error; retrying statement");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Run a query, re-issuing it on transient errors.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` once retries are exhausted or the error
    /// is not transient.
    pub async fn query_with<F, P>(&self, sql: &str, params: F) -> Result<libsql::Rows, DatabaseError>
    where
        F: Fn() -> P,
        P: IntoParams,
    {
        let mut attempt = 1;
        loop {
            match self.conn.query(sql, params()).await {
                Ok(rows) => return Ok(rows),
                Err(e) if attempt < self.retry.max_attempts && is_transient_error(&e) => {
                    let delay = self.retry.delay_for(attempt);
                    tracing::warn!(attempt, ?delay, error = %e, "transient store error; retrying query");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
