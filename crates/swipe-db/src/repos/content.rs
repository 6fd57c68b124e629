//! Content repository: posts, stories, expiry filtering and view counters.

use chrono::{DateTime, Utc};

use swipe_core::entities::Content;
use swipe_core::enums::ContentKind;
use swipe_core::ids::PREFIX_CONTENT;
use swipe_core::query::{ClassificationFilter, ContentFilter, NewContent};

use crate::error::DatabaseError;
use crate::helpers::{
    format_datetime, get_opt_code, get_opt_string, get_u64, parse_datetime, parse_enum,
    parse_optional_datetime,
};
use crate::service::SwipeService;

const CONTENT_COLUMNS: &str = "id, owner_id, caption, body, image_url, kind, views, expires_at, classification_code, created_at";

fn row_to_content(row: &libsql::Row) -> Result<Content, DatabaseError> {
    Ok(Content {
        id: row.get::<String>(0)?,
        owner_id: row.get::<String>(1)?,
        caption: get_opt_string(row, 2)?,
        body: get_opt_string(row, 3)?,
        image_url: get_opt_string(row, 4)?,
        kind: parse_enum(&row.get::<String>(5)?)?,
        views: get_u64(row, 6)?,
        expires_at: parse_optional_datetime(get_opt_string(row, 7)?.as_deref())?,
        classification_code: get_opt_code(row, 8)?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

impl SwipeService {
    /// Persist a new post or story. The id is generated here and `views`
    /// starts at zero.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails (unknown owner, a post
    /// carrying an expiry, ...).
    pub async fn insert_content(&self, draft: &NewContent) -> Result<Content, DatabaseError> {
        let id = self.db().generate_id(PREFIX_CONTENT).await?;
        let expires_at = draft.expires_at.as_ref().map(format_datetime);

        self.db()
            .execute_with(
                "INSERT INTO content (id, owner_id, caption, body, image_url, kind, views, expires_at, classification_code, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7, ?8, ?9)",
                || {
                    libsql::params![
                        id.as_str(),
                        draft.owner_id.as_str(),
                        draft.caption.as_deref(),
                        draft.body.as_deref(),
                        draft.image_url.as_deref(),
                        draft.kind.as_str(),
                        expires_at.as_deref(),
                        draft.classification_code.as_ref().map(|c| c.as_str()),
                        format_datetime(&draft.created_at)
                    ]
                },
            )
            .await?;

        Ok(Content {
            id,
            owner_id: draft.owner_id.clone(),
            caption: draft.caption.clone(),
            body: draft.body.clone(),
            image_url: draft.image_url.clone(),
            kind: draft.kind,
            views: 0,
            expires_at: draft.expires_at,
            classification_code: draft.classification_code.clone(),
            created_at: draft.created_at,
        })
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no content has this id.
    pub async fn get_content(&self, id: &str) -> Result<Content, DatabaseError> {
        let sql = format!("SELECT {CONTENT_COLUMNS} FROM content WHERE id = ?1");
        let mut rows = self.db().query_with(&sql, || [id]).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_content(&row)
    }

    /// Query content with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn fetch_content(&self, filter: &ContentFilter) -> Result<Vec<Content>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref owner) = filter.owner_id {
            params.push(libsql::Value::Text(owner.clone()));
            conditions.push(format!("owner_id = ?{}", params.len()));
        }
        if let Some(ref owner) = filter.exclude_owner_id {
            params.push(libsql::Value::Text(owner.clone()));
            conditions.push(format!("owner_id <> ?{}", params.len()));
        }
        if let Some(kind) = filter.kind {
            params.push(libsql::Value::Text(kind.as_str().to_string()));
            conditions.push(format!("kind = ?{}", params.len()));
        }
        match &filter.classification {
            ClassificationFilter::Any => {}
            ClassificationFilter::Exactly(code) => {
                params.push(libsql::Value::Text(code.as_str().to_string()));
                conditions.push(format!("classification_code = ?{}", params.len()));
            }
            ClassificationFilter::ExactlyOrGeneral(code) => {
                params.push(libsql::Value::Text(code.as_str().to_string()));
                conditions.push(format!(
                    "(classification_code = ?{} OR classification_code IS NULL)",
                    params.len()
                ));
            }
        }
        if let Some(ref now) = filter.active_at {
            params.push(libsql::Value::Text(format_datetime(now)));
            conditions.push(format!(
                "(kind = '{}' OR (expires_at IS NOT NULL AND expires_at > ?{}))",
                ContentKind::Post.as_str(),
                params.len()
            ));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit_clause = filter
            .limit
            .map(|limit| format!("LIMIT {limit}"))
            .unwrap_or_default();
        let sql = format!(
            "SELECT {CONTENT_COLUMNS} FROM content {where_clause}
             ORDER BY created_at DESC, rowid DESC {limit_clause}"
        );

        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        let mut items = Vec::new();
        while let Some(row) = rows.next().await? {
            items.push(row_to_content(&row)?);
        }
        Ok(items)
    }

    /// Overwrite a view counter with a caller-computed value.
    ///
    /// Read-then-write callers lose increments under concurrency; use
    /// [`Self::increment_content_views`] for impressions.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no content has this id.
    pub async fn update_content_views(&self, id: &str, views: u64) -> Result<(), DatabaseError> {
        let views = i64::try_from(views)
            .map_err(|_| DatabaseError::InvalidState(format!("view count {views} overflows")))?;
        let changed = self
            .db()
            .execute_with("UPDATE content SET views = ?1 WHERE id = ?2", || {
                libsql::params![views, id]
            })
            .await?;
        if changed == 0 {
            return Err(DatabaseError::NoResult);
        }
        Ok(())
    }

    /// Add exactly one view in a single statement and return the new count.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no content has this id.
    pub async fn increment_content_views(&self, id: &str) -> Result<u64, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                "UPDATE content SET views = views + 1 WHERE id = ?1 RETURNING views",
                || [id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        get_u64(&row, 0)
    }

    /// Delete stories that expired at or before `now`. Listings already hide
    /// them, so this only reclaims space.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the DELETE fails.
    pub async fn purge_expired_stories(&self, now: DateTime<Utc>) -> Result<u64, DatabaseError> {
        let now = format_datetime(&now);
        let purged = self
            .db()
            .execute_with(
                "DELETE FROM content WHERE kind = 'story' AND expires_at IS NOT NULL AND expires_at <= ?1",
                || [now.as_str()],
            )
            .await?;
        if purged > 0 {
            tracing::debug!(purged, "purged expired stories");
        }
        Ok(purged)
    }
}
