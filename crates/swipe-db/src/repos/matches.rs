//! Match ledger repository.
//!
//! Append-only swipe decisions. A given actor holds at most one record per
//! content item; repeating the swipe returns the original record.

use swipe_core::entities::{MatchRecord, MatchSummary};
use swipe_core::ids::PREFIX_MATCH;
use swipe_core::query::{MatchFilter, NewMatch};

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_opt_string, parse_datetime, parse_enum};
use crate::service::SwipeService;

const MATCH_COLUMNS: &str = "id, actor_id, target_id, action, matched, content_id, created_at";

fn row_to_match(row: &libsql::Row) -> Result<MatchRecord, DatabaseError> {
    Ok(MatchRecord {
        id: row.get::<String>(0)?,
        actor_id: row.get::<String>(1)?,
        target_id: row.get::<String>(2)?,
        action: parse_enum(&row.get::<String>(3)?)?,
        matched: row.get::<i64>(4)? != 0,
        content_id: get_opt_string(row, 5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

impl SwipeService {
    /// Append a swipe decision. `matched` is always stored as `false`.
    ///
    /// When the actor already holds a record for the same content item the
    /// existing record is returned and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails (e.g., unknown user).
    pub async fn insert_match(&self, new: &NewMatch) -> Result<MatchRecord, DatabaseError> {
        let id = self.db().generate_id(PREFIX_MATCH).await?;

        let inserted = self
            .db()
            .execute_with(
                "INSERT OR IGNORE INTO matches (id, actor_id, target_id, action, matched, content_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, 0, ?5, ?6)",
                || {
                    libsql::params![
                        id.as_str(),
                        new.actor_id.as_str(),
                        new.target_id.as_str(),
                        new.action.as_str(),
                        new.content_id.as_deref(),
                        format_datetime(&new.created_at)
                    ]
                },
            )
            .await?;

        if inserted == 0 {
            if let Some(content_id) = new.content_id.as_deref() {
                tracing::debug!(
                    actor_id = %new.actor_id,
                    content_id,
                    "duplicate swipe; returning existing record"
                );
                return self.find_match_for_content(&new.actor_id, content_id).await;
            }
            return Err(DatabaseError::InvalidState(format!(
                "match {id} was not inserted"
            )));
        }

        Ok(MatchRecord {
            id,
            actor_id: new.actor_id.clone(),
            target_id: new.target_id.clone(),
            action: new.action,
            matched: false,
            content_id: new.content_id.clone(),
            created_at: new.created_at,
        })
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no record has this id.
    pub async fn get_match(&self, id: &str) -> Result<MatchRecord, DatabaseError> {
        let sql = format!("SELECT {MATCH_COLUMNS} FROM matches WHERE id = ?1");
        let mut rows = self.db().query_with(&sql, || [id]).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_match(&row)
    }

    async fn find_match_for_content(
        &self,
        actor_id: &str,
        content_id: &str,
    ) -> Result<MatchRecord, DatabaseError> {
        let sql = format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE actor_id = ?1 AND content_id = ?2"
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params![actor_id, content_id])
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_match(&row)
    }

    /// Query match records with optional filters, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn fetch_matches(&self, filter: &MatchFilter) -> Result<Vec<MatchRecord>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref actor) = filter.actor_id {
            params.push(libsql::Value::Text(actor.clone()));
            conditions.push(format!("actor_id = ?{}", params.len()));
        }
        if let Some(ref target) = filter.target_id {
            params.push(libsql::Value::Text(target.clone()));
            conditions.push(format!("target_id = ?{}", params.len()));
        }
        if let Some(ref user) = filter.involving {
            params.push(libsql::Value::Text(user.clone()));
            let idx = params.len();
            conditions.push(format!("(actor_id = ?{idx} OR target_id = ?{idx})"));
        }
        if let Some(ref ids) = filter.content_ids {
            if ids.is_empty() {
                return Ok(Vec::new());
            }
            let mut placeholders = Vec::with_capacity(ids.len());
            for content_id in ids {
                params.push(libsql::Value::Text(content_id.clone()));
                placeholders.push(format!("?{}", params.len()));
            }
            conditions.push(format!("content_id IN ({})", placeholders.join(", ")));
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
            "SELECT {MATCH_COLUMNS} FROM matches {where_clause}
             ORDER BY created_at DESC, rowid DESC {limit_clause}"
        );

        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            records.push(row_to_match(&row)?);
        }
        Ok(records)
    }

    /// Every record where `user_id` is actor or target, seen from that user's
    /// side, newest first. Repeated counterparts are not collapsed.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn matches_involving(&self, user_id: &str) -> Result<Vec<MatchSummary>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                "SELECT m.id,
                        CASE WHEN m.actor_id = ?1 THEN m.target_id ELSE m.actor_id END AS other_id,
                        u.display_name,
                        m.action,
                        m.created_at
                 FROM matches m
                 LEFT JOIN users u
                   ON u.id = CASE WHEN m.actor_id = ?1 THEN m.target_id ELSE m.actor_id END
                 WHERE m.actor_id = ?1 OR m.target_id = ?1
                 ORDER BY m.created_at DESC, m.rowid DESC",
                || [user_id],
            )
            .await?;

        let mut summaries = Vec::new();
        while let Some(row) = rows.next().await? {
            summaries.push(MatchSummary {
                match_id: row.get::<String>(0)?,
                other_user_id: row.get::<String>(1)?,
                other_user_name: get_opt_string(&row, 2)?,
                action: parse_enum(&row.get::<String>(3)?)?,
                created_at: parse_datetime(&row.get::<String>(4)?)?,
            });
        }
        Ok(summaries)
    }
}
