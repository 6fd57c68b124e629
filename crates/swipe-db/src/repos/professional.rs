//! Professional detail repository: one row per professional plus free-text tags.

use std::collections::BTreeSet;

use swipe_core::entities::ProfessionalDetail;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_code, get_opt_string};
use crate::service::SwipeService;

async fn write_detail(
    conn: &libsql::Connection,
    detail: &ProfessionalDetail,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO professional_details (user_id, company_name, classification_code, verified, category)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(user_id) DO UPDATE SET
            company_name = excluded.company_name,
            classification_code = excluded.classification_code,
            verified = excluded.verified,
            category = excluded.category",
        libsql::params![
            detail.user_id.as_str(),
            detail.company_name.as_str(),
            detail.classification_code.as_ref().map(|c| c.as_str()),
            i64::from(detail.verified),
            detail.category.as_deref()
        ],
    )
    .await?;
    conn.execute(
        "DELETE FROM professional_tags WHERE user_id = ?1",
        [detail.user_id.as_str()],
    )
    .await?;
    for tag in &detail.tags {
        conn.execute(
            "INSERT OR IGNORE INTO professional_tags (user_id, tag) VALUES (?1, ?2)",
            libsql::params![detail.user_id.as_str(), tag.as_str()],
        )
        .await?;
    }
    Ok(())
}

impl SwipeService {
    /// Insert or replace a professional's detail row and its tag set.
    ///
    /// The row and tags are written in one transaction: a failure leaves the
    /// previous detail and tags untouched. Transactions are not retried.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if a statement fails (e.g., the user does not
    /// exist or a tag is blank).
    pub async fn upsert_professional_detail(
        &self,
        detail: &ProfessionalDetail,
    ) -> Result<(), DatabaseError> {
        let tx = self.db().conn().transaction().await?;
        match write_detail(&tx, detail).await {
            Ok(()) => {
                tx.commit().await?;
                Ok(())
            }
            Err(e) => {
                if let Err(rollback) = tx.rollback().await {
                    tracing::warn!(%rollback, user_id = %detail.user_id, "rollback of professional detail failed");
                }
                Err(e)
            }
        }
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if the user has no detail row.
    pub async fn get_professional_detail(
        &self,
        user_id: &str,
    ) -> Result<ProfessionalDetail, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                "SELECT user_id, company_name, classification_code, verified, category
                 FROM professional_details WHERE user_id = ?1",
                || [user_id],
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let mut detail = ProfessionalDetail {
            user_id: row.get::<String>(0)?,
            company_name: row.get::<String>(1)?,
            classification_code: get_opt_code(&row, 2)?,
            verified: row.get::<i64>(3)? != 0,
            tags: BTreeSet::new(),
            category: get_opt_string(&row, 4)?,
        };

        let mut tag_rows = self
            .db()
            .query_with(
                "SELECT tag FROM professional_tags WHERE user_id = ?1",
                || [user_id],
            )
            .await?;
        while let Some(row) = tag_rows.next().await? {
            detail.tags.insert(row.get::<String>(0)?);
        }
        Ok(detail)
    }
}
