//! User repository. Users belong to the account system; the store keeps the
//! fields candidate selection reads.

use swipe_core::entities::User;
use swipe_core::enums::Role;
use swipe_core::geo::Coordinates;

use crate::error::DatabaseError;
use crate::helpers::{format_datetime, get_opt_code, get_opt_string, parse_datetime, parse_enum};
use crate::service::SwipeService;

const USER_COLUMNS: &str =
    "id, role, display_name, city, address, latitude, longitude, classification_code, created_at";

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get::<String>(0)?,
        role: parse_enum(&row.get::<String>(1)?)?,
        display_name: row.get::<String>(2)?,
        city: get_opt_string(row, 3)?,
        address: get_opt_string(row, 4)?,
        coordinates: Coordinates::from_parts(
            row.get::<Option<f64>>(5)?,
            row.get::<Option<f64>>(6)?,
        ),
        classification_code: get_opt_code(row, 7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl SwipeService {
    /// Insert a user or refresh every field but `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the statement fails.
    pub async fn upsert_user(&self, user: &User) -> Result<(), DatabaseError> {
        let latitude = user.coordinates.map(|c| c.latitude);
        let longitude = user.coordinates.map(|c| c.longitude);
        self.db()
            .execute_with(
                "INSERT INTO users (id, role, display_name, city, address, latitude, longitude, classification_code, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                 ON CONFLICT(id) DO UPDATE SET
                    role = excluded.role,
                    display_name = excluded.display_name,
                    city = excluded.city,
                    address = excluded.address,
                    latitude = excluded.latitude,
                    longitude = excluded.longitude,
                    classification_code = excluded.classification_code",
                || {
                    libsql::params![
                        user.id.as_str(),
                        user.role.as_str(),
                        user.display_name.as_str(),
                        user.city.as_deref(),
                        user.address.as_deref(),
                        latitude,
                        longitude,
                        user.classification_code.as_ref().map(|c| c.as_str()),
                        format_datetime(&user.created_at)
                    ]
                },
            )
            .await?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::NoResult` if no user has this id.
    pub async fn get_user(&self, id: &str) -> Result<User, DatabaseError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");
        let mut rows = self.db().query_with(&sql, || [id]).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        row_to_user(&row)
    }

    /// All users with the given role, oldest account first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_users_by_role(&self, role: Role) -> Result<Vec<User>, DatabaseError> {
        let sql = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = ?1 ORDER BY created_at ASC, rowid ASC"
        );
        let mut rows = self.db().query_with(&sql, || [role.as_str()]).await?;
        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }
}
