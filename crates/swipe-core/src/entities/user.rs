use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::classification::ClassificationCode;
use crate::enums::Role;
use crate::geo::Coordinates;

/// A registered user. Owned by the account system; the engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct User {
    pub id: String,
    pub role: Role,
    pub display_name: String,
    pub city: Option<String>,
    pub address: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub classification_code: Option<ClassificationCode>,
    pub created_at: DateTime<Utc>,
}
