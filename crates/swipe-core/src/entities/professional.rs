use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::classification::ClassificationCode;

/// One-to-one extension of a professional user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ProfessionalDetail {
    pub user_id: String,
    pub company_name: String,
    pub classification_code: Option<ClassificationCode>,
    pub verified: bool,
    pub tags: BTreeSet<String>,
    pub category: Option<String>,
}
