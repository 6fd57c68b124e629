//! Entity structs for the matching domain.
//!
//! Each entity maps to a table in the libSQL store (see `swipe-db`
//! migrations). All structs derive `Serialize`, `Deserialize`, and
//! `JsonSchema` for JSON roundtrip and schema validation.

mod content;
mod match_record;
mod professional;
mod user;

pub use content::Content;
pub use match_record::{MatchRecord, MatchSummary};
pub use professional::ProfessionalDetail;
pub use user::User;
