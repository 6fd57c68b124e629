//! Explicit viewer context passed into every selection and ledger call.

use swipe_core::classification::ClassificationCode;
use swipe_core::entities::User;
use swipe_core::enums::Role;
use swipe_core::geo::Coordinates;

/// Who is looking at candidates right now.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewer {
    pub user_id: String,
    pub role: Role,
    pub classification_code: Option<ClassificationCode>,
    pub coordinates: Option<Coordinates>,
}

impl Viewer {
    #[must_use]
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
            classification_code: None,
            coordinates: None,
        }
    }

    #[must_use]
    pub fn with_classification_code(mut self, code: ClassificationCode) -> Self {
        self.classification_code = Some(code);
        self
    }

    #[must_use]
    pub const fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }
}

impl From<&User> for Viewer {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            role: user.role,
            classification_code: user.classification_code.clone(),
            coordinates: user.coordinates,
        }
    }
}
