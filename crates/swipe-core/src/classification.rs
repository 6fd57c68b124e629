//! Profession classification codes (French NAF/APE shape, e.g. `62.01Z`).
//!
//! A code ties a request to one profession. Content without a code is a
//! "general" request and is shown to every professional.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// A validated classification code: two digits, a dot, two digits, one letter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ClassificationCode(String);

impl ClassificationCode {
    /// Parse and normalize a code. Surrounding whitespace is trimmed and the
    /// trailing letter upper-cased.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` when the input is not of the form `NN.NNL`.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let code = raw.trim().to_ascii_uppercase();
        let bytes = code.as_bytes();
        let well_formed = bytes.len() == 6
            && bytes[0].is_ascii_digit()
            && bytes[1].is_ascii_digit()
            && bytes[2] == b'.'
            && bytes[3].is_ascii_digit()
            && bytes[4].is_ascii_digit()
            && bytes[5].is_ascii_uppercase();
        if well_formed {
            Ok(Self(code))
        } else {
            Err(CoreError::Validation(format!(
                "invalid classification code '{}': expected NN.NNL",
                raw.trim()
            )))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ClassificationCode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ClassificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
