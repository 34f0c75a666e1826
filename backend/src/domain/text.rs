//! Required free-text fields.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper bound for single-line inventory fields.
pub const TEXT_MAX: usize = 255;
/// Upper bound for multi-line observations.
pub const LONG_TEXT_MAX: usize = 4000;

/// Raised when a required text field is blank or oversized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TextValidationError {
    /// Blank once trimmed.
    #[error("must not be empty")]
    Empty,
    /// Longer than the field allows.
    #[error("must be at most {max} characters")]
    TooLong {
        /// Upper bound.
        max: usize,
    },
}

/// Trimmed, non-empty text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequiredText(String);

impl RequiredText {
    /// Validate a single-line field.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, TextValidationError> {
        Self::bounded(raw, TEXT_MAX)
    }

    /// Validate a field with a custom length bound.
    pub fn bounded(raw: impl AsRef<str>, max: usize) -> Result<Self, TextValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextValidationError::Empty);
        }
        if trimmed.chars().count() > max {
            return Err(TextValidationError::TooLong { max });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Validated text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Consume into the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for RequiredText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RequiredText> for String {
    fn from(value: RequiredText) -> Self {
        value.0
    }
}

impl TryFrom<String> for RequiredText {
    type Error = TextValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
