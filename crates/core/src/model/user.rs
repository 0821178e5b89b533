use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserIdError {
    #[error("user id cannot be empty")]
    Empty,
}

/// Free-text user identifier (trimmed, non-empty).
///
/// The stored form is case-sensitive; tag matching goes through
/// [`UserId::match_key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Validate a raw user id.
    ///
    /// # Errors
    ///
    /// Returns `UserIdError::Empty` if the value is blank after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, UserIdError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserIdError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercase form compared against quiz owner tags.
    #[must_use]
    pub fn match_key(&self) -> String {
        self.0.to_lowercase()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_keeps_case() {
        let id = UserId::new("  Alice ").unwrap();
        assert_eq!(id.as_str(), "Alice");
        assert_eq!(id.match_key(), "alice");
    }

    #[test]
    fn blank_is_rejected() {
        assert_eq!(UserId::new("   ").unwrap_err(), UserIdError::Empty);
        assert_eq!(UserId::new("").unwrap_err(), UserIdError::Empty);
    }
}
