use std::fmt;

use super::error::DomainError;
use super::tweet::Tweet;

/// `title` values the stream API uses for error objects
pub const KNOWN_ERROR_TITLES: [&str; 2] = ["Invalid Request", "ConnectionException"];

/// Check whether a `title` value marks a server-sent error object
pub fn is_known_error_title(title: &str) -> bool {
    KNOWN_ERROR_TITLES.contains(&title)
}

/// Error object sent by the API inside the stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub title: String,
    pub detail: String,
}

impl ApiError {
    pub fn new(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}", self.title)
        } else {
            write!(f, "{}: {}", self.title, self.detail)
        }
    }
}

/// Result of classifying one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedOutcome {
    /// Valid data, ready for the statistics
    Data(Tweet),

    /// Server-sent error; the session should end
    ApiError(ApiError),

    /// Record cannot be interpreted and is skipped
    Malformed(DomainError),
}
