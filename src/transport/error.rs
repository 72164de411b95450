use std::fmt;
use std::io;
use thiserror::Error;

/// Classification of a connect response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectStatus {
    Success,
    Unauthorized,
    RateLimited,
    Failure,
}

impl ConnectStatus {
    /// Classify an HTTP status code
    pub fn from_code(code: u16) -> Self {
        match code {
            200..=299 => ConnectStatus::Success,
            401 => ConnectStatus::Unauthorized,
            429 => ConnectStatus::RateLimited,
            _ => ConnectStatus::Failure,
        }
    }
}

/// Coarse failure category used in logs and by reconnect policies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    Unauthorized,
    RateLimited,
    Other,
}

impl FailureCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCategory::Unauthorized => "unauthorized",
            FailureCategory::RateLimited => "rate-limited",
            FailureCategory::Other => "other",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transport-level errors for connecting to and reading from the stream source
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("{status} - {reason}")]
    Status { status: u16, reason: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Read failed: {0}")]
    Read(#[from] io::Error),
}

impl TransportError {
    /// Turn a non-success response status into an error
    pub fn check_status(code: u16, reason: &str) -> Result<(), TransportError> {
        match ConnectStatus::from_code(code) {
            ConnectStatus::Success => Ok(()),
            ConnectStatus::Unauthorized => Err(TransportError::Unauthorized),
            ConnectStatus::RateLimited => Err(TransportError::RateLimited),
            ConnectStatus::Failure => Err(TransportError::Status {
                status: code,
                reason: reason.to_string(),
            }),
        }
    }

    pub fn category(&self) -> FailureCategory {
        match self {
            TransportError::Unauthorized => FailureCategory::Unauthorized,
            TransportError::RateLimited => FailureCategory::RateLimited,
            _ => FailureCategory::Other,
        }
    }
}
