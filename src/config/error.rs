use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or resolving settings
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Failed to read settings file at {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Invalid JSON in {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error("Invalid value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("No stream endpoint configured (set TwitterApiUrl or TWITTER_API_URL)")]
    MissingEndpoint,

    #[error("No credential configured (set BearerToken or TWITTER_BEARER_TOKEN)")]
    MissingCredential,
}
