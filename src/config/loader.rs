//! Settings file loading with environment overrides.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use super::error::ConfigError;
use crate::io::DEFAULT_MAX_OBJECT_BYTES;
use crate::storage::DEFAULT_TOP_TAGS;
use crate::streaming::{DEFAULT_REPORT_INTERVAL, StreamSettings};
use crate::transport::DEFAULT_TWEET_FIELDS;

/// Settings file read when no path is given
pub const DEFAULT_SETTINGS_FILE: &str = "appsettings.json";

/// Environment variable overriding `TwitterApiUrl`
pub const ENDPOINT_ENV: &str = "TWITTER_API_URL";

/// Environment variable overriding `BearerToken`
pub const CREDENTIAL_ENV: &str = "TWITTER_BEARER_TOKEN";

/// JSON settings file structure.
///
/// Every key is optional; unknown keys are ignored so the file can carry
/// settings for other tools.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct SettingsFile {
    #[serde(default)]
    pub twitter_api_url: Option<String>,

    #[serde(default)]
    pub bearer_token: Option<String>,

    #[serde(default)]
    pub report_interval_secs: Option<u64>,

    #[serde(default)]
    pub top_tag_count: Option<usize>,

    #[serde(default)]
    pub tweet_fields: Option<String>,

    #[serde(default)]
    pub max_object_bytes: Option<usize>,

    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

/// Resolved application settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub endpoint: Option<String>,
    pub credential: Option<String>,
    pub report_interval: Duration,
    pub top_tags: usize,
    pub tweet_fields: String,
    pub max_object_bytes: usize,
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            credential: None,
            report_interval: DEFAULT_REPORT_INTERVAL,
            top_tags: DEFAULT_TOP_TAGS,
            tweet_fields: DEFAULT_TWEET_FIELDS.to_string(),
            max_object_bytes: DEFAULT_MAX_OBJECT_BYTES,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Load settings from `path`, then apply process environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load_with_env(path, |key| std::env::var(key).ok())
    }

    /// Load settings from `path`, looking overrides up with `env`.
    ///
    /// A missing file yields the defaults.
    pub fn load_with_env<F>(path: impl AsRef<Path>, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file = load_settings_file(path.as_ref())?.unwrap_or_default();
        let config = Self::resolve(file)?.with_env_overrides(env);
        Ok(config)
    }

    /// Merge a parsed settings file into the defaults
    pub fn resolve(file: SettingsFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let report_interval = match file.report_interval_secs {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    key: "ReportIntervalSecs",
                    reason: "must be at least 1".to_string(),
                });
            }
            Some(secs) => Duration::from_secs(secs),
            None => defaults.report_interval,
        };

        let top_tags = match file.top_tag_count {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    key: "TopTagCount",
                    reason: "must be at least 1".to_string(),
                });
            }
            Some(count) => count,
            None => defaults.top_tags,
        };

        let max_object_bytes = match file.max_object_bytes {
            Some(bytes) if bytes < 2 => {
                return Err(ConfigError::InvalidValue {
                    key: "MaxObjectBytes",
                    reason: "must be at least 2".to_string(),
                });
            }
            Some(bytes) => bytes,
            None => defaults.max_object_bytes,
        };

        Ok(Self {
            endpoint: non_empty(file.twitter_api_url),
            credential: non_empty(file.bearer_token),
            report_interval,
            top_tags,
            tweet_fields: non_empty(file.tweet_fields).unwrap_or(defaults.tweet_fields),
            max_object_bytes,
            log_file: file.log_file,
        })
    }

    /// Apply `TWITTER_API_URL` and `TWITTER_BEARER_TOKEN` overrides
    pub fn with_env_overrides<F>(mut self, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = non_empty(env(ENDPOINT_ENV)) {
            self.endpoint = Some(endpoint);
        }
        if let Some(credential) = non_empty(env(CREDENTIAL_ENV)) {
            self.credential = Some(credential);
        }
        self
    }

    /// Settings for a live connection; endpoint and credential are required
    pub fn stream_settings(&self) -> Result<StreamSettings, ConfigError> {
        let endpoint = self.endpoint.clone().ok_or(ConfigError::MissingEndpoint)?;
        let credential = self.credential.clone().ok_or(ConfigError::MissingCredential)?;

        Ok(StreamSettings {
            endpoint,
            credential,
            ..self.base_settings()
        })
    }

    /// Settings for replaying a captured stream; no credential is needed
    pub fn replay_settings(&self, capture: &Path) -> StreamSettings {
        StreamSettings {
            endpoint: capture.display().to_string(),
            ..self.base_settings()
        }
    }

    fn base_settings(&self) -> StreamSettings {
        StreamSettings {
            report_interval: self.report_interval,
            top_tags: self.top_tags,
            max_object_bytes: self.max_object_bytes,
            ..StreamSettings::default()
        }
    }
}

/// Read and parse a settings file.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_settings_file(path: &Path) -> Result<Option<SettingsFile>, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Settings file not found; using defaults");
            return Ok(None);
        }
        Err(e) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };

    let file = serde_json::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    Ok(Some(file))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
