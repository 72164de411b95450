pub mod error;
pub mod loader;

// Re-export commonly used types
pub use error::ConfigError;
pub use loader::{
    AppConfig, CREDENTIAL_ENV, DEFAULT_SETTINGS_FILE, ENDPOINT_ENV, SettingsFile,
    load_settings_file,
};
