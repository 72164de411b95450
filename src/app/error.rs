use std::io;
use thiserror::Error;

use crate::config::ConfigError;
use crate::io::IoError;
use crate::logging::LoggingError;
use crate::streaming::SessionError;
use crate::transport::TransportError;

/// Top-level application errors unifying all layer errors
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Output error: {0}")]
    Output(#[from] IoError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Stream failed: {0}")]
    Session(#[from] SessionError),

    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}
