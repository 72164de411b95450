use thiserror::Error;
use tracing::warn;

use crate::engine::EngineError;
use crate::io::IoError;
use crate::transport::TransportError;

/// Session-fatal errors: the transport or the object demarcation failed
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Extraction fault: {0}")]
    Extraction(IoError),
}

impl From<IoError> for SessionError {
    fn from(error: IoError) -> Self {
        match error {
            IoError::Io(e) => SessionError::Transport(TransportError::Read(e)),
            other => SessionError::Extraction(other),
        }
    }
}

impl SessionError {
    /// Category label for logs
    pub fn category(&self) -> &'static str {
        match self {
            SessionError::Transport(e) => e.category().as_str(),
            SessionError::Extraction(_) => "extraction",
        }
    }
}

/// Policy for records skipped during stream processing.
///
/// Skipped records never end a session; the policy only decides how they are
/// reported.
pub trait ErrorPolicy: Send + Sync {
    /// A brace-balanced object whose body could not be parsed
    fn handle_io_error(&self, error: &IoError);

    /// A parsed record whose shape could not be interpreted
    fn handle_engine_error(&self, error: &EngineError);
}

/// Skip errors and continue processing (log a warning per record)
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipErrors;

impl ErrorPolicy for SkipErrors {
    fn handle_io_error(&self, error: &IoError) {
        warn!(%error, "Error: Processing Tweet (skipping)");
    }

    fn handle_engine_error(&self, error: &EngineError) {
        warn!(%error, "Error: Processing Tweet (skipping)");
    }
}

/// Silent error policy - skip errors without logging
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentSkip;

impl ErrorPolicy for SilentSkip {
    fn handle_io_error(&self, _error: &IoError) {}

    fn handle_engine_error(&self, _error: &EngineError) {}
}
