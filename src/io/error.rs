use std::io;
use thiserror::Error;

/// IO-level errors raised while demarcating objects in the byte stream
#[derive(Error, Debug)]
pub enum IoError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid JSON object: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Unexpected byte 0x{byte:02x} outside of an object at offset {offset}")]
    UnexpectedByte { byte: u8, offset: u64 },

    #[error("Unbalanced closing brace at offset {0}")]
    UnbalancedBrace(u64),

    #[error("Object exceeds the {limit} byte limit")]
    ObjectTooLarge { limit: usize },
}

impl IoError {
    /// Whether the stream can continue past this error.
    ///
    /// Only a brace-balanced object with an invalid body is recoverable: the
    /// next object boundary is still known.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, IoError::InvalidJson(_))
    }
}
