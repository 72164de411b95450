use thiserror::Error;

use crate::domain::DomainError;

/// Engine-level errors for processing a single record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("Malformed record: {0}")]
    MalformedRecord(#[from] DomainError),
}
