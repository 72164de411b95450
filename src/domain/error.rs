use thiserror::Error;

/// Domain-level errors describing records whose shape cannot be interpreted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Field `{field}` is not {expected}")]
    UnexpectedShape {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Record is not a JSON object")]
    NotAnObject,
}
