pub mod error;
pub mod outcome;
pub mod record;
pub mod tweet;

// Re-export commonly used types
pub use error::DomainError;
pub use outcome::{ApiError, ClassifiedOutcome, KNOWN_ERROR_TITLES, is_known_error_title};
pub use record::RawRecord;
pub use tweet::Tweet;
