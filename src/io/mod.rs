pub mod error;
pub mod extractor;
pub mod scanner;
pub mod summary_writer;

// Re-export commonly used types
pub use error::IoError;
pub use extractor::RecordStream;
pub use scanner::{DEFAULT_MAX_OBJECT_BYTES, ObjectScanner};
pub use summary_writer::write_summary;
