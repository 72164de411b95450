pub mod classifier;
pub mod error;
pub mod processor;

// Re-export commonly used types
pub use classifier::classify;
pub use error::EngineError;
pub use processor::{RecordDisposition, RecordProcessor};
