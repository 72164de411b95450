//! Prelude module for convenient imports
//!
//! Import everything you need with: `use tagstream::prelude::*;`

// Domain types
pub use crate::domain::{ApiError, ClassifiedOutcome, DomainError, RawRecord, Tweet};

// Storage types
pub use crate::storage::{
    ConcurrentTweetStatistics, DEFAULT_TOP_TAGS, StatisticsSnapshot, TagCount, TweetStatistics,
};

// Engine types
pub use crate::engine::{EngineError, RecordDisposition, RecordProcessor, classify};

// IO types
pub use crate::io::{IoError, ObjectScanner, RecordStream, write_summary};

// Transport types
pub use crate::transport::{
    HttpTransport, ReplayTransport, ScriptedConnection, ScriptedTransport, Transport,
    TransportError,
};

// Streaming types
pub use crate::streaming::{
    ErrorPolicy, FixedBackoff, LogSink, NoReconnect, ProcessorResults, ReconnectPolicy,
    ReportSink, SessionEnd, SessionError, SessionReport, SessionState, SilentSkip, SkipErrors,
    StreamProcessor, StreamSession, StreamSettings,
};

// Config types
pub use crate::config::{AppConfig, ConfigError};

// App types
pub use crate::app::{AppError, CliApp};
