pub mod error;
pub mod processor;
pub mod reconnect;
pub mod reporter;
pub mod session;
pub mod state;

// Re-export commonly used types
pub use error::{ErrorPolicy, SessionError, SilentSkip, SkipErrors};
pub use processor::{
    DEFAULT_REPORT_INTERVAL, ProcessorResults, SESSION_HISTORY, StreamProcessor, StreamSettings,
};
pub use reconnect::{FixedBackoff, NoReconnect, ReconnectPolicy};
pub use reporter::{LogSink, ReportSink, Reporter};
pub use session::{SessionEnd, SessionReport, StreamSession};
pub use state::SessionState;
