pub mod error;
pub mod http;
pub mod replay;
pub mod scripted;
pub mod traits;

// Re-export commonly used types
pub use error::{ConnectStatus, FailureCategory, TransportError};
pub use http::{DEFAULT_TWEET_FIELDS, HttpTransport};
pub use replay::ReplayTransport;
pub use scripted::{ScriptedConnection, ScriptedTransport};
pub use traits::{ByteStream, Transport};
