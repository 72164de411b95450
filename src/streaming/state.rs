use std::fmt;

/// Lifecycle of one stream session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No transport held
    #[default]
    Idle,
    /// Waiting for the transport to accept the connection
    Connecting,
    /// Reading and processing records
    Streaming,
    /// Stream ended or the server sent an error; the transport was released
    Draining,
    /// Connect or read failed
    Failed,
    /// Stopped on request
    Stopped,
}

impl SessionState {
    /// Whether the session has ended
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionState::Draining | SessionState::Failed | SessionState::Stopped
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Connecting => "connecting",
            SessionState::Streaming => "streaming",
            SessionState::Draining => "draining",
            SessionState::Failed => "failed",
            SessionState::Stopped => "stopped",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
