use std::time::Duration;

use super::error::SessionError;
use super::session::SessionEnd;
use crate::transport::TransportError;

/// Decides whether a new session starts after one ends.
///
/// `attempt` counts consecutive reconnects, starting at 1; it resets after a
/// session that counted at least one record.
pub trait ReconnectPolicy: Send + Sync {
    /// Delay before the next session, or `None` to stop ingesting
    fn next_delay(&self, attempt: u32, end: &SessionEnd) -> Option<Duration>;
}

/// Run a single session
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReconnect;

impl ReconnectPolicy for NoReconnect {
    fn next_delay(&self, _attempt: u32, _end: &SessionEnd) -> Option<Duration> {
        None
    }
}

/// Reconnect after a fixed delay, up to `max_attempts` consecutive times.
///
/// Stopped sessions and rejected credentials are never retried.
#[derive(Debug, Clone, Copy)]
pub struct FixedBackoff {
    pub delay: Duration,
    pub max_attempts: u32,
}

impl FixedBackoff {
    pub fn new(delay: Duration, max_attempts: u32) -> Self {
        Self { delay, max_attempts }
    }
}

impl ReconnectPolicy for FixedBackoff {
    fn next_delay(&self, attempt: u32, end: &SessionEnd) -> Option<Duration> {
        match end {
            SessionEnd::Stopped => None,
            SessionEnd::Failed(SessionError::Transport(TransportError::Unauthorized)) => None,
            _ if attempt > self.max_attempts => None,
            _ => Some(self.delay),
        }
    }
}
