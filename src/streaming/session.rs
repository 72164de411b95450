use futures::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use super::error::{ErrorPolicy, SessionError};
use super::state::SessionState;
use crate::domain::{ApiError, RawRecord};
use crate::engine::{RecordDisposition, RecordProcessor};
use crate::io::IoError;
use crate::storage::TweetStatistics;

/// How a session ended
#[derive(Debug)]
pub enum SessionEnd {
    /// The source closed the stream
    EndOfStream,
    /// The server sent an error object
    ApiError(ApiError),
    /// Connect, read or demarcation failed
    Failed(SessionError),
    /// Cancelled by the caller
    Stopped,
}

impl SessionEnd {
    /// State the session settles in
    pub fn terminal_state(&self) -> SessionState {
        match self {
            SessionEnd::EndOfStream | SessionEnd::ApiError(_) => SessionState::Draining,
            SessionEnd::Failed(_) => SessionState::Failed,
            SessionEnd::Stopped => SessionState::Stopped,
        }
    }
}

/// Outcome of one connect-to-disconnect lifecycle
#[derive(Debug)]
pub struct SessionReport {
    pub records_counted: u64,
    pub records_skipped: u64,
    pub end: SessionEnd,
}

impl SessionReport {
    /// Report for a session that ended before any record was read
    pub fn ended(end: SessionEnd) -> Self {
        Self {
            records_counted: 0,
            records_skipped: 0,
            end,
        }
    }
}

/// Single stream processing session
pub struct StreamSession<S, P>
where
    S: TweetStatistics,
    P: ErrorPolicy,
{
    processor: RecordProcessor<S>,
    error_policy: P,
    cancel: CancellationToken,
}

impl<S, P> StreamSession<S, P>
where
    S: TweetStatistics,
    P: ErrorPolicy,
{
    /// Create a new processing session
    pub fn new(processor: RecordProcessor<S>, error_policy: P) -> Self {
        Self {
            processor,
            error_policy,
            cancel: CancellationToken::new(),
        }
    }

    /// Stop reading as soon as `token` is cancelled
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Process a stream of records until it ends, fails, carries a server
    /// error, or the session is cancelled.
    ///
    /// Skipped records are handed to the error policy and processing goes on.
    /// The stream is dropped before returning, releasing its source and any
    /// partially read object.
    pub async fn process_stream<St>(&mut self, mut stream: St) -> SessionReport
    where
        St: Stream<Item = Result<RawRecord, IoError>> + Unpin,
    {
        let mut records_counted = 0;
        let mut records_skipped = 0;

        let end = loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break SessionEnd::Stopped,
                next = stream.next() => next,
            };

            match next {
                None => break SessionEnd::EndOfStream,
                Some(Ok(record)) => match self.processor.process_record(record) {
                    Ok(RecordDisposition::Counted { .. }) => records_counted += 1,
                    Ok(RecordDisposition::Terminate(error)) => break SessionEnd::ApiError(error),
                    Err(e) => {
                        records_skipped += 1;
                        self.error_policy.handle_engine_error(&e);
                    }
                },
                Some(Err(e)) if e.is_recoverable() => {
                    records_skipped += 1;
                    self.error_policy.handle_io_error(&e);
                }
                Some(Err(e)) => break SessionEnd::Failed(SessionError::from(e)),
            }
        };

        drop(stream);

        SessionReport {
            records_counted,
            records_skipped,
            end,
        }
    }

    /// Get a reference to the underlying statistics
    pub fn statistics(&self) -> &S {
        self.processor.statistics()
    }
}
