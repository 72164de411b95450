use std::collections::VecDeque;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream};

use super::error::TransportError;
use super::traits::{ByteStream, Transport};

/// One scripted answer to `connect`
#[derive(Debug)]
pub enum ScriptedConnection {
    /// Serve these chunks, then end the body unless `hold_open` is set
    Accept { chunks: Vec<Vec<u8>>, hold_open: bool },

    /// Fail the connect attempt
    Reject(TransportError),
}

impl ScriptedConnection {
    /// Serve `body` in one chunk and end
    pub fn body(body: impl Into<Vec<u8>>) -> Self {
        ScriptedConnection::Accept {
            chunks: vec![body.into()],
            hold_open: false,
        }
    }

    /// Serve `body` and keep the connection open without further data
    pub fn open_ended(body: impl Into<Vec<u8>>) -> Self {
        ScriptedConnection::Accept {
            chunks: vec![body.into()],
            hold_open: true,
        }
    }
}

/// In-memory transport answering connects from a script, for tests and demos.
///
/// Once the script is exhausted every connect fails with a 503 status.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<ScriptedConnection>>,
    attempts: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new(script: impl IntoIterator<Item = ScriptedConnection>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Number of connect calls made so far
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn connect(&self, _endpoint: &str, _credential: &str) -> Result<ByteStream, TransportError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match next {
            Some(ScriptedConnection::Accept { chunks, hold_open }) => {
                let body = stream::iter(chunks.into_iter().map(Ok::<_, io::Error>));
                if hold_open {
                    Ok(Box::pin(body.chain(stream::pending()).into_async_read()))
                } else {
                    Ok(Box::pin(body.into_async_read()))
                }
            }
            Some(ScriptedConnection::Reject(error)) => Err(error),
            None => Err(TransportError::Status {
                status: 503,
                reason: "Script exhausted".to_string(),
            }),
        }
    }
}
