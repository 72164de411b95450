use std::io::ErrorKind;
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::io::{AsyncRead, AsyncReadExt};
use futures::{Stream, StreamExt, stream};
use tokio::fs::File;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::debug;

use super::error::IoError;
use super::scanner::{DEFAULT_MAX_OBJECT_BYTES, ObjectScanner};
use crate::domain::RawRecord;

const READ_CHUNK_BYTES: usize = 8 * 1024;

/// Async stream of JSON objects read from a byte source.
///
/// The source is read lazily in chunks; only the object currently being
/// assembled is buffered. The stream ends when the source does, discarding
/// any unfinished object. After a non-recoverable error it yields nothing
/// more. Dropping the stream abandons any partial parse and releases the
/// source.
pub struct RecordStream {
    inner: Pin<Box<dyn Stream<Item = Result<RawRecord, IoError>> + Send>>,
}

struct ReadState<R> {
    reader: R,
    scanner: ObjectScanner,
    chunk: Vec<u8>,
    finished: bool,
}

impl RecordStream {
    /// Create a new record stream from an async reader
    pub fn new<R>(reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        Self::with_max_object_bytes(reader, DEFAULT_MAX_OBJECT_BYTES)
    }

    /// Create a record stream that faults on objects larger than `limit` bytes
    pub fn with_max_object_bytes<R>(reader: R, limit: usize) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let state = ReadState {
            reader,
            scanner: ObjectScanner::with_max_object_bytes(limit),
            chunk: vec![0; READ_CHUNK_BYTES],
            finished: false,
        };

        let stream = stream::unfold(state, |mut state| async move {
            if state.finished {
                return None;
            }
            let item = next_record(&mut state).await?;
            if item.as_ref().is_err_and(|e| !e.is_recoverable()) {
                state.finished = true;
            }
            Some((item, state))
        });

        Self {
            inner: Box::pin(stream.fuse()),
        }
    }

    /// Create a record stream over a captured stream file
    ///
    /// # Example
    /// ```rust,ignore
    /// let records = RecordStream::from_file("capture.jsonl").await?;
    /// ```
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let file = File::open(path.as_ref()).await?;
        Ok(Self::new(file.compat()))
    }
}

async fn next_record<R>(state: &mut ReadState<R>) -> Option<Result<RawRecord, IoError>>
where
    R: AsyncRead + Unpin,
{
    let ReadState {
        reader,
        scanner,
        chunk,
        ..
    } = state;

    loop {
        if let Some(item) = scanner.next_object() {
            return Some(item);
        }

        match reader.read(chunk).await {
            Ok(0) => {
                if scanner.has_partial() {
                    debug!(
                        buffered = scanner.buffered(),
                        position = scanner.position(),
                        "Stream ended mid-object, discarding partial record"
                    );
                }
                return None;
            }
            Ok(read) => scanner.feed(&chunk[..read]),
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Some(Err(IoError::Io(e))),
        }
    }
}

impl Stream for RecordStream {
    type Item = Result<RawRecord, IoError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}
