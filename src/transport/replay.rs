use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::File;
use tokio_util::compat::TokioAsyncReadCompatExt;
use tracing::debug;

use super::error::TransportError;
use super::traits::{ByteStream, Transport};

/// Transport replaying a captured stream from disk.
///
/// Endpoint and credential are ignored; every connection reads the capture
/// from the start.
pub struct ReplayTransport {
    path: PathBuf,
}

impl ReplayTransport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl Transport for ReplayTransport {
    async fn connect(&self, _endpoint: &str, _credential: &str) -> Result<ByteStream, TransportError> {
        let file = File::open(&self.path).await?;
        debug!(path = %self.path.display(), "Replaying captured stream");
        Ok(Box::pin(file.compat()))
    }
}
