use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::io::AsyncRead;

use super::error::TransportError;

/// Incrementally readable response body
pub type ByteStream = Pin<Box<dyn AsyncRead + Send>>;

/// Source of stream connections.
///
/// A successful `connect` hands over a body that can be read until
/// end-of-stream or an I/O failure. Dropping it releases the connection.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn connect(&self, endpoint: &str, credential: &str) -> Result<ByteStream, TransportError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn connect(&self, endpoint: &str, credential: &str) -> Result<ByteStream, TransportError> {
        (**self).connect(endpoint, credential).await
    }
}
