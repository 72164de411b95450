use std::io;
use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use reqwest::Client;
use tracing::debug;

use super::error::TransportError;
use super::traits::{ByteStream, Transport};

/// Fields requested alongside each tweet
pub const DEFAULT_TWEET_FIELDS: &str = "public_metrics,entities";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Streaming HTTP transport authenticating with a bearer token.
///
/// Only the connect phase has a timeout: the body of a live stream never
/// finishes.
pub struct HttpTransport {
    client: Client,
    tweet_fields: String,
}

impl HttpTransport {
    pub fn new(tweet_fields: impl Into<String>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("tagstream/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            tweet_fields: tweet_fields.into(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn connect(&self, endpoint: &str, credential: &str) -> Result<ByteStream, TransportError> {
        let mut request = self.client.get(endpoint).bearer_auth(credential);
        if !self.tweet_fields.is_empty() {
            request = request.query(&[("tweet.fields", self.tweet_fields.as_str())]);
        }

        let response = request.send().await?;
        let status = response.status();
        TransportError::check_status(
            status.as_u16(),
            status.canonical_reason().unwrap_or("Unknown status"),
        )?;
        debug!(%status, "Stream connected");

        let body = Box::pin(response.bytes_stream())
            .map_err(io::Error::other)
            .into_async_read();
        Ok(Box::pin(body))
    }
}
