//! HTTP byte transport backed by reqwest.

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::domain::errors::{FetchError, FetchResult};
use crate::domain::ports::ByteTransport;

/// Byte transport over HTTP(S).
///
/// Timeouts come from the session configuration; there is no retry or
/// backoff beyond what the client itself does.
#[derive(Debug, Clone)]
pub struct HttpByteTransport {
    client: reqwest::Client,
}

impl HttpByteTransport {
    /// Creates a transport with the given request timeout.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(timeout_secs: u64) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ByteTransport for HttpByteTransport {
    async fn fetch_bytes(&self, url: &str) -> FetchResult<Bytes> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            // The transport itself did not error, so this surfaces as the
            // generic download failure.
            debug!(url, status = %response.status(), "Unsuccessful media response");
            return Err(FetchError::DownloadFailed);
        }

        response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(format!("failed to read body: {e}")))
    }
}
