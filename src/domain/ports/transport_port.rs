//! Port definition for the network byte transport.

use async_trait::async_trait;
use bytes::Bytes;

use crate::domain::errors::FetchResult;

/// Port for fetching raw media bytes over the network.
///
/// The fetch session validates URLs before calling this, so implementations
/// may assume the locator parses. Decoding is not the transport's job.
#[async_trait]
pub trait ByteTransport: Send + Sync {
    /// Fetches the raw bytes behind an already-validated URL.
    async fn fetch_bytes(&self, url: &str) -> FetchResult<Bytes>;
}
