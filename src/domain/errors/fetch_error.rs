//! Media fetch error types.

use thiserror::Error;

/// Result type for media fetch operations.
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Errors surfaced by the fetch pipeline.
///
/// Variants carry rendered messages rather than source errors so results can
/// be cloned into completion events and view state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The resource locator is malformed; detected before any network call.
    #[error("invalid media URL: {0}")]
    InvalidUrl(String),

    /// Generic download failure, used when the transport gives no error of
    /// its own (e.g. an unsuccessful HTTP status or an empty body).
    #[error("unable to download media")]
    DownloadFailed,

    /// Transport-level error, passed through from the network layer.
    #[error("transport error: {0}")]
    Transport(String),

    /// Downloaded bytes could not be decoded into an image.
    #[error("failed to decode media: {0}")]
    Decode(String),

    /// The fetch was cancelled before completing.
    #[error("fetch was cancelled")]
    Cancelled,
}
