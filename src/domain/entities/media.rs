//! Domain types for story media handling.

use std::sync::Arc;

/// Cache key for a piece of story media.
///
/// Keys are the resource URL itself, so two snaps pointing at the same asset
/// share a cache slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MediaKey(String);

impl MediaKey {
    /// Creates a new `MediaKey` from any string-like input.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the inner string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MediaKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MediaKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for MediaKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Lifecycle of a story view's content.
///
/// `Loading` is the initial state. A load attempt moves one way into
/// `Loaded` or `Failed`; retrying a failed view re-enters `Loading`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ContentState {
    /// Content load is in progress.
    #[default]
    Loading,
    /// Content is ready for display.
    Loaded,
    /// Content load failed with an error message; the view offers a retry.
    Failed(String),
}

impl ContentState {
    /// Returns true while a load attempt is in progress.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Returns true once content is ready for display.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded)
    }

    /// Returns true if the last load attempt failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// A decoded image together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedMedia {
    /// The cache key the media was requested under.
    pub key: MediaKey,
    /// The decoded bitmap, shared with the cache.
    pub image: Arc<image::DynamicImage>,
    /// Whether the bytes came from the cache or the network.
    pub origin: MediaOrigin,
}

/// Where a piece of media was loaded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaOrigin {
    /// Served from the in-memory cache.
    Cache,
    /// Downloaded from the network.
    Network,
}

impl std::fmt::Display for MediaOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cache => write!(f, "cache"),
            Self::Network => write!(f, "network"),
        }
    }
}
