//! Port definition for image caching.

use std::sync::Arc;

use crate::domain::entities::MediaKey;

/// Port for image caching operations.
/// Implementations must be thread-safe.
///
/// The contract is deliberately small: `get`/`put` only, with eviction left
/// entirely to the implementation's cost policy. There is no invalidation
/// API and no persistence across the process lifetime.
#[async_trait::async_trait]
pub trait ImageCachePort: Send + Sync {
    /// Attempts to get an image from the cache.
    /// Returns None if not cached.
    async fn get(&self, key: &MediaKey) -> Option<Arc<image::DynamicImage>>;

    /// Stores an image in the cache, evicting older entries as needed to
    /// stay within the implementation's cost budget.
    async fn put(&self, key: MediaKey, image: Arc<image::DynamicImage>);

    /// Returns the current number of cached images.
    fn len(&self) -> usize;

    /// Returns true if the cache is empty.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the current decoded-byte footprint of the cache.
    fn cost(&self) -> u64;
}
