//! In-memory cost-bounded image cache.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lru::LruCache;
use tokio::sync::RwLock;
use tracing::{debug, trace};

use crate::domain::entities::MediaKey;
use crate::domain::ports::ImageCachePort;

/// Default cache budget in decoded bytes (100 MB).
pub const DEFAULT_COST_BUDGET: u64 = 100 * 1024 * 1024;

/// In-memory cache for decoded images, bounded by total decoded-byte cost
/// rather than entry count. When an insertion pushes the cache over its
/// budget, least-recently-used entries are dropped until it fits again.
/// Thread-safe and optimized for frequent reads.
pub struct MemoryImageCache {
    cache: RwLock<LruCache<MediaKey, Arc<image::DynamicImage>>>,
    budget: u64,
    cost: AtomicU64,
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Decoded-byte cost of one cached image.
fn image_cost(image: &image::DynamicImage) -> u64 {
    image.as_bytes().len() as u64
}

impl MemoryImageCache {
    /// Creates a new cache with the specified cost budget in bytes.
    #[must_use]
    pub fn new(budget: u64) -> Self {
        Self {
            cache: RwLock::new(LruCache::unbounded()),
            budget: budget.max(1),
            cost: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Creates a new cache with the default 100 MB budget.
    #[must_use]
    pub fn with_default_budget() -> Self {
        Self::new(DEFAULT_COST_BUDGET)
    }

    /// Returns the configured cost budget in bytes.
    #[must_use]
    pub const fn budget(&self) -> u64 {
        self.budget
    }

    /// Returns cache statistics.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total > 0 {
            (hits as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        CacheStats {
            hits,
            misses,
            hit_rate,
            size: self.len(),
            cost: self.cost.load(Ordering::Relaxed),
        }
    }
}

impl Default for MemoryImageCache {
    fn default() -> Self {
        Self::with_default_budget()
    }
}

impl std::fmt::Debug for MemoryImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryImageCache")
            .field("budget", &self.budget)
            .field("cost", &self.cost.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Statistics about cache performance.
#[derive(Debug, Clone)]
pub struct CacheStats {
    /// Number of cache hits.
    pub hits: u64,
    /// Number of cache misses.
    pub misses: u64,
    /// Hit rate as a percentage.
    pub hit_rate: f64,
    /// Current number of cached images.
    pub size: usize,
    /// Current decoded-byte footprint.
    pub cost: u64,
}

impl std::fmt::Display for CacheStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Cache: {} images, {} bytes, {:.1}% hit rate ({} hits, {} misses)",
            self.size, self.cost, self.hit_rate, self.hits, self.misses
        )
    }
}

#[async_trait::async_trait]
impl ImageCachePort for MemoryImageCache {
    async fn get(&self, key: &MediaKey) -> Option<Arc<image::DynamicImage>> {
        let mut cache = self.cache.write().await;
        if let Some(img) = cache.get(key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache hit");
            Some(img.clone())
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "Memory cache miss");
            None
        }
    }

    async fn put(&self, key: MediaKey, image: Arc<image::DynamicImage>) {
        let added = image_cost(&image);
        let mut cache = self.cache.write().await;

        if let Some(old) = cache.put(key.clone(), image) {
            self.cost.fetch_sub(image_cost(&old), Ordering::Relaxed);
        }
        self.cost.fetch_add(added, Ordering::Relaxed);
        debug!(key = %key, bytes = added, "Storing image in memory cache");

        // Evict down to budget, but never the entry just inserted.
        while self.cost.load(Ordering::Relaxed) > self.budget && cache.len() > 1 {
            if let Some((evicted_key, evicted)) = cache.pop_lru() {
                self.cost.fetch_sub(image_cost(&evicted), Ordering::Relaxed);
                debug!(key = %evicted_key, "Evicted image over cost budget");
            } else {
                break;
            }
        }
    }

    fn len(&self) -> usize {
        // Best-effort estimate; may lag behind concurrent writers.
        self.cache.try_read().map(|c| c.len()).unwrap_or(0)
    }

    fn cost(&self) -> u64 {
        self.cost.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(width: u32, height: u32) -> Arc<image::DynamicImage> {
        Arc::new(image::DynamicImage::new_rgb8(width, height))
    }

    #[tokio::test]
    async fn test_cache_put_and_get_identity() {
        let cache = MemoryImageCache::with_default_budget();
        let key = MediaKey::new("https://example.com/a.png");
        let img = test_image(100, 100);

        cache.put(key.clone(), img.clone()).await;
        let retrieved = cache.get(&key).await.expect("cached image");

        // Exact value last written, not a copy.
        assert!(Arc::ptr_eq(&retrieved, &img));
    }

    #[tokio::test]
    async fn test_cache_miss() {
        let cache = MemoryImageCache::with_default_budget();
        assert!(cache.get(&MediaKey::new("nonexistent")).await.is_none());
    }

    #[tokio::test]
    async fn test_put_replaces_and_adjusts_cost() {
        let cache = MemoryImageCache::with_default_budget();
        let key = MediaKey::new("https://example.com/a.png");

        cache.put(key.clone(), test_image(10, 10)).await;
        let small_cost = cache.cost();
        cache.put(key.clone(), test_image(20, 20)).await;

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.cost(), small_cost * 4);
    }

    #[tokio::test]
    async fn test_cost_eviction_is_lru() {
        // Each 10x10 RGB image costs 300 bytes; budget fits two.
        let cache = MemoryImageCache::new(700);
        let img = test_image(10, 10);

        let key1 = MediaKey::new("1");
        let key2 = MediaKey::new("2");
        let key3 = MediaKey::new("3");

        cache.put(key1.clone(), img.clone()).await;
        cache.put(key2.clone(), img.clone()).await;

        // Touch key1 so key2 becomes least recently used.
        let _ = cache.get(&key1).await;

        cache.put(key3.clone(), img).await;

        assert!(cache.get(&key2).await.is_none());
        assert!(cache.get(&key1).await.is_some());
        assert!(cache.get(&key3).await.is_some());
        assert!(cache.cost() <= 700);
    }

    #[tokio::test]
    async fn test_oversized_entry_is_still_admitted() {
        let cache = MemoryImageCache::new(16);
        let key = MediaKey::new("huge");

        cache.put(key.clone(), test_image(50, 50)).await;

        assert!(cache.get(&key).await.is_some());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_cache_stats() {
        let cache = MemoryImageCache::with_default_budget();
        let key = MediaKey::new("a");

        cache.put(key.clone(), test_image(10, 10)).await;
        let _ = cache.get(&key).await;
        let _ = cache.get(&MediaKey::new("missing")).await;

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
        assert_eq!(stats.cost, 300);
    }
}
