//! Async media fetch session.
//!
//! One session owns the cache and the transport, tracks every in-flight
//! fetch, and can cancel them all at once. Completion of detached fetches is
//! delivered as [`MediaLoadedEvent`]s on the channel supplied at
//! construction; the single event-loop consumer applies them to view state,
//! which keeps all view mutation on one task.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::{debug, error, trace};

use crate::domain::entities::{LoadedMedia, MediaKey, MediaOrigin};
use crate::domain::errors::{FetchError, FetchResult};
use crate::domain::ports::{ByteTransport, ImageCachePort};

use super::http_transport::HttpByteTransport;
use super::memory_cache::{DEFAULT_COST_BUDGET, MemoryImageCache};

/// Message sent when a detached fetch finishes.
#[derive(Debug, Clone)]
pub struct MediaLoadedEvent {
    /// The key the media was requested under.
    pub key: MediaKey,
    /// The loaded media, or the error that ended the attempt.
    pub result: Result<LoadedMedia, FetchError>,
}

/// Configuration for a fetch session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchSessionConfig {
    /// Cache budget in decoded bytes.
    #[serde(default = "default_cache_budget")]
    pub cache_budget_bytes: u64,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

const fn default_cache_budget() -> u64 {
    DEFAULT_COST_BUDGET
}

const fn default_timeout_secs() -> u64 {
    30
}

impl Default for FetchSessionConfig {
    fn default() -> Self {
        Self {
            cache_budget_bytes: default_cache_budget(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Fetches story media, populating the cache on success.
///
/// The cache and transport are injected; the session never reaches for
/// process-wide state. Identical concurrent requests are not deduplicated:
/// two callers fetching the same uncached key issue two transport reads.
pub struct FetchSession {
    cache: Arc<MemoryImageCache>,
    transport: Arc<dyn ByteTransport>,
    tasks: Mutex<Vec<AbortHandle>>,
    event_tx: mpsc::UnboundedSender<MediaLoadedEvent>,
}

impl std::fmt::Debug for FetchSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchSession")
            .field("in_flight", &self.in_flight())
            .finish_non_exhaustive()
    }
}

impl FetchSession {
    /// Creates a session over an existing cache and transport.
    #[must_use]
    pub fn new(
        cache: Arc<MemoryImageCache>,
        transport: Arc<dyn ByteTransport>,
        event_tx: mpsc::UnboundedSender<MediaLoadedEvent>,
    ) -> Self {
        Self {
            cache,
            transport,
            tasks: Mutex::new(Vec::new()),
            event_tx,
        }
    }

    /// Creates a session with its own cache and an HTTP transport.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn with_config(
        config: &FetchSessionConfig,
        event_tx: mpsc::UnboundedSender<MediaLoadedEvent>,
    ) -> FetchResult<Self> {
        let cache = Arc::new(MemoryImageCache::new(config.cache_budget_bytes));
        let transport = Arc::new(HttpByteTransport::new(config.timeout_secs)?);
        Ok(Self::new(cache, transport, event_tx))
    }

    /// The cache this session populates.
    #[must_use]
    pub fn cache(&self) -> &Arc<MemoryImageCache> {
        &self.cache
    }

    /// Fetches the image behind `url`, serving from cache when possible.
    ///
    /// The network read runs as a tracked task, so [`cancel_all`] aborts it
    /// and the caller observes [`FetchError::Cancelled`].
    ///
    /// [`cancel_all`]: Self::cancel_all
    ///
    /// # Errors
    /// Returns an error if the URL is malformed, the download fails, or the
    /// bytes cannot be decoded.
    pub async fn fetch(&self, url: &str) -> FetchResult<LoadedMedia> {
        validate_url(url)?;
        let key = MediaKey::new(url);

        if let Some(image) = self.cache.get(&key).await {
            trace!(key = %key, "Serving media from cache");
            return Ok(LoadedMedia {
                key,
                image,
                origin: MediaOrigin::Cache,
            });
        }

        let task = FetchTask {
            cache: self.cache.clone(),
            transport: self.transport.clone(),
        };
        let url = url.to_string();
        let handle = tokio::spawn(async move { task.run(key, &url).await });
        self.track(handle.abort_handle());

        match handle.await {
            Ok(result) => result,
            Err(join_err) if join_err.is_cancelled() => Err(FetchError::Cancelled),
            Err(join_err) => Err(FetchError::Transport(format!(
                "fetch task panicked: {join_err}"
            ))),
        }
    }

    /// Starts a fetch without waiting for it.
    ///
    /// The outcome arrives as a [`MediaLoadedEvent`] on the session's event
    /// channel. A malformed URL completes immediately with
    /// [`FetchError::InvalidUrl`] and never touches the network. A fetch
    /// aborted by [`cancel_all`] produces no event.
    ///
    /// [`cancel_all`]: Self::cancel_all
    pub fn fetch_detached(&self, url: &str) {
        let key = MediaKey::new(url);

        if let Err(invalid) = validate_url(url) {
            self.emit(MediaLoadedEvent {
                key,
                result: Err(invalid),
            });
            return;
        }

        let task = FetchTask {
            cache: self.cache.clone(),
            transport: self.transport.clone(),
        };
        let event_tx = self.event_tx.clone();
        let url = url.to_string();

        let handle = tokio::spawn(async move {
            let result = task.run(key.clone(), &url).await;
            let _ = event_tx.send(MediaLoadedEvent { key, result });
        });
        self.track(handle.abort_handle());
    }

    /// Cancels every tracked fetch not already finished.
    ///
    /// Best-effort and global: no partial or ordered cancellation.
    pub fn cancel_all(&self) {
        let mut tasks = self.tasks.lock();
        let mut cancelled = 0usize;
        for handle in tasks.drain(..) {
            if !handle.is_finished() {
                handle.abort();
                cancelled += 1;
            }
        }
        if cancelled > 0 {
            debug!(count = cancelled, "Cancelled in-flight media fetches");
        }
    }

    /// Returns the number of fetches still in flight.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks.lock().iter().filter(|h| !h.is_finished()).count()
    }

    /// Tracks a new fetch, pruning handles whose tasks already finished.
    fn track(&self, handle: AbortHandle) {
        let mut tasks = self.tasks.lock();
        tasks.retain(|h| !h.is_finished());
        tasks.push(handle);
    }

    fn emit(&self, event: MediaLoadedEvent) {
        if let Err(e) = self.event_tx.send(event) {
            error!("Failed to deliver media event: {e}");
        }
    }
}

/// Validates a resource locator before any network activity.
fn validate_url(url: &str) -> FetchResult<()> {
    reqwest::Url::parse(url)
        .map(|_| ())
        .map_err(|_| FetchError::InvalidUrl(url.to_string()))
}

/// State captured by one spawned fetch.
struct FetchTask {
    cache: Arc<MemoryImageCache>,
    transport: Arc<dyn ByteTransport>,
}

impl FetchTask {
    async fn run(&self, key: MediaKey, url: &str) -> FetchResult<LoadedMedia> {
        let bytes = self.transport.fetch_bytes(url).await?;
        if bytes.is_empty() {
            return Err(FetchError::DownloadFailed);
        }

        let decoded = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
            .await
            .map_err(|e| FetchError::Decode(format!("decode task panicked: {e}")))?
            .map_err(|e| FetchError::Decode(e.to_string()))?;

        let image = Arc::new(decoded);

        // Cache before completing so the image is visible under the key the
        // moment the caller observes success.
        self.cache.put(key.clone(), image.clone()).await;
        debug!(key = %key, "Media downloaded and cached");

        Ok(LoadedMedia {
            key,
            image,
            origin: MediaOrigin::Network,
        })
    }
}
