//! Image view state for story rendering.

use std::sync::Arc;

use tracing::trace;

use crate::domain::entities::{LoadedMedia, MediaKey, MediaOrigin};
use crate::domain::ports::ImageCachePort;
use crate::infrastructure::image::{FetchSession, MediaLoadedEvent};

/// Composed loading state owned by an image view.
///
/// `set_image` serves cache hits synchronously and delegates misses to the
/// fetch session; the completion event is applied later via
/// `on_media_loaded`. Requests are not deduplicated: two views setting the
/// same uncached key each trigger their own fetch.
#[derive(Debug, Default)]
pub struct ImageViewState {
    key: Option<MediaKey>,
    image: Option<Arc<image::DynamicImage>>,
    placeholder: Option<Arc<image::DynamicImage>>,
    busy: bool,
    show_busy_indicator: bool,
}

impl ImageViewState {
    /// Creates an empty view state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables the busy indicator overlay.
    pub const fn set_show_busy_indicator(&mut self, enabled: bool) {
        self.show_busy_indicator = enabled;
    }

    /// Begins showing the image behind `url`.
    ///
    /// The placeholder, if any, is shown immediately. A cache hit applies
    /// the image at once and is returned; on a miss the fetch is delegated
    /// to the session and `None` is returned, with the outcome arriving as a
    /// [`MediaLoadedEvent`] on the session's channel.
    pub async fn set_image(
        &mut self,
        session: &FetchSession,
        url: &str,
        placeholder: Option<Arc<image::DynamicImage>>,
    ) -> Option<LoadedMedia> {
        let key = MediaKey::new(url);
        self.key = Some(key.clone());
        self.image = None;
        self.placeholder = placeholder;
        self.busy = true;

        if let Some(image) = session.cache().get(&key).await {
            trace!(key = %key, "View served from cache");
            self.busy = false;
            self.image = Some(image.clone());
            return Some(LoadedMedia {
                key,
                image,
                origin: MediaOrigin::Cache,
            });
        }

        session.fetch_detached(url);
        None
    }

    /// Applies a completion event if it targets the key this view shows.
    ///
    /// Events for other keys (e.g. from a view that was since repointed) are
    /// ignored. Returns whether the event was consumed.
    pub fn on_media_loaded(&mut self, event: &MediaLoadedEvent) -> bool {
        if self.key.as_ref() != Some(&event.key) {
            return false;
        }

        self.busy = false;
        if let Ok(media) = &event.result {
            self.image = Some(media.image.clone());
        }
        true
    }

    /// The image to draw: the loaded one, else the placeholder.
    #[must_use]
    pub fn current_image(&self) -> Option<&Arc<image::DynamicImage>> {
        self.image.as_ref().or(self.placeholder.as_ref())
    }

    /// True while a load is in flight and the busy indicator is enabled.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.busy && self.show_busy_indicator
    }

    /// The key this view currently shows, if any.
    #[must_use]
    pub const fn key(&self) -> Option<&MediaKey> {
        self.key.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;
    use crate::domain::errors::FetchError;
    use crate::domain::ports::mocks::MockTransport;
    use crate::infrastructure::image::MemoryImageCache;

    fn session_with(
        transport: MockTransport,
    ) -> (FetchSession, mpsc::UnboundedReceiver<MediaLoadedEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let cache = Arc::new(MemoryImageCache::with_default_budget());
        (FetchSession::new(cache, Arc::new(transport), tx), rx)
    }

    fn test_image() -> Arc<image::DynamicImage> {
        Arc::new(image::DynamicImage::new_rgb8(8, 8))
    }

    #[tokio::test]
    async fn test_miss_shows_placeholder_and_busy() {
        let (session, _rx) = session_with(MockTransport::hanging());
        let mut view = ImageViewState::new();
        view.set_show_busy_indicator(true);

        let placeholder = test_image();
        let hit = view
            .set_image(&session, "https://example.com/a.png", Some(placeholder.clone()))
            .await;

        assert!(hit.is_none());
        assert!(view.is_busy());
        let shown = view.current_image().expect("placeholder shown");
        assert!(Arc::ptr_eq(shown, &placeholder));
    }

    #[tokio::test]
    async fn test_cache_hit_applies_synchronously() {
        let (session, _rx) = session_with(MockTransport::hanging());
        let url = "https://example.com/a.png";
        let cached = test_image();
        session
            .cache()
            .put(MediaKey::new(url), cached.clone())
            .await;

        let mut view = ImageViewState::new();
        view.set_show_busy_indicator(true);
        let hit = view.set_image(&session, url, None).await;

        let media = hit.expect("synchronous cache hit");
        assert_eq!(media.origin, MediaOrigin::Cache);
        assert!(!view.is_busy());
        assert!(Arc::ptr_eq(view.current_image().expect("image"), &cached));
    }

    #[tokio::test]
    async fn test_completion_event_installs_image() {
        let (session, _rx) = session_with(MockTransport::hanging());
        let url = "https://example.com/a.png";
        let mut view = ImageViewState::new();
        view.set_show_busy_indicator(true);
        view.set_image(&session, url, None).await;

        let image = test_image();
        let key = MediaKey::new(url);
        let consumed = view.on_media_loaded(&MediaLoadedEvent {
            key: key.clone(),
            result: Ok(LoadedMedia {
                key,
                image: image.clone(),
                origin: MediaOrigin::Network,
            }),
        });

        assert!(consumed);
        assert!(!view.is_busy());
        assert!(Arc::ptr_eq(view.current_image().expect("image"), &image));
    }

    #[tokio::test]
    async fn test_stale_event_for_other_key_is_ignored() {
        let (session, _rx) = session_with(MockTransport::hanging());
        let mut view = ImageViewState::new();
        view.set_image(&session, "https://example.com/a.png", None).await;

        let consumed = view.on_media_loaded(&MediaLoadedEvent {
            key: MediaKey::new("https://example.com/other.png"),
            result: Err(FetchError::DownloadFailed),
        });

        assert!(!consumed);
        assert!(view.current_image().is_none());
    }

    #[tokio::test]
    async fn test_failure_event_clears_busy_without_image() {
        let (session, _rx) = session_with(MockTransport::hanging());
        let url = "https://example.com/a.png";
        let mut view = ImageViewState::new();
        view.set_show_busy_indicator(true);
        view.set_image(&session, url, None).await;

        let consumed = view.on_media_loaded(&MediaLoadedEvent {
            key: MediaKey::new(url),
            result: Err(FetchError::DownloadFailed),
        });

        assert!(consumed);
        assert!(!view.is_busy());
        assert!(view.current_image().is_none());
    }
}
