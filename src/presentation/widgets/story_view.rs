//! Story view: tri-state media views with a retry affordance.

use std::sync::Arc;

use async_trait::async_trait;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::Widget;
use tracing::warn;

use crate::domain::entities::{ContentState, SnapKind, StorySnap};
use crate::infrastructure::image::{FetchSession, MediaLoadedEvent};

use super::media_view::ImageViewState;

/// Label shown on the retry affordance of a failed view.
const RETRY_LABEL: &str = "[ Re-try ]";

/// Capability implemented by each media kind's loader.
///
/// A loader owns the mechanics of getting its content on screen; the
/// [`StoryView`] owns the loading/loaded/failed lifecycle around it.
#[async_trait]
pub trait ContentLoader: Send {
    /// Kicks off (or, on retry, re-kicks) the content load.
    /// Returns the state the view should enter right away.
    async fn load_content(&mut self, session: &FetchSession) -> ContentState;

    /// Applies a completion event.
    /// Returns the resulting state if the event was for this loader.
    fn on_media_loaded(&mut self, event: &MediaLoadedEvent) -> Option<ContentState>;

    /// The bitmap to draw, if any is available yet.
    fn image(&self) -> Option<&Arc<image::DynamicImage>>;
}

/// Loads still-image snaps through the view loader and cache.
pub struct ImageContentLoader {
    url: String,
    view: ImageViewState,
}

impl ImageContentLoader {
    /// Creates a loader for the image behind `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            view: ImageViewState::new(),
        }
    }
}

#[async_trait]
impl ContentLoader for ImageContentLoader {
    async fn load_content(&mut self, session: &FetchSession) -> ContentState {
        match self.view.set_image(session, &self.url, None).await {
            Some(_) => ContentState::Loaded,
            None => ContentState::Loading,
        }
    }

    fn on_media_loaded(&mut self, event: &MediaLoadedEvent) -> Option<ContentState> {
        if !self.view.on_media_loaded(event) {
            return None;
        }
        Some(match &event.result {
            Ok(_) => ContentState::Loaded,
            Err(e) => ContentState::Failed(e.to_string()),
        })
    }

    fn image(&self) -> Option<&Arc<image::DynamicImage>> {
        self.view.current_image()
    }
}

/// Loader variant for video snaps.
///
/// Video playback is not implemented; the view simply stays loading.
pub struct VideoContentLoader {
    url: String,
}

impl VideoContentLoader {
    /// Creates a loader for the video behind `url`.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

#[async_trait]
impl ContentLoader for VideoContentLoader {
    async fn load_content(&mut self, _session: &FetchSession) -> ContentState {
        warn!(url = %self.url, "Video playback is not implemented; view stays loading");
        ContentState::Loading
    }

    fn on_media_loaded(&mut self, _event: &MediaLoadedEvent) -> Option<ContentState> {
        None
    }

    fn image(&self) -> Option<&Arc<image::DynamicImage>> {
        None
    }
}

/// One snap's view: content loader plus the tri-state lifecycle.
///
/// A view begins loading; a load attempt ends in loaded or failed, and a
/// failed view exposes a retry that re-enters loading.
pub struct StoryView {
    snap: StorySnap,
    state: ContentState,
    loader: Box<dyn ContentLoader>,
}

impl StoryView {
    /// Creates a view for a snap, picking the loader from its media kind.
    #[must_use]
    pub fn new(snap: StorySnap) -> Self {
        let loader: Box<dyn ContentLoader> = match snap.kind() {
            SnapKind::Image => Box::new(ImageContentLoader::new(snap.url.clone())),
            SnapKind::Video => Box::new(VideoContentLoader::new(snap.url.clone())),
        };
        Self {
            snap,
            state: ContentState::Loading,
            loader,
        }
    }

    /// Begins the initial content load.
    pub async fn start(&mut self, session: &FetchSession) {
        self.state = self.loader.load_content(session).await;
    }

    /// Routes a completion event to the loader.
    /// Returns whether the event was consumed by this view.
    pub fn handle_event(&mut self, event: &MediaLoadedEvent) -> bool {
        if let Some(state) = self.loader.on_media_loaded(event) {
            self.state = state;
            true
        } else {
            false
        }
    }

    /// Retries a failed load, re-entering the loading state.
    /// Does nothing unless the view is currently failed.
    pub async fn retry(&mut self, session: &FetchSession) {
        if !self.state.is_failed() {
            return;
        }
        self.state = ContentState::Loading;
        self.state = self.loader.load_content(session).await;
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &ContentState {
        &self.state
    }

    /// True when the view is failed and offers its retry affordance.
    #[must_use]
    pub const fn can_retry(&self) -> bool {
        self.state.is_failed()
    }

    /// The snap this view presents.
    #[must_use]
    pub const fn snap(&self) -> &StorySnap {
        &self.snap
    }

    /// The bitmap to draw, if available.
    #[must_use]
    pub fn image(&self) -> Option<&Arc<image::DynamicImage>> {
        self.loader.image()
    }
}

impl std::fmt::Debug for StoryView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryView")
            .field("snap", &self.snap)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}

/// Style configuration for [`StoryViewWidget`].
#[derive(Debug, Clone)]
pub struct StoryViewStyle {
    /// Fill shown while content is loading.
    pub loading: Style,
    /// Dimmed overlay shown when content failed.
    pub failed: Style,
    /// Style of the retry label.
    pub retry_label: Style,
}

impl Default for StoryViewStyle {
    fn default() -> Self {
        Self {
            loading: Style::default().bg(Color::Black),
            failed: Style::default().bg(Color::DarkGray),
            retry_label: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        }
    }
}

/// Renders a [`StoryView`] into a terminal area.
///
/// Loading fills the area dark, loaded blits the bitmap as half-block
/// cells, failed dims the area and centers the retry label. Routing input
/// to [`StoryView::retry`] is the host application's job.
#[derive(Debug)]
pub struct StoryViewWidget<'a> {
    view: &'a StoryView,
    style: StoryViewStyle,
}

impl<'a> StoryViewWidget<'a> {
    /// Creates a widget over a view with default styling.
    #[must_use]
    pub fn new(view: &'a StoryView) -> Self {
        Self {
            view,
            style: StoryViewStyle::default(),
        }
    }

    /// Overrides the widget styling.
    #[must_use]
    pub fn style(mut self, style: StoryViewStyle) -> Self {
        self.style = style;
        self
    }
}

impl Widget for StoryViewWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        match self.view.state() {
            ContentState::Loading => {
                buf.set_style(area, self.style.loading);
                if let Some(image) = self.view.image() {
                    // Placeholder bitmap, if the view has one.
                    render_halfblocks(image, area, buf);
                }
            }
            ContentState::Loaded => {
                if let Some(image) = self.view.image() {
                    render_halfblocks(image, area, buf);
                } else {
                    buf.set_style(area, self.style.loading);
                }
            }
            ContentState::Failed(_) => {
                buf.set_style(area, self.style.failed);
                let label_width = RETRY_LABEL.len() as u16;
                if area.width >= label_width {
                    let x = area.x + (area.width - label_width) / 2;
                    let y = area.y + area.height / 2;
                    buf.set_string(x, y, RETRY_LABEL, self.style.retry_label);
                }
            }
        }
    }
}

/// Blits a bitmap into the area using upper-half-block cells, two pixel
/// rows per terminal row.
fn render_halfblocks(image: &image::DynamicImage, area: Rect, buf: &mut Buffer) {
    let target_w = u32::from(area.width);
    let target_h = u32::from(area.height) * 2;
    if target_w == 0 || target_h == 0 {
        return;
    }

    let thumb = image.thumbnail_exact(target_w, target_h).to_rgba8();
    for row in 0..area.height {
        for col in 0..area.width {
            let top = thumb.get_pixel(u32::from(col), u32::from(row) * 2);
            let bottom = thumb.get_pixel(u32::from(col), u32::from(row) * 2 + 1);
            if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                cell.set_symbol("▀")
                    .set_fg(Color::Rgb(top[0], top[1], top[2]))
                    .set_bg(Color::Rgb(bottom[0], bottom[1], bottom[2]));
            }
        }
    }
}
