//! Presentation layer with view state and widgets.

/// Reusable widgets.
pub mod widgets;

pub use widgets::{
    ContentLoader, ImageContentLoader, ImageViewState, StoryView, StoryViewStyle, StoryViewWidget,
    VideoContentLoader,
};
