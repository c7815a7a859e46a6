mod media_view;
mod story_view;

pub use media_view::ImageViewState;
pub use story_view::{
    ContentLoader, ImageContentLoader, StoryView, StoryViewStyle, StoryViewWidget,
    VideoContentLoader,
};
