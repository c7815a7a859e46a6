//! Domain entity definitions.

mod media;
mod snap;

pub use media::{ContentState, LoadedMedia, MediaKey, MediaOrigin};
pub use snap::{SnapKind, StorySnap};
