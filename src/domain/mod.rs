//! Domain layer with core entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{ContentState, LoadedMedia, MediaKey, MediaOrigin, SnapKind, StorySnap};
pub use errors::{FetchError, FetchResult};
pub use ports::{ByteTransport, ImageCachePort};
