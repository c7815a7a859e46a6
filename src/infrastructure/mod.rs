//! Infrastructure layer with external service adapters.

/// Image handling (caching, fetching).
pub mod image;

pub use image::{
    CacheStats, FetchSession, FetchSessionConfig, HttpByteTransport, MediaLoadedEvent,
    MemoryImageCache,
};
