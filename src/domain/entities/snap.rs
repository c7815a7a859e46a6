//! Story snap entity.

use serde::{Deserialize, Serialize};

use super::MediaKey;

/// Kind of media a snap carries, derived from its MIME type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapKind {
    /// Still image content.
    Image,
    /// Video content.
    Video,
}

impl SnapKind {
    /// Derives the kind from a MIME type string.
    ///
    /// Unknown types default to `Image`, matching how feeds treat
    /// unrecognized attachments.
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("video/") {
            Self::Video
        } else {
            Self::Image
        }
    }
}

/// A single snap: one piece of media inside a story reel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorySnap {
    /// Resource URL of the media.
    pub url: String,
    /// MIME type as reported by the feed, e.g. `image/jpeg`.
    pub mime_type: String,
}

impl StorySnap {
    /// Creates a new snap.
    #[must_use]
    pub fn new(url: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Returns the media kind this snap carries.
    #[must_use]
    pub fn kind(&self) -> SnapKind {
        SnapKind::from_mime(&self.mime_type)
    }

    /// Returns the cache key for this snap's media.
    #[must_use]
    pub fn key(&self) -> MediaKey {
        MediaKey::new(self.url.clone())
    }
}
