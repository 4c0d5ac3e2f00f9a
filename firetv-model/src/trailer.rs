use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A playable trailer resolved from the video search API.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TrailerPayload {
    pub video_id: String,
    pub title: String,
    pub thumbnail: String,
}

impl TrailerPayload {
    pub fn new(
        video_id: impl Into<String>,
        title: impl Into<String>,
        thumbnail: impl Into<String>,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
            thumbnail: thumbnail.into(),
        }
    }

    /// Thumbnail URL the image CDN serves for any public video id.
    pub fn default_thumbnail(video_id: &str) -> String {
        format!("https://img.youtube.com/vi/{video_id}/maxresdefault.jpg")
    }
}

/// Stable cache key for a trailer lookup.
///
/// Keys are derived deterministically from the request so the same title
/// always maps to the same cache slot.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct TrailerKey(String);

impl TrailerKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// `"{title}-{season|series}-{episode|trailer}"`
    pub fn for_episode(
        title: &str,
        season: Option<u32>,
        episode: Option<u32>,
    ) -> Self {
        let season = season
            .map(|s| s.to_string())
            .unwrap_or_else(|| "series".to_string());
        let episode = episode
            .map(|e| e.to_string())
            .unwrap_or_else(|| "trailer".to_string());
        Self(format!("{title}-{season}-{episode}"))
    }

    /// `"{title}-{year}"`
    pub fn for_title(title: &str, year: i32) -> Self {
        Self(format!("{title}-{year}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for TrailerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TrailerKey").field(&self.0).finish()
    }
}

impl fmt::Display for TrailerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TrailerKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
