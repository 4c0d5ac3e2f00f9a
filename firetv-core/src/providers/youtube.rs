use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use firetv_model::TrailerPayload;

use super::{BaseUrl, ProviderError, read_json};

pub const YOUTUBE_API_BASE: &str = "https://www.googleapis.com/youtube/v3";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct YouTubeSearchResponse {
    pub items: Vec<YouTubeSearchItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct YouTubeSearchItem {
    pub id: YouTubeItemId,
    pub snippet: YouTubeSnippet,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct YouTubeItemId {
    pub video_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct YouTubeSnippet {
    pub title: String,
    pub thumbnails: YouTubeThumbnails,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct YouTubeThumbnails {
    pub default: Option<YouTubeThumbnail>,
    pub medium: Option<YouTubeThumbnail>,
    pub high: Option<YouTubeThumbnail>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct YouTubeThumbnail {
    pub url: String,
}

impl YouTubeSearchItem {
    /// `None` for results that are not videos.
    pub fn into_trailer(self) -> Option<TrailerPayload> {
        let video_id = self.id.video_id.filter(|id| !id.is_empty())?;
        let thumbnails = self.snippet.thumbnails;
        let thumbnail = thumbnails
            .high
            .or(thumbnails.default)
            .map(|t| t.url)
            .unwrap_or_else(|| TrailerPayload::default_thumbnail(&video_id));
        Some(TrailerPayload::new(video_id, self.snippet.title, thumbnail))
    }
}

#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: Client,
    base: BaseUrl,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(
        client: Client,
        base_url: &str,
        api_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            client,
            base: BaseUrl::parse(base_url)?,
            api_key: api_key.into(),
        })
    }

    /// Top video hit for `query`, if any.
    pub async fn search_first_video(
        &self,
        query: &str,
    ) -> Result<Option<TrailerPayload>, ProviderError> {
        debug!("YouTube search for: {}", query);
        let response = self
            .client
            .get(self.base.join("search"))
            .query(&[
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("key", self.api_key.as_str()),
                ("maxResults", "1"),
            ])
            .send()
            .await?;

        let body: YouTubeSearchResponse = read_json("YouTube", response).await?;
        Ok(body.items.into_iter().find_map(YouTubeSearchItem::into_trailer))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn high_thumbnail_wins_over_default() {
        let item: YouTubeSearchItem = serde_json::from_value(json!({
            "id": {"kind": "youtube#video", "videoId": "abc123"},
            "snippet": {
                "title": "Dark | Official Trailer",
                "thumbnails": {
                    "default": {"url": "d.jpg"},
                    "high": {"url": "h.jpg"}
                }
            }
        }))
        .unwrap();
        let trailer = item.into_trailer().unwrap();
        assert_eq!(trailer.video_id, "abc123");
        assert_eq!(trailer.thumbnail, "h.jpg");
    }

    #[test]
    fn falls_back_to_default_thumbnail() {
        let item: YouTubeSearchItem = serde_json::from_value(json!({
            "id": {"videoId": "xyz"},
            "snippet": {"title": "t", "thumbnails": {"default": {"url": "d.jpg"}}}
        }))
        .unwrap();
        assert_eq!(item.into_trailer().unwrap().thumbnail, "d.jpg");
    }

    #[test]
    fn channel_results_are_skipped() {
        let item: YouTubeSearchItem = serde_json::from_value(json!({
            "id": {"kind": "youtube#channel", "channelId": "c"},
            "snippet": {"title": "t"}
        }))
        .unwrap();
        assert!(item.into_trailer().is_none());
    }
}
