use async_trait::async_trait;
use log::debug;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::VideoMetadata;
use crate::error::MetadataError;
use crate::pipeline::MetadataFetcher;

pub const DEFAULT_HOST: &str = "youtube-v31.p.rapidapi.com";

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

/// Video title and description from the RapidAPI youtube-v31 service
pub struct RapidApiMetadata {
    client: reqwest::Client,
    api_key: String,
    host: String,
}

impl RapidApiMetadata {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            host: host.into(),
        }
    }
}

#[async_trait]
impl MetadataFetcher for RapidApiMetadata {
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata, MetadataError> {
        let url = format!("https://{}/videos", self.host);
        debug!("Fetching metadata for {video_id} from {url}");

        let resp = self
            .client
            .get(&url)
            .query(&[("part", "snippet"), ("id", video_id)])
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.host)
            .send()
            .await?;

        check_status(resp.status())?;
        let body = resp.text().await?;
        parse_videos_response(&body, video_id)
    }
}

/// Only a plain 200 carries usable metadata
fn check_status(status: StatusCode) -> Result<(), MetadataError> {
    if status == StatusCode::OK {
        Ok(())
    } else {
        Err(MetadataError::Status(status))
    }
}

fn parse_videos_response(body: &str, video_id: &str) -> Result<VideoMetadata, MetadataError> {
    let resp: VideosResponse = serde_json::from_str(body)?;
    let item = resp
        .items
        .into_iter()
        .next()
        .ok_or_else(|| MetadataError::NoItems(video_id.to_string()))?;

    Ok(VideoMetadata {
        title: item.snippet.title,
        description: item.snippet.description,
    })
}
