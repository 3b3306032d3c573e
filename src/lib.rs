pub mod config;
pub mod error;
pub mod metadata;
pub mod output;
pub mod pipeline;
pub mod summarize;
pub mod youtube;

use serde::Serialize;
use url::Url;

const SHORT_LINK_DOMAIN: &str = "youtu.be";
const STANDARD_DOMAIN: &str = "youtube.com";

/// A single captioned segment
#[derive(Debug, Clone, Serialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// Captions fetched for a video
#[derive(Debug, Clone, Serialize)]
pub struct Transcript {
    pub video_id: String,
    pub language: String,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// All segment texts in order, each preceded by a single space
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| format!(" {}", s.text)).collect()
    }
}

/// Title and description of a video
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoMetadata {
    pub title: String,
    pub description: String,
}

impl VideoMetadata {
    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.description.is_empty()
    }
}

/// Where the summarized text came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentSource {
    Transcript,
    Metadata,
}

impl std::fmt::Display for ContentSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentSource::Transcript => write!(f, "transcript"),
            ContentSource::Metadata => write!(f, "metadata"),
        }
    }
}

/// Text handed to the summarizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub source: ContentSource,
    pub text: String,
}

impl From<&Transcript> for Content {
    fn from(transcript: &Transcript) -> Self {
        Content {
            source: ContentSource::Transcript,
            text: transcript.text(),
        }
    }
}

impl From<&VideoMetadata> for Content {
    fn from(metadata: &VideoMetadata) -> Self {
        Content {
            source: ContentSource::Metadata,
            text: format!("Title: {}\n\nDescription: {}", metadata.title, metadata.description),
        }
    }
}

/// Extract the video ID from a youtu.be or youtube.com link
pub fn extract_video_id(input: &str) -> Option<String> {
    let url = Url::parse(input.trim()).ok()?;
    let host = url.host_str()?;

    let id = if host.contains(SHORT_LINK_DOMAIN) {
        url.path_segments()?.next()?.to_string()
    } else if host.contains(STANDARD_DOMAIN) {
        url.query_pairs().find(|(k, _)| k == "v")?.1.into_owned()
    } else {
        return None;
    };

    if id.is_empty() { None } else { Some(id) }
}

pub fn thumbnail_url(video_id: &str) -> String {
    format!("http://img.youtube.com/vi/{video_id}/0.jpg")
}
