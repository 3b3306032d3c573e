use thiserror::Error;

/// Why a transcript could not be produced for a video
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("transcripts are disabled for video {video_id}")]
    Disabled { video_id: String },

    #[error("no transcript in '{lang}' for video {video_id} (available: {})", .available.join(", "))]
    NotFound {
        video_id: String,
        lang: String,
        available: Vec<String>,
    },

    #[error("video {video_id} is not playable: {reason}")]
    Unplayable { video_id: String, reason: String },

    #[error("unexpected response from YouTube: {0}")]
    Malformed(String),

    #[error(transparent)]
    Request(#[from] reqwest::Error),
}

impl TranscriptError {
    /// Disabled and not-found are expected conditions; everything else is a failure
    pub fn is_expected(&self) -> bool {
        matches!(self, TranscriptError::Disabled { .. } | TranscriptError::NotFound { .. })
    }
}

/// Why video metadata is unavailable
#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("metadata service returned {0}")]
    Status(reqwest::StatusCode),

    #[error("metadata service returned no items for video {0}")]
    NoItems(String),

    #[error("could not decode metadata response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Request(#[from] reqwest::Error),
}
