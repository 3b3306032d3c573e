use async_trait::async_trait;
use eyre::{Result, WrapErr};
use log::{debug, info};
use serde::Serialize;

use crate::error::{MetadataError, TranscriptError};
use crate::summarize::Summarizer;
use crate::{Content, ContentSource, Transcript, VideoMetadata};

/// Retrieves the spoken transcript of a video
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    async fn fetch_transcript(&self, video_id: &str) -> Result<Transcript, TranscriptError>;
}

/// Retrieves title and description of a video
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch_metadata(&self, video_id: &str) -> Result<VideoMetadata, MetadataError>;
}

/// Turns a prompt into generated text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    AwaitingLink,
    LinkParsed,
    LinkInvalid,
    FetchingTranscript,
    FetchingMetadata,
    HaveContent,
    NoContent,
    Summarizing,
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::AwaitingLink => "awaiting-link",
            Stage::LinkParsed => "link-parsed",
            Stage::LinkInvalid => "link-invalid",
            Stage::FetchingTranscript => "fetching-transcript",
            Stage::FetchingMetadata => "fetching-metadata",
            Stage::HaveContent => "have-content",
            Stage::NoContent => "no-content",
            Stage::Summarizing => "summarizing",
            Stage::Done => "done",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Warning,
    Error,
}

/// A message the user should see
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// Outcome of one run of the pipeline for one link
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub input: String,
    pub video_id: Option<String>,
    pub thumbnail_url: Option<String>,
    pub stage: Stage,
    pub source: Option<ContentSource>,
    pub notices: Vec<Notice>,
    pub summary: Option<String>,
}

impl Report {
    fn new(input: &str) -> Self {
        Self {
            input: input.to_string(),
            video_id: None,
            thumbnail_url: None,
            stage: Stage::AwaitingLink,
            source: None,
            notices: Vec::new(),
            summary: None,
        }
    }

    fn advance(&mut self, stage: Stage) {
        debug!("{}: {} -> {stage}", self.input, self.stage);
        self.stage = stage;
    }

    fn notify(&mut self, notice: Notice) {
        debug!("{:?}: {}", notice.level, notice.message);
        self.notices.push(notice);
    }
}

/// Link -> transcript or metadata -> summary
pub struct Pipeline<'a> {
    transcripts: &'a dyn TranscriptFetcher,
    metadata: &'a dyn MetadataFetcher,
    summarizer: Summarizer<'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        transcripts: &'a dyn TranscriptFetcher,
        metadata: &'a dyn MetadataFetcher,
        summarizer: Summarizer<'a>,
    ) -> Self {
        Self {
            transcripts,
            metadata,
            summarizer,
        }
    }

    /// Run the whole flow for one link. Only a summarization failure is returned as an error.
    pub async fn run(&self, input: &str) -> Result<Report> {
        let mut report = Report::new(input);

        let Some(video_id) = crate::extract_video_id(input) else {
            report.advance(Stage::LinkInvalid);
            report.notify(Notice::error("Invalid YouTube link provided. Please check and try again."));
            return Ok(report);
        };
        report.thumbnail_url = Some(crate::thumbnail_url(&video_id));
        report.video_id = Some(video_id.clone());
        report.advance(Stage::LinkParsed);

        let Some(content) = self.gather_content(&video_id, &mut report).await else {
            report.advance(Stage::NoContent);
            return Ok(report);
        };
        report.source = Some(content.source);
        report.advance(Stage::HaveContent);

        report.advance(Stage::Summarizing);
        let summary = self.summarizer.summarize(&content).await?;
        info!("Summarized {video_id} from {}", content.source);
        report.summary = Some(summary);
        report.advance(Stage::Done);

        Ok(report)
    }

    /// Run each non-blank link independently; a failed summary does not stop the rest
    pub async fn run_all(&self, inputs: &[String]) -> Vec<Result<Report>> {
        let mut outcomes = Vec::new();
        for input in inputs.iter().map(|i| i.trim()).filter(|i| !i.is_empty()) {
            let outcome = self
                .run(input)
                .await
                .wrap_err_with(|| format!("summarization failed for {input}"));
            outcomes.push(outcome);
        }
        outcomes
    }

    async fn gather_content(&self, video_id: &str, report: &mut Report) -> Option<Content> {
        report.advance(Stage::FetchingTranscript);
        match self.transcripts.fetch_transcript(video_id).await {
            Ok(transcript) if !transcript.text().is_empty() => return Some(Content::from(&transcript)),
            Ok(_) => {
                debug!("Transcript for {video_id} has no text");
                report.notify(Notice::warning("No transcript found for this video."));
            }
            Err(e) => {
                debug!("Transcript unavailable for {video_id}: {e}");
                report.notify(transcript_notice(&e));
            }
        }

        report.notify(Notice::warning(
            "Transcript not available. Using video title and description for summarization.",
        ));
        report.advance(Stage::FetchingMetadata);
        match self.metadata.fetch_metadata(video_id).await {
            Ok(metadata) if metadata.is_complete() => Some(Content::from(&metadata)),
            result => {
                if let Err(e) = result {
                    debug!("Metadata unavailable for {video_id}: {e}");
                }
                report.notify(Notice::error("Unable to retrieve video metadata."));
                None
            }
        }
    }
}

fn transcript_notice(err: &TranscriptError) -> Notice {
    match err {
        TranscriptError::Disabled { .. } => Notice::warning("Transcripts are disabled for this video."),
        TranscriptError::NotFound { .. } => Notice::warning("No transcript found for this video."),
        other => Notice::error(format!("An error occurred: {other}")),
    }
}
