use async_trait::async_trait;
use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::error::TranscriptError;
use crate::pipeline::TranscriptFetcher;
use crate::{Segment, Transcript};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
    captions: Option<CaptionsData>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
}

/// Fetches transcripts from YouTube's built-in captions via the InnerTube API
pub struct CaptionFetcher {
    client: reqwest::Client,
    lang: String,
}

impl CaptionFetcher {
    pub fn new(client: reqwest::Client, lang: impl Into<String>) -> Self {
        Self {
            client,
            lang: lang.into(),
        }
    }

    async fn fetch_captions(&self, video_id: &str) -> Result<Transcript, TranscriptError> {
        // Step 1: Fetch the watch page to get the InnerTube API key
        let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
        debug!("Fetching watch page: {watch_url}");

        let page_html = self
            .client
            .get(&watch_url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let api_key = extract_api_key(&page_html)
            .ok_or_else(|| TranscriptError::Malformed("could not extract InnerTube API key from watch page".into()))?;
        debug!("Extracted InnerTube API key: {api_key}");

        // Step 2: Call InnerTube player endpoint
        let player_url = format!("https://www.youtube.com/youtubei/v1/player?key={api_key}&prettyPrint=false");

        let body = serde_json::json!({
            "context": {
                "client": {
                    "hl": self.lang,
                    "gl": "US",
                    "clientName": "WEB",
                    "clientVersion": "2.20241126.01.00"
                }
            },
            "videoId": video_id
        });

        let resp: InnerTubePlayerResponse = self
            .client
            .post(&player_url)
            .header("User-Agent", USER_AGENT)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let tracks = caption_tracks(resp, video_id)?;
        let track = select_track(&tracks, &self.lang, video_id)?;
        debug!("Using caption track: lang={}", track.language_code);

        // Step 3: Fetch the caption XML
        let caption_xml = self
            .client
            .get(&track.base_url)
            .header("User-Agent", USER_AGENT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let segments = parse_caption_xml(&caption_xml)?;

        Ok(Transcript {
            video_id: video_id.to_string(),
            language: track.language_code.clone(),
            segments,
        })
    }
}

#[async_trait]
impl TranscriptFetcher for CaptionFetcher {
    async fn fetch_transcript(&self, video_id: &str) -> Result<Transcript, TranscriptError> {
        self.fetch_captions(video_id).await
    }
}

fn extract_api_key(html: &str) -> Option<String> {
    let re = Regex::new(r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#).ok()?;
    if let Some(caps) = re.captures(html) {
        return Some(caps[1].to_string());
    }

    // Fallback: try the newer pattern
    let re2 = Regex::new(r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#).ok()?;
    re2.captures(html).map(|caps| caps[1].to_string())
}

/// Unplayable videos fail outright; a missing tracklist means captions are disabled
fn caption_tracks(resp: InnerTubePlayerResponse, video_id: &str) -> Result<Vec<CaptionTrack>, TranscriptError> {
    match resp.playability_status {
        Some(status) if status.status != "OK" => {
            return Err(TranscriptError::Unplayable {
                video_id: video_id.to_string(),
                reason: status.reason.unwrap_or(status.status),
            });
        }
        _ => {}
    }

    let tracks = resp
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .and_then(|r| r.caption_tracks)
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(TranscriptError::Disabled {
            video_id: video_id.to_string(),
        });
    }
    Ok(tracks)
}

fn select_track<'a>(tracks: &'a [CaptionTrack], lang: &str, video_id: &str) -> Result<&'a CaptionTrack, TranscriptError> {
    tracks
        .iter()
        .find(|t| t.language_code == lang)
        .ok_or_else(|| TranscriptError::NotFound {
            video_id: video_id.to_string(),
            lang: lang.to_string(),
            available: tracks.iter().map(|t| t.language_code.clone()).collect(),
        })
}

fn parse_caption_xml(xml: &str) -> Result<Vec<Segment>, TranscriptError> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current_start: Option<f64> = None;
    let mut current_dur: Option<f64> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) if e.name().as_ref() == b"text" => {
                current_start = None;
                current_dur = None;
                for attr in e.attributes().flatten() {
                    let value = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                    match attr.key.as_ref() {
                        b"start" => current_start = value,
                        b"dur" => current_dur = value,
                        _ => {}
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                if let (Some(start), Some(duration)) = (current_start.take(), current_dur.take()) {
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw_text).to_string();
                    if !text.is_empty() {
                        segments.push(Segment { text, start, duration });
                    }
                }
            }
            Ok(Event::End(ref e)) if e.name().as_ref() == b"text" => {
                current_start = None;
                current_dur = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(TranscriptError::Malformed(format!("error parsing caption XML: {e}"))),
            _ => {}
        }
    }

    Ok(segments)
}
