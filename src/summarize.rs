use async_trait::async_trait;
use eyre::{Result, bail};
use log::debug;

use crate::Content;
use crate::pipeline::TextGenerator;

pub const DEFAULT_MODEL: &str = "gemini-pro";

pub const DEFAULT_PROMPT: &str = "You are a YouTube video summarizer. You will summarize the content using the following information:
Transcript or video metadata (title, description, etc.). The summary should be concise and under 250 words.";

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Prepends the instruction prompt to content and asks the generator for a summary
pub struct Summarizer<'a> {
    generator: &'a dyn TextGenerator,
    prompt: String,
}

impl<'a> Summarizer<'a> {
    pub fn new(generator: &'a dyn TextGenerator, prompt: impl Into<String>) -> Self {
        Self {
            generator,
            prompt: prompt.into(),
        }
    }

    pub async fn summarize(&self, content: &Content) -> Result<String> {
        debug!("Summarizing {} chars of {} content", content.text.len(), content.source);
        let input = format!("{}{}", self.prompt, content.text);
        self.generator.generate(&input).await
    }
}

/// Google Gemini `generateContent` client
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!("Generating via Gemini API with model {}", self.model);

        let url = format!("{GEMINI_BASE_URL}/models/{}:generateContent", self.model);
        let body = serde_json::json!({
            "contents": [
                {
                    "parts": [{"text": prompt}]
                }
            ]
        });

        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            bail!("Gemini API returned {status}: {body}");
        }

        let json: serde_json::Value = resp.json().await?;
        extract_gemini_text(&json)
    }
}

fn extract_gemini_text(json: &serde_json::Value) -> Result<String> {
    if let Some(parts) = json
        .get("candidates")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("content"))
        .and_then(|c| c.get("parts"))
        .and_then(|p| p.as_array())
    {
        let text: String = parts
            .iter()
            .filter_map(|part| part.get("text")?.as_str())
            .collect();
        if !text.is_empty() {
            return Ok(text);
        }
    }

    if let Some(reason) = json
        .get("promptFeedback")
        .and_then(|f| f.get("blockReason"))
        .and_then(|r| r.as_str())
    {
        bail!("Gemini blocked the prompt: {reason}");
    }
    bail!("unexpected Gemini API response format");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ContentSource;
    use std::sync::Mutex;

    struct Echo {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.seen.lock().unwrap().push(prompt.to_string());
            Ok("summary".to_string())
        }
    }

    #[test]
    fn test_extract_gemini_text() {
        let json = serde_json::json!({
            "candidates": [
                {
                    "content": {
                        "role": "model",
                        "parts": [{"text": "Here is "}, {"text": "the summary."}]
                    },
                    "finishReason": "STOP"
                }
            ]
        });
        assert_eq!(extract_gemini_text(&json).unwrap(), "Here is the summary.");
    }

    #[test]
    fn test_extract_gemini_text_empty() {
        let json = serde_json::json!({"candidates": []});
        assert!(extract_gemini_text(&json).is_err());
    }

    #[test]
    fn test_extract_gemini_text_blocked() {
        let json = serde_json::json!({"promptFeedback": {"blockReason": "SAFETY"}});
        let err = extract_gemini_text(&json).unwrap_err();
        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_summarizer_prepends_prompt() {
        let echo = Echo { seen: Mutex::new(vec![]) };
        let summarizer = Summarizer::new(&echo, "PROMPT:");
        let content = Content {
            source: ContentSource::Transcript,
            text: " hello world".to_string(),
        };
        assert_eq!(summarizer.summarize(&content).await.unwrap(), "summary");
        assert_eq!(*echo.seen.lock().unwrap(), vec!["PROMPT: hello world".to_string()]);
    }
}
