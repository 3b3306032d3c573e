use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_config(name: &str) -> Option<Self> {
        <Self as clap::ValueEnum>::from_str(name, true).ok()
    }
}

#[derive(Parser)]
#[command(name = "ytsum", about = "Summarize YouTube videos from their transcript or metadata", version)]
pub struct Cli {
    /// YouTube video URL (reads one URL per line from stdin if omitted)
    pub url: Option<String>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Preferred transcript language [default: en]
    #[arg(short, long)]
    pub lang: Option<String>,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Gemini model for summarization [default: gemini-pro]
    #[arg(long)]
    pub model: Option<String>,

    /// Show video ID, content source and final stage
    #[arg(short, long)]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let cli = Cli::try_parse_from(["ytsum", "https://youtu.be/xyz789", "-f", "json", "--model", "gemini-1.5-pro"]).unwrap();
        assert_eq!(cli.url.as_deref(), Some("https://youtu.be/xyz789"));
        assert_eq!(cli.format, Some(OutputFormat::Json));
        assert_eq!(cli.model.as_deref(), Some("gemini-1.5-pro"));
        assert!(cli.lang.is_none());
    }

    #[test]
    fn test_format_from_config() {
        assert_eq!(OutputFormat::from_config("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_config("srt"), None);
    }
}
