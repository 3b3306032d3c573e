use std::path::PathBuf;

use eyre::Result;
use log::debug;
use serde::{Deserialize, Serialize};

pub const GENAI_API_KEY_VAR: &str = "GENAI_API_KEY";
pub const RAPIDAPI_KEY_VAR: &str = "RAPIDAPI_KEY";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub default_lang: Option<String>,
    pub default_format: Option<String>,
    pub default_model: Option<String>,
    pub prompt: Option<String>,
    pub metadata_host: Option<String>,
}

impl Config {
    /// Load config from ~/.config/ytsum/config.toml if it exists
    pub fn load() -> Result<Self> {
        let path = config_path();
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytsum")
        .join("config.toml")
}

/// API keys for the generative-text and metadata services
#[derive(Clone)]
pub struct Credentials {
    pub genai_api_key: String,
    pub rapidapi_key: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |name: &str, purpose: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| eyre::eyre!("{name} environment variable not set (required for {purpose})"))
        };

        Ok(Self {
            genai_api_key: require(GENAI_API_KEY_VAR, "summarization")?,
            rapidapi_key: require(RAPIDAPI_KEY_VAR, "metadata fallback")?,
        })
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("genai_api_key", &"***")
            .field("rapidapi_key", &"***")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
default_lang = "es"
default_format = "json"
default_model = "gemini-1.5-flash"
prompt = "Summarize briefly: "
metadata_host = "yt.example.com"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.default_lang.as_deref(), Some("es"));
        assert_eq!(config.default_format.as_deref(), Some("json"));
        assert_eq!(config.default_model.as_deref(), Some("gemini-1.5-flash"));
        assert_eq!(config.prompt.as_deref(), Some("Summarize briefly: "));
        assert_eq!(config.metadata_host.as_deref(), Some("yt.example.com"));
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.default_lang.is_none());
        assert!(config.prompt.is_none());
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str(r#"default_lang = "fr""#).unwrap();
        assert_eq!(config.default_lang.as_deref(), Some("fr"));
        assert!(config.default_model.is_none());
    }

    #[test]
    fn test_credentials_from_lookup() {
        let creds = Credentials::from_lookup(|name| match name {
            GENAI_API_KEY_VAR => Some("genai".to_string()),
            RAPIDAPI_KEY_VAR => Some("rapid".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(creds.genai_api_key, "genai");
        assert_eq!(creds.rapidapi_key, "rapid");
        assert!(!format!("{creds:?}").contains("genai\""));
    }

    #[test]
    fn test_credentials_missing() {
        let err = Credentials::from_lookup(|name| (name == GENAI_API_KEY_VAR).then(|| "genai".to_string())).unwrap_err();
        assert!(err.to_string().contains(RAPIDAPI_KEY_VAR));
    }

    #[test]
    fn test_credentials_blank_is_missing() {
        let err = Credentials::from_lookup(|_| Some("  ".to_string())).unwrap_err();
        assert!(err.to_string().contains(GENAI_API_KEY_VAR));
    }
}
