use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const DEFAULT_PAGE_URL: &str = "https://octofind.invalid/search";
/// Matches the quiet period of the widget this tool reproduces.
pub const DEFAULT_DEBOUNCE_MS: u64 = 2500;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level configuration loaded from .octofind.toml.
/// All fields are optional — the tool works with zero config.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub github: GitHubConfig,

    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitHubConfig {
    /// API token. If None, falls back to the GITHUB_TOKEN env var.
    pub token: Option<String>,

    /// API base URL, overridable to point lookups at a local stub.
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UiConfig {
    /// Quiet period before a typed value fires a lookup, in milliseconds.
    pub debounce_ms: Option<u64>,

    /// Base URL the resolved login is reflected into.
    pub page_url: Option<String>,
}

impl Config {
    /// Load configuration from .octofind.toml in the current directory,
    /// falling back to defaults if the file doesn't exist.
    pub fn load() -> Result<Config, ConfigError> {
        let path = Path::new(".octofind.toml");
        let mut config = if path.exists() {
            Self::load_from(path)?
        } else {
            Config::default()
        };

        if config.github.token.is_none() {
            if let Ok(token) = std::env::var("GITHUB_TOKEN") {
                config.github.token = Some(token);
            }
        }

        Ok(config)
    }

    /// Load from a specific path (useful for testing and --config).
    pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the API token: config file value takes precedence,
    /// falls back to the GITHUB_TOKEN env var.
    pub fn github_token(&self) -> Option<String> {
        self.github
            .token
            .clone()
            .or_else(|| std::env::var("GITHUB_TOKEN").ok())
    }

    pub fn api_url(&self) -> &str {
        self.github.api_url.as_deref().unwrap_or(DEFAULT_API_URL)
    }

    pub fn page_url(&self) -> &str {
        self.ui.page_url.as_deref().unwrap_or(DEFAULT_PAGE_URL)
    }

    pub fn debounce_ms(&self) -> u64 {
        self.ui.debounce_ms.unwrap_or(DEFAULT_DEBOUNCE_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.github.token.is_none());
        assert_eq!(config.api_url(), DEFAULT_API_URL);
        assert_eq!(config.page_url(), DEFAULT_PAGE_URL);
        assert_eq!(config.debounce_ms(), 2500);
    }

    #[test]
    fn test_parse_config_toml() {
        let toml_str = r#"
[github]
api_url = "http://localhost:8080"

[ui]
debounce_ms = 300
page_url = "https://example.com/people"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.api_url(), "http://localhost:8080");
        assert_eq!(config.debounce_ms(), 300);
        assert_eq!(config.page_url(), "https://example.com/people");
        assert!(config.github.token.is_none());
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str("[ui]\ndebounce_ms = 100\n").unwrap();
        assert_eq!(config.debounce_ms(), 100);
        assert_eq!(config.api_url(), DEFAULT_API_URL);
    }

    #[test]
    fn test_github_token_resolution() {
        // Env var set/restore lives in a single test so it cannot race
        // another config test.
        std::env::set_var("GITHUB_TOKEN", "env-token");

        // No file value: the environment fills in.
        let config = Config::default();
        assert_eq!(config.github_token().as_deref(), Some("env-token"));

        // Both present: the file value wins.
        let config: Config = toml::from_str("[github]\ntoken = \"file-token\"\n").unwrap();
        assert_eq!(config.github_token().as_deref(), Some("file-token"));

        std::env::remove_var("GITHUB_TOKEN");
        assert_eq!(config.github_token().as_deref(), Some("file-token"));
        assert!(Config::default().github_token().is_none());
    }

    #[test]
    fn test_load_from_missing_file_errors() {
        let err = Config::load_from(Path::new("/nonexistent/.octofind.toml"));
        assert!(matches!(err, Err(ConfigError::FileRead(_))));
    }
}
