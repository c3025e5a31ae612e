//! Panel configuration parsed from environment variables.

use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080";
pub const DEFAULT_STATE_PATH: &str = ".analyzer-chat/state.json";
pub const DEFAULT_LOG_PATH: &str = ".analyzer-chat/diagnostics.log";
pub const DEFAULT_PREVIEW_CHARS: usize = 100;
pub const ANALYZE_PATH: &str = "/analyze";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid ANALYZER_BASE_URL '{0}': expected http:// or https://")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelConfig {
    pub base_url: String,
    pub state_path: PathBuf,
    /// Diagnostic log file; traffic goes to `tracing` when `None`.
    pub log_path: Option<PathBuf>,
    pub preview_chars: usize,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            log_path: Some(PathBuf::from(DEFAULT_LOG_PATH)),
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl PanelConfig {
    /// Build typed panel config from environment variables.
    ///
    /// Optional:
    /// - `ANALYZER_BASE_URL`: default `http://127.0.0.1:8080`
    /// - `ANALYZER_STATE_PATH`: default `.analyzer-chat/state.json`
    /// - `ANALYZER_LOG_PATH`: default `.analyzer-chat/diagnostics.log`; empty
    ///   sends diagnostics to `tracing` instead
    /// - `ANALYZER_PREVIEW_CHARS`: default 100
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for a base URL without an http(s) scheme.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url(&std::env::var("ANALYZER_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()))?;
        let state_path = std::env::var("ANALYZER_STATE_PATH").map_or_else(|_| PathBuf::from(DEFAULT_STATE_PATH), PathBuf::from);
        let log_path = match std::env::var("ANALYZER_LOG_PATH") {
            Ok(v) if v.is_empty() => None,
            Ok(v) => Some(PathBuf::from(v)),
            Err(_) => Some(PathBuf::from(DEFAULT_LOG_PATH)),
        };
        let preview_chars = env_parse("ANALYZER_PREVIEW_CHARS", DEFAULT_PREVIEW_CHARS);
        Ok(Self { base_url, state_path, log_path, preview_chars })
    }

    /// Replace the base URL, applying the same validation as `from_env`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidBaseUrl`] for a base URL without an http(s) scheme.
    pub fn with_base_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(raw)?;
        Ok(self)
    }

    /// Full URL of the analysis endpoint.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}{ANALYZE_PATH}", self.base_url)
    }
}

pub(crate) fn parse_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Ok(trimmed.to_owned())
    } else {
        Err(ConfigError::InvalidBaseUrl(raw.to_owned()))
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
