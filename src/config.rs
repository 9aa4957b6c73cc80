//! Environment-driven configuration.
//!
//! Values come from the process environment (after an optional `.env` file
//! loaded by the binary via `dotenvy`). Every knob has a default matching
//! the reference deployment, so `SyncConfig::from_env()` works with an empty
//! environment pointing at a local backend.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::types::SyncError;

/// Backend base URL when `LIGHTRAG_URL` is unset.
const DEFAULT_BACKEND_URL: &str = "http://localhost:9621";

/// Runtime configuration for a sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base URL of the ingestion backend.
    pub backend_url: Url,
    /// Optional bearer token passed through on submit calls.
    pub api_token: Option<String>,
    /// Newline-delimited list of page URLs.
    pub pages_file: PathBuf,
    /// Newline-delimited list of PDF URLs.
    pub pdfs_file: PathBuf,
    /// CSS selector locating the content region of a page.
    pub content_selector: String,
    /// Fixed delay between consecutive items.
    pub item_delay: Duration,
    /// Per-request timeout on the shared HTTP client.
    pub request_timeout: Duration,
    /// Retry bound for transport failures on submit calls.
    pub max_submit_retries: u32,
    /// Initial backoff before a submit retry (doubles per attempt).
    pub retry_backoff: Duration,
    /// User agent presented to source sites and the backend.
    pub user_agent: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            backend_url: Url::parse(DEFAULT_BACKEND_URL).expect("default URL is valid"),
            api_token: None,
            pages_file: PathBuf::from("data/urls.txt"),
            pdfs_file: PathBuf::from("data/pdfs.txt"),
            content_selector: "div.content-wrap".to_string(),
            item_delay: Duration::from_millis(500),
            request_timeout: Duration::from_secs(30),
            max_submit_retries: 2,
            retry_backoff: Duration::from_millis(500),
            user_agent: concat!("ragsync/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl SyncConfig {
    /// Builds a configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Config`] naming the offending variable when the
    /// backend URL or a numeric value cannot be parsed.
    pub fn from_env() -> Result<Self, SyncError> {
        let mut config = Self::default();

        if let Some(value) = non_empty_var("LIGHTRAG_URL") {
            config.backend_url = Url::parse(&value).map_err(|err| SyncError::Config {
                key: "LIGHTRAG_URL".to_string(),
                message: err.to_string(),
            })?;
        }
        config.api_token = non_empty_var("LIGHTRAG_TOKEN");

        if let Some(value) = non_empty_var("RAGSYNC_PAGES_FILE") {
            config.pages_file = PathBuf::from(value);
        }
        if let Some(value) = non_empty_var("RAGSYNC_PDFS_FILE") {
            config.pdfs_file = PathBuf::from(value);
        }
        if let Some(value) = non_empty_var("RAGSYNC_CONTENT_SELECTOR") {
            config.content_selector = value;
        }
        if let Some(delay) = millis_var("RAGSYNC_ITEM_DELAY_MS")? {
            config.item_delay = delay;
        }
        if let Some(timeout) = millis_var("RAGSYNC_REQUEST_TIMEOUT_MS")? {
            config.request_timeout = timeout;
        }
        if let Some(value) = non_empty_var("RAGSYNC_SUBMIT_RETRIES") {
            config.max_submit_retries = value.parse().map_err(|_| SyncError::Config {
                key: "RAGSYNC_SUBMIT_RETRIES".to_string(),
                message: format!("expected a non-negative integer, got '{value}'"),
            })?;
        }

        Ok(config)
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn millis_var(key: &str) -> Result<Option<Duration>, SyncError> {
    match non_empty_var(key) {
        None => Ok(None),
        Some(value) => parse_millis(key, &value).map(Some),
    }
}

fn parse_millis(key: &str, value: &str) -> Result<Duration, SyncError> {
    value
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| SyncError::Config {
            key: key.to_string(),
            message: format!("expected milliseconds as an integer, got '{value}'"),
        })
}
