//! Fetching a page and extracting its content region as markdown.

use reqwest::Client;
use scraper::{Html, Selector};

use crate::markdown;
use crate::types::{ExtractedDocument, ItemError, SyncError};

/// Turns page URLs into [`ExtractedDocument`]s.
///
/// Holds the shared HTTP client and the compiled selector for the
/// content-region marker, so per-page work is just fetch + parse + render.
#[derive(Debug, Clone)]
pub struct PageExtractor {
    http: Client,
    selector: Selector,
}

impl PageExtractor {
    /// Compiles the content-region selector (e.g. `div.content-wrap`).
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::Selector`] when the marker is not valid CSS.
    pub fn new(http: Client, content_selector: &str) -> Result<Self, SyncError> {
        let selector = Selector::parse(content_selector).map_err(|_| SyncError::Selector {
            selector: content_selector.to_string(),
        })?;
        Ok(Self { http, selector })
    }

    /// Fetches `url` and extracts its content region.
    ///
    /// # Errors
    ///
    /// [`ItemError::Fetch`] for transport failures and non-2xx responses;
    /// [`ItemError::ContentRegionMissing`] when the page parses but the
    /// marker is absent. The latter is an expected outcome for some pages
    /// and is recorded as a skip by the orchestrator, not a failure.
    pub async fn extract(&self, url: &str) -> Result<ExtractedDocument, ItemError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(ItemError::from_transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(ItemError::from_status(status));
        }
        let body = response.text().await.map_err(ItemError::from_transport)?;
        self.extract_from_html(url, &body)
    }

    /// Pure extraction step: deterministic for identical HTML input.
    pub fn extract_from_html(
        &self,
        url: &str,
        html: &str,
    ) -> Result<ExtractedDocument, ItemError> {
        let document = Html::parse_document(html);
        let Some(region) = document.select(&self.selector).next() else {
            return Err(ItemError::ContentRegionMissing);
        };
        Ok(ExtractedDocument {
            source_url: url.to_string(),
            markdown: markdown::render(region),
        })
    }
}
