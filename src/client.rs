//! HTTP client for the ingestion backend.
//!
//! Two endpoints, both fire-and-report:
//!
//! - `POST {base}/documents/text` — JSON body for extracted pages.
//! - `POST {base}/documents/file` — multipart body for binary payloads.
//!
//! Neither operation returns an error for ordinary HTTP failures: a non-2xx
//! response becomes a failed [`IngestionOutcome`] carrying the status and
//! response body, and transport-level failures (DNS, connection refused,
//! timeout) become failed outcomes carrying the transport error description.
//! The orchestrator therefore never has to distinguish transport from
//! application errors.
//!
//! Transport failures on submit are the one transient case worth retrying,
//! so they get a bounded retry with doubling backoff. HTTP error responses
//! are deliberate backend answers and are never retried.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde_json::json;
use url::Url;

use crate::types::{BinaryPayload, ExtractedDocument, IngestionOutcome, SourceKind};

const TEXT_ENDPOINT: &str = "documents/text";
const FILE_ENDPOINT: &str = "documents/file";

/// Client for the backend's text- and file-ingestion endpoints.
///
/// Carries no local state beyond configuration; the underlying
/// [`reqwest::Client`] is injected so its connection pool is shared with the
/// fetch side of the pipeline.
#[derive(Debug, Clone)]
pub struct IngestClient {
    http: Client,
    base_url: Url,
    token: Option<String>,
    max_retries: u32,
    retry_backoff: Duration,
}

impl IngestClient {
    /// Creates a client for the backend at `base_url`.
    #[must_use]
    pub fn new(http: Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            token: None,
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
        }
    }

    /// Attaches a bearer token passed through on every submit call.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Configures the transport-failure retry bound and initial backoff.
    #[must_use]
    pub fn with_retry(mut self, max_retries: u32, backoff: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_backoff = backoff;
        self
    }

    fn endpoint(&self, suffix: &str) -> String {
        format!("{}/{suffix}", self.base_url.as_str().trim_end_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Submits an extracted page to the text-ingestion endpoint.
    pub async fn submit_text(&self, doc: &ExtractedDocument) -> IngestionOutcome {
        let url = self.endpoint(TEXT_ENDPOINT);
        let body = json!({
            "text": doc.markdown,
            "file_path": doc.source_url,
            "metadata": { "url": doc.source_url },
            "source": "web",
        });

        self.dispatch(&doc.source_url, SourceKind::Page, || {
            Ok(self.authorize(self.http.post(&url).json(&body)))
        })
        .await
    }

    /// Submits a binary payload to the file-ingestion endpoint.
    pub async fn submit_file(&self, payload: &BinaryPayload) -> IngestionOutcome {
        let url = self.endpoint(FILE_ENDPOINT);

        self.dispatch(&payload.source_url, SourceKind::PdfFile, || {
            let part = Part::bytes(payload.bytes.clone())
                .file_name(payload.filename.clone())
                .mime_str(&payload.mime_type)?;
            let form = Form::new().part("file", part);
            Ok(self.authorize(
                self.http
                    .post(&url)
                    .header(ACCEPT, "application/json")
                    .multipart(form),
            ))
        })
        .await
    }

    /// Sends a request built by `build`, retrying transport failures up to
    /// the configured bound. `build` is re-invoked per attempt because
    /// multipart bodies are not cloneable.
    async fn dispatch<F>(&self, source_url: &str, kind: SourceKind, build: F) -> IngestionOutcome
    where
        F: Fn() -> Result<RequestBuilder, reqwest::Error>,
    {
        let mut attempt: u32 = 0;
        let mut backoff = self.retry_backoff;

        loop {
            let request = match build() {
                Ok(request) => request,
                // Unreachable for well-formed payloads; treated as an
                // ingestion failure rather than a propagated error.
                Err(err) => {
                    return IngestionOutcome::failure(
                        source_url,
                        kind,
                        None,
                        format!("could not encode request: {err}"),
                    );
                }
            };

            match request.send().await {
                Ok(response) => return self.outcome_of(source_url, kind, response).await,
                Err(err) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        url = %source_url,
                        error = %err,
                        attempt,
                        max_retries = self.max_retries,
                        "submit transport failure; retrying"
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                }
                Err(err) => {
                    return IngestionOutcome::failure(
                        source_url,
                        kind,
                        err.status().map(|s| s.as_u16()),
                        format!("transport error: {err}"),
                    );
                }
            }
        }
    }

    async fn outcome_of(
        &self,
        source_url: &str,
        kind: SourceKind,
        response: reqwest::Response,
    ) -> IngestionOutcome {
        let status = response.status();
        if status.is_success() {
            return IngestionOutcome::success(source_url, kind, status.as_u16());
        }

        let body = response.text().await.unwrap_or_default();
        let detail = if body.trim().is_empty() {
            format!("backend returned {status}")
        } else {
            body
        };
        IngestionOutcome::failure(source_url, kind, Some(status.as_u16()), detail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client_for(base: &str) -> IngestClient {
        IngestClient::new(Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn endpoint_joins_without_double_slash() {
        let client = client_for("http://localhost:9621/");
        assert_eq!(
            client.endpoint(TEXT_ENDPOINT),
            "http://localhost:9621/documents/text"
        );

        let client = client_for("http://localhost:9621");
        assert_eq!(
            client.endpoint(FILE_ENDPOINT),
            "http://localhost:9621/documents/file"
        );
    }

    #[test]
    fn endpoint_preserves_base_path() {
        let client = client_for("https://rag.internal/api/");
        assert_eq!(
            client.endpoint(TEXT_ENDPOINT),
            "https://rag.internal/api/documents/text"
        );
    }
}
