//! Core domain types for the sync pipeline.
//!
//! Two error layers exist on purpose:
//!
//! - [`SyncError`] — fatal setup failures (unreadable source lists, bad
//!   configuration). These abort the run before any network activity.
//! - [`ItemError`] — per-item failures during fetch or extraction. These are
//!   converted into an [`IngestionOutcome`] record and the batch continues.
//!
//! Backend rejections never surface as errors at all: the ingestion client
//! folds them directly into a failed [`IngestionOutcome`].

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Source items ───────────────────────────────────────────────────────

/// The two kinds of sources the pipeline knows how to ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A rendered web page whose content region is scraped to markdown.
    Page,
    /// A PDF downloaded verbatim and uploaded as a file.
    PdfFile,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page => write!(f, "page"),
            Self::PdfFile => write!(f, "pdf"),
        }
    }
}

/// A single entry from one of the source lists.
///
/// The URL is kept as the raw string from the list file. The loader performs
/// no well-formedness validation; a malformed URL surfaces downstream as a
/// per-item fetch failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceItem {
    pub url: String,
    pub kind: SourceKind,
}

impl SourceItem {
    pub fn new(url: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            url: url.into(),
            kind,
        }
    }
}

// ── Extracted content ──────────────────────────────────────────────────

/// A page successfully reduced to its markdown representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedDocument {
    pub source_url: String,
    pub markdown: String,
}

/// A downloaded binary document ready for multipart upload.
///
/// The filename is derived from the final path segment of the URL
/// (percent-decoded), falling back to `"file.pdf"` when empty. The bytes are
/// passed through unchanged; no sniffing against the declared mime type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryPayload {
    pub source_url: String,
    pub filename: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

// ── Outcomes ───────────────────────────────────────────────────────────

/// What happened to one source item by the end of its pipeline pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    /// The backend accepted the document.
    Succeeded,
    /// The page had nothing to index (content region absent). Not an error.
    Skipped,
    /// Fetch, extraction, or submission failed.
    Failed,
}

/// The per-item record of a batch run.
///
/// The orchestrator produces exactly one of these for every item it
/// processes, regardless of where in the pipeline the item failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestionOutcome {
    pub source_url: String,
    pub kind: SourceKind,
    pub disposition: Disposition,
    /// HTTP status from the last relevant response, when one was received.
    pub status_code: Option<u16>,
    /// Failure or skip detail; `None` for successes.
    pub error_detail: Option<String>,
}

impl IngestionOutcome {
    /// Record a successful ingestion.
    #[must_use]
    pub fn success(source_url: impl Into<String>, kind: SourceKind, status_code: u16) -> Self {
        Self {
            source_url: source_url.into(),
            kind,
            disposition: Disposition::Succeeded,
            status_code: Some(status_code),
            error_detail: None,
        }
    }

    /// Record a non-error skip (nothing to index for this item).
    #[must_use]
    pub fn skipped(
        source_url: impl Into<String>,
        kind: SourceKind,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            kind,
            disposition: Disposition::Skipped,
            status_code: None,
            error_detail: Some(detail.into()),
        }
    }

    /// Record a failure at any stage of the item's pipeline.
    #[must_use]
    pub fn failure(
        source_url: impl Into<String>,
        kind: SourceKind,
        status_code: Option<u16>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            kind,
            disposition: Disposition::Failed,
            status_code,
            error_detail: Some(detail.into()),
        }
    }

    /// Returns `true` if the backend accepted the document.
    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.disposition == Disposition::Succeeded
    }

    /// Returns `true` if the item was skipped without error.
    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.disposition == Disposition::Skipped
    }

    /// Returns `true` if the item failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.disposition == Disposition::Failed
    }
}

// ── Per-item errors ────────────────────────────────────────────────────

/// Recoverable failure while fetching or extracting one item.
///
/// These never abort the batch; the orchestrator turns them into an
/// [`IngestionOutcome`] and moves on.
#[derive(Debug, Error)]
pub enum ItemError {
    /// Transport failure or non-2xx response fetching a source document.
    #[error("fetch failed: {detail}")]
    Fetch {
        /// Response status, when the server answered at all.
        status: Option<u16>,
        detail: String,
    },

    /// The page was fetched but lacks the expected content-region marker.
    ///
    /// Expected for some pages; recorded as a skip, never retried.
    #[error("content region not found in page")]
    ContentRegionMissing,
}

impl ItemError {
    /// Build a fetch error from a transport-level `reqwest` failure,
    /// capturing the error at the point it occurred.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        Self::Fetch {
            status: err.status().map(|s| s.as_u16()),
            detail: err.to_string(),
        }
    }

    /// Build a fetch error for a non-2xx response.
    pub(crate) fn from_status(status: reqwest::StatusCode) -> Self {
        Self::Fetch {
            status: Some(status.as_u16()),
            detail: format!("unexpected status {status}"),
        }
    }

    /// HTTP status associated with this error, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => *status,
            Self::ContentRegionMissing => None,
        }
    }
}

// ── Fatal errors ───────────────────────────────────────────────────────

/// Failures that abort the whole run before or during setup.
#[derive(Debug, Error)]
pub enum SyncError {
    /// A source list could not be read. Fatal by design: the run must not
    /// start issuing network requests with a partial view of its inputs.
    #[error("failed to read source list {path}: {source}")]
    SourceLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configuration value could not be parsed.
    #[error("invalid configuration value for {key}: {message}")]
    Config { key: String, message: String },

    /// The content-region marker is not a valid CSS selector.
    #[error("invalid content selector '{selector}'")]
    Selector { selector: String },

    /// The shared HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

// ── Tests ──────────────────────────────────────────────────────────────
