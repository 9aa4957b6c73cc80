//! ```text
//! sources::SourceLists ──┬─► fetch::fetch_pdf ──────────► client::submit_file ──┐
//!                        └─► extract::PageExtractor ──┐                         │
//!                                                     │                         │
//!                         markdown::render ◄──────────┘                         │
//!                                │                                              │
//!                                └─► client::submit_text ──────────────────────►┤
//!                                                                               │
//! pipeline::BatchRunner drives both paths sequentially ─► RunSummary ◄──────────┘
//! ```
//!
//! Keeps a LightRAG-style backend synchronized with curated lists of page
//! and PDF URLs: pages are scraped down to their content region and
//! normalized to markdown, PDFs are downloaded verbatim, and both are pushed
//! over HTTP. Per-item failures never abort a batch; every item ends as one
//! [`IngestionOutcome`](types::IngestionOutcome) in the run summary.

pub mod client;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod markdown;
pub mod pipeline;
pub mod sources;
pub mod types;

pub use client::IngestClient;
pub use config::SyncConfig;
pub use extract::PageExtractor;
pub use pipeline::{BatchRunner, RunSummary, ShutdownHandle, ShutdownSignal, shutdown_pair};
pub use sources::SourceLists;
pub use types::{
    BinaryPayload, Disposition, ExtractedDocument, IngestionOutcome, ItemError, SourceItem,
    SourceKind, SyncError,
};
