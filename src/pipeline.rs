//! The batch orchestrator.
//!
//! Processes the PDF list first, then the page list, strictly sequentially:
//! one network call in flight at a time, with a fixed delay between items to
//! bound the request rate against both the source hosts and the backend.
//!
//! Failure policy: nothing an individual item does can abort the run. Fetch
//! and extraction errors, backend rejections, and transport failures all
//! collapse into per-item [`IngestionOutcome`] records; the run always ends
//! with one outcome per processed item and a per-kind summary.

use std::time::{Duration, Instant};

use reqwest::Client;
use tokio::sync::watch;

use crate::client::IngestClient;
use crate::extract::PageExtractor;
use crate::fetch;
use crate::sources::SourceLists;
use crate::types::{Disposition, IngestionOutcome, ItemError, SourceItem, SourceKind};

// ── Shutdown signalling ────────────────────────────────────────────────

/// Creates a linked [`ShutdownHandle`] / [`ShutdownSignal`] pair.
#[must_use]
pub fn shutdown_pair() -> (ShutdownHandle, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownHandle { tx }, ShutdownSignal { rx })
}

/// Trigger side of the cancellation pair; typically wired to ctrl-c.
#[derive(Debug)]
pub struct ShutdownHandle {
    tx: watch::Sender<bool>,
}

impl ShutdownHandle {
    /// Requests shutdown. The runner stops issuing new requests; the item
    /// currently in flight finishes and is reported.
    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }
}

/// Observer side of the cancellation pair, checked between items.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    /// Returns `true` once shutdown has been requested.
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolves when shutdown is requested. If the handle is dropped without
    /// triggering, this never resolves.
    pub async fn triggered(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

// ── Run summary ────────────────────────────────────────────────────────

/// Per-kind outcome tally for a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindCounts {
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl KindCounts {
    #[must_use]
    pub fn total(&self) -> usize {
        self.succeeded + self.skipped + self.failed
    }
}

/// Everything a finished (or cancelled) batch run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// One outcome per processed item, in processing order.
    pub outcomes: Vec<IngestionOutcome>,
    /// Wall-clock duration of the run.
    pub elapsed: Duration,
    /// Whether the run was cut short by a shutdown request.
    pub cancelled: bool,
}

impl RunSummary {
    /// Tallies outcomes for one source kind.
    #[must_use]
    pub fn counts(&self, kind: SourceKind) -> KindCounts {
        let mut counts = KindCounts::default();
        for outcome in self.outcomes.iter().filter(|o| o.kind == kind) {
            match outcome.disposition {
                Disposition::Succeeded => counts.succeeded += 1,
                Disposition::Skipped => counts.skipped += 1,
                Disposition::Failed => counts.failed += 1,
            }
        }
        counts
    }

    /// Number of items that failed, across both kinds.
    #[must_use]
    pub fn total_failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_failed()).count()
    }
}

// ── BatchRunner ────────────────────────────────────────────────────────

/// Sequential orchestrator over both source lists.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    http: Client,
    extractor: PageExtractor,
    ingest: IngestClient,
    item_delay: Duration,
}

impl BatchRunner {
    /// Builds a runner around the shared HTTP client and the two
    /// collaborators it drives. Default inter-item delay is 500 ms.
    #[must_use]
    pub fn new(http: Client, extractor: PageExtractor, ingest: IngestClient) -> Self {
        Self {
            http,
            extractor,
            ingest,
            item_delay: Duration::from_millis(500),
        }
    }

    /// Overrides the fixed delay applied between consecutive items.
    #[must_use]
    pub fn with_item_delay(mut self, delay: Duration) -> Self {
        self.item_delay = delay;
        self
    }

    /// Runs the full batch: PDFs first, then pages.
    ///
    /// Never fails; every processed item is reported in the returned
    /// [`RunSummary`]. A shutdown request stops the run before the next
    /// item; outcomes gathered so far are returned with `cancelled` set.
    pub async fn run(&self, lists: &SourceLists, mut shutdown: ShutdownSignal) -> RunSummary {
        let started = Instant::now();
        let mut outcomes = Vec::with_capacity(lists.len());
        let mut cancelled = false;
        let mut first = true;

        for item in lists.iter() {
            if shutdown.is_triggered() {
                tracing::info!(url = %item.url, "shutdown requested; stopping before next item");
                cancelled = true;
                break;
            }
            if !first && !self.pause(&mut shutdown).await {
                tracing::info!(url = %item.url, "shutdown requested during delay; stopping");
                cancelled = true;
                break;
            }
            first = false;

            tracing::info!(url = %item.url, kind = %item.kind, "processing");
            let outcome = self.process(item).await;
            match outcome.disposition {
                Disposition::Succeeded => {
                    tracing::info!(url = %outcome.source_url, status = ?outcome.status_code, "ingested");
                }
                Disposition::Skipped => {
                    tracing::info!(url = %outcome.source_url, "skipped: nothing to index");
                }
                Disposition::Failed => {
                    tracing::warn!(
                        url = %outcome.source_url,
                        status = ?outcome.status_code,
                        detail = outcome.error_detail.as_deref().unwrap_or(""),
                        "failed"
                    );
                }
            }
            outcomes.push(outcome);
        }

        RunSummary {
            outcomes,
            elapsed: started.elapsed(),
            cancelled,
        }
    }

    /// Sleeps for the inter-item delay; returns `false` if shutdown was
    /// requested while waiting.
    async fn pause(&self, shutdown: &mut ShutdownSignal) -> bool {
        tokio::select! {
            () = tokio::time::sleep(self.item_delay) => true,
            () = shutdown.triggered() => false,
        }
    }

    async fn process(&self, item: &SourceItem) -> IngestionOutcome {
        match item.kind {
            SourceKind::PdfFile => match fetch::fetch_pdf(&self.http, &item.url).await {
                Ok(payload) => self.ingest.submit_file(&payload).await,
                Err(err) => {
                    IngestionOutcome::failure(&item.url, item.kind, err.status(), err.to_string())
                }
            },
            SourceKind::Page => match self.extractor.extract(&item.url).await {
                Ok(doc) => self.ingest.submit_text(&doc).await,
                Err(err @ ItemError::ContentRegionMissing) => {
                    IngestionOutcome::skipped(&item.url, item.kind, err.to_string())
                }
                Err(err) => {
                    IngestionOutcome::failure(&item.url, item.kind, err.status(), err.to_string())
                }
            },
        }
    }
}
