use reqwest::Client;
use tracing_subscriber::EnvFilter;

use ragsync::pipeline::shutdown_pair;
use ragsync::{
    BatchRunner, IngestClient, PageExtractor, SourceKind, SourceLists, SyncConfig, SyncError,
};

#[tokio::main]
async fn main() -> Result<(), SyncError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = SyncConfig::from_env()?;
    let lists = SourceLists::load(&config.pages_file, &config.pdfs_file).await?;
    if lists.is_empty() {
        tracing::warn!("both source lists are empty; nothing to do");
        return Ok(());
    }
    tracing::info!(
        pdfs = lists.pdfs.len(),
        pages = lists.pages.len(),
        backend = %config.backend_url,
        "starting sync run"
    );

    let http = Client::builder()
        .user_agent(&config.user_agent)
        .timeout(config.request_timeout)
        .use_rustls_tls()
        .build()?;

    let extractor = PageExtractor::new(http.clone(), &config.content_selector)?;
    let mut ingest = IngestClient::new(http.clone(), config.backend_url.clone())
        .with_retry(config.max_submit_retries, config.retry_backoff);
    if let Some(token) = &config.api_token {
        ingest = ingest.with_token(token.clone());
    }
    let runner = BatchRunner::new(http, extractor, ingest).with_item_delay(config.item_delay);

    let (handle, signal) = shutdown_pair();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("ctrl-c received; finishing the current item");
            handle.trigger();
        }
    });

    let summary = runner.run(&lists, signal).await;

    let pdfs = summary.counts(SourceKind::PdfFile);
    let pages = summary.counts(SourceKind::Page);
    println!();
    if summary.cancelled {
        println!("Run cancelled after {} item(s).", summary.outcomes.len());
    } else {
        println!("Run complete.");
    }
    println!(
        "  pdfs : {} ok, {} failed",
        pdfs.succeeded, pdfs.failed
    );
    println!(
        "  pages: {} ok, {} skipped, {} failed",
        pages.succeeded, pages.skipped, pages.failed
    );
    println!("  took : {:.1}s", summary.elapsed.as_secs_f64());

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
