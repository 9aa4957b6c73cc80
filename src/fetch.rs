//! Downloading PDF sources as binary payloads.

use percent_encoding::percent_decode_str;
use reqwest::Client;
use url::Url;

use crate::types::{BinaryPayload, ItemError};

/// Declared content type for every downloaded PDF. The bytes themselves are
/// not validated against it; a non-PDF payload behind a `.pdf` URL is passed
/// through unchanged.
pub const PDF_MIME: &str = "application/pdf";

/// Fallback filename for URLs whose trailing path segment is empty.
pub const DEFAULT_PDF_NAME: &str = "file.pdf";

/// Downloads `url` and wraps the bytes for multipart upload.
///
/// # Errors
///
/// [`ItemError::Fetch`] for transport failures and non-2xx responses.
pub async fn fetch_pdf(http: &Client, url: &str) -> Result<BinaryPayload, ItemError> {
    let response = http
        .get(url)
        .send()
        .await
        .map_err(ItemError::from_transport)?;
    let status = response.status();
    if !status.is_success() {
        return Err(ItemError::from_status(status));
    }
    let bytes = response
        .bytes()
        .await
        .map_err(ItemError::from_transport)?
        .to_vec();

    Ok(BinaryPayload {
        source_url: url.to_string(),
        filename: filename_from_url(url),
        bytes,
        mime_type: PDF_MIME.to_string(),
    })
}

/// Derives an upload filename from the final path segment of the URL,
/// percent-decoded, falling back to [`DEFAULT_PDF_NAME`] when the segment is
/// empty (URL ending in `/`).
#[must_use]
pub fn filename_from_url(url: &str) -> String {
    let segment = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_owned)),
        // Unparsable input: mirror the naive split the backend would see.
        Err(_) => url.rsplit('/').next().map(str::to_owned),
    };

    let decoded = segment
        .map(|s| percent_decode_str(&s).decode_utf8_lossy().into_owned())
        .unwrap_or_default();

    if decoded.trim().is_empty() {
        DEFAULT_PDF_NAME.to_string()
    } else {
        decoded
    }
}
