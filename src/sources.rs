//! Loading of the page and PDF source lists.
//!
//! Both lists are flat newline-delimited files of absolute URLs. Blank lines
//! are skipped and surrounding whitespace is trimmed; input order is
//! preserved. No URL validation happens here — malformed entries surface as
//! fetch failures downstream.

use std::path::Path;

use tokio::fs;

use crate::types::{SourceItem, SourceKind, SyncError};

/// The two source lists a batch run operates on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLists {
    pub pdfs: Vec<SourceItem>,
    pub pages: Vec<SourceItem>,
}

impl SourceLists {
    /// Reads both lists from disk.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::SourceLoad`] naming the unreadable file. This is
    /// the only fatal error in the pipeline.
    pub async fn load(pages_path: &Path, pdfs_path: &Path) -> Result<Self, SyncError> {
        let pages = read_list(pages_path, SourceKind::Page).await?;
        let pdfs = read_list(pdfs_path, SourceKind::PdfFile).await?;
        Ok(Self { pdfs, pages })
    }

    /// Total number of items across both lists.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pdfs.len() + self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pdfs.is_empty() && self.pages.is_empty()
    }

    /// Iterates items in processing order: PDFs first, then pages.
    pub fn iter(&self) -> impl Iterator<Item = &SourceItem> {
        self.pdfs.iter().chain(self.pages.iter())
    }
}

async fn read_list(path: &Path, kind: SourceKind) -> Result<Vec<SourceItem>, SyncError> {
    let contents = fs::read_to_string(path)
        .await
        .map_err(|source| SyncError::SourceLoad {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(parse_list(&contents, kind))
}

fn parse_list(contents: &str, kind: SourceKind) -> Vec<SourceItem> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| SourceItem::new(line, kind))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn parse_skips_blanks_and_trims() {
        let items = parse_list(
            "https://a.example/one\n\n  https://a.example/two  \n\t\nhttps://a.example/three",
            SourceKind::Page,
        );
        let urls: Vec<&str> = items.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://a.example/one",
                "https://a.example/two",
                "https://a.example/three",
            ]
        );
        assert!(items.iter().all(|i| i.kind == SourceKind::Page));
    }

    #[test]
    fn parse_keeps_malformed_urls() {
        // Well-formedness is deliberately not checked at load time.
        let items = parse_list("not a url", SourceKind::PdfFile);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].url, "not a url");
    }

    #[tokio::test]
    async fn load_reads_both_lists_in_order() {
        let dir = tempdir().unwrap();
        let pages = dir.path().join("urls.txt");
        let pdfs = dir.path().join("pdfs.txt");
        tokio::fs::write(&pages, "https://a.example/p1\nhttps://a.example/p2\n")
            .await
            .unwrap();
        tokio::fs::write(&pdfs, "https://a.example/d1.pdf\n")
            .await
            .unwrap();

        let lists = SourceLists::load(&pages, &pdfs).await.unwrap();
        assert_eq!(lists.len(), 3);
        let order: Vec<&str> = lists.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(
            order,
            vec![
                "https://a.example/d1.pdf",
                "https://a.example/p1",
                "https://a.example/p2",
            ]
        );
    }

    #[tokio::test]
    async fn load_fails_naming_the_unreadable_file() {
        let dir = tempdir().unwrap();
        let pages = dir.path().join("missing.txt");
        let pdfs = dir.path().join("also-missing.txt");

        let err = SourceLists::load(&pages, &pdfs).await.unwrap_err();
        match err {
            SyncError::SourceLoad { path, .. } => assert_eq!(path, pages),
            other => panic!("expected SourceLoad, got {other:?}"),
        }
    }
}
