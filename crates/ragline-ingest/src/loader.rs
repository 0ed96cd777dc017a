//! PDF document loading.
//!
//! Scans a directory recursively for `*.pdf` files. Individual files that
//! fail extraction are skipped with a warning; a missing or unreadable
//! directory is an error, and callers that want the degraded-but-running
//! behavior opt into it through [`load_documents_or_empty`].

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use ragline_core::{Error, Result};

/// A loaded source document: raw text plus file provenance.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub text: String,
    pub source: PathBuf,
}

/// Load all PDF documents under `dir`, recursively.
///
/// Files are visited in sorted path order so ingestion is deterministic.
pub fn load_documents(dir: &Path) -> Result<Vec<Document>> {
    if !dir.is_dir() {
        return Err(Error::Ingest(format!(
            "document directory not found: {}",
            dir.display()
        )));
    }

    let mut paths = Vec::new();
    collect_pdfs(dir, &mut paths)
        .map_err(|e| Error::Ingest(format!("failed to scan {}: {e}", dir.display())))?;
    paths.sort();

    let mut documents = Vec::new();
    for path in paths {
        match pdf_extract::extract_text(&path) {
            Ok(text) if !text.trim().is_empty() => {
                debug!("Loaded {} ({} chars)", path.display(), text.len());
                documents.push(Document { text, source: path });
            }
            Ok(_) => {
                debug!("No text in {}", path.display());
            }
            Err(e) => {
                warn!("Skipping unreadable PDF {}: {e}", path.display());
            }
        }
    }

    Ok(documents)
}

/// Best-effort variant: substitutes an empty document set on ingest failure
/// so the pipeline can still start with a degraded, empty index.
pub fn load_documents_or_empty(dir: &Path) -> Vec<Document> {
    match load_documents(dir) {
        Ok(docs) => docs,
        Err(e) => {
            warn!("Ingestion failed, continuing with empty document set: {e}");
            Vec::new()
        }
    }
}

fn collect_pdfs(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_pdfs(&path, out)?;
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
        {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_directory_is_an_ingest_error() {
        let err = load_documents(Path::new("/nonexistent/rag-data")).unwrap_err();
        assert!(matches!(err, Error::Ingest(_)));
    }

    #[test]
    fn or_empty_policy_swallows_missing_directory() {
        let docs = load_documents_or_empty(Path::new("/nonexistent/rag-data"));
        assert!(docs.is_empty());
    }

    #[test]
    fn empty_directory_loads_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let docs = load_documents(dir.path()).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn corrupt_pdf_is_skipped_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("broken.pdf"), b"this is not a pdf").unwrap();
        let docs = load_documents(dir.path()).unwrap();
        assert!(docs.is_empty());
    }

    #[test]
    fn non_pdf_files_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"plain text file").unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("nested/more.md"), b"# markdown").unwrap();
        let docs = load_documents(dir.path()).unwrap();
        assert!(docs.is_empty());
    }
}
