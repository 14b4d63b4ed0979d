use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::models::Document;

/// Errors raised while reading a PDF
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse PDF {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("PDF is encrypted: {0}")]
    Encrypted(PathBuf),
}

/// Extract one `Document` per page that carries text
///
/// Pages whose text cannot be decoded are logged and skipped; blank pages are dropped.
pub fn extract_pages(path: &Path) -> Result<Vec<Document>, PdfError> {
    if !path.is_file() {
        return Err(PdfError::NotFound(path.to_path_buf()));
    }

    let pdf = lopdf::Document::load(path).map_err(|e| PdfError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if pdf.is_encrypted() {
        return Err(PdfError::Encrypted(path.to_path_buf()));
    }

    let source = path
        .file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned());
    let mut documents = Vec::new();

    for page_number in pdf.get_pages().keys().copied() {
        match pdf.extract_text(&[page_number]) {
            Ok(text) => {
                let document = Document::new(source.clone(), Some(page_number), text);
                if document.is_blank() {
                    debug!(source = %source, page = page_number, "Skipping blank page");
                } else {
                    documents.push(document);
                }
            }
            Err(e) => {
                warn!(source = %source, page = page_number, error = %e, "Failed to extract page text");
            }
        }
    }

    Ok(documents)
}

/// Extract the whole text of a PDF, pages joined by newlines
pub fn extract_text(path: &Path) -> Result<String, PdfError> {
    let pages = extract_pages(path)?;
    Ok(pages
        .into_iter()
        .map(|page| page.text)
        .collect::<Vec<_>>()
        .join("\n"))
}
