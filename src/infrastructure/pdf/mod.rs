//! PDF text extraction
//!
//! Page-granular loading on top of `lopdf`. Extraction is synchronous and
//! CPU-bound; async callers run it on the blocking pool.

pub mod loader;
#[cfg(test)]
pub(crate) mod testing;

pub use loader::{extract_pages, extract_text, PdfError};
