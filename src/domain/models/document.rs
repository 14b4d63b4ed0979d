//! Source document model
//!
//! A `Document` is the text extracted from one page of one source file.
//! Documents only live long enough to be split into chunks.

use serde::{Deserialize, Serialize};

/// Raw text extracted from a source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Source identifier (file name of the PDF)
    pub source: String,

    /// 1-based page number, when the source is paginated
    pub page: Option<u32>,

    /// Extracted text
    pub text: String,
}

impl Document {
    pub fn new(source: impl Into<String>, page: Option<u32>, text: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            page,
            text: text.into(),
        }
    }

    /// Returns true if the document carries no usable text
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
