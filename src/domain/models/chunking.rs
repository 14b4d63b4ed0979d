//! Text chunking domain models
//!
//! Models for splitting documents into overlapping fixed-size character
//! windows before embedding.

use serde::{Deserialize, Serialize};

/// Configuration for document chunking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum size of each chunk in characters
    pub chunk_size: usize,

    /// Overlap between neighbouring chunks in characters
    pub chunk_overlap: usize,

    /// Snap window ends back to a paragraph break, newline or space
    pub respect_boundaries: bool,
}

impl Default for ChunkingConfig {
    /// 1000 characters per chunk with 200 characters of overlap
    fn default() -> Self {
        Self {
            chunk_size: 1000,
            chunk_overlap: 200,
            respect_boundaries: true,
        }
    }
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
            ..Self::default()
        }
    }

    /// Validate the chunking configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than 0".to_string());
        }

        if self.chunk_overlap >= self.chunk_size {
            return Err("chunk_overlap must be less than chunk_size".to_string());
        }

        Ok(())
    }
}

/// A contiguous piece of a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Unique identifier for this chunk
    pub id: String,

    /// Source identifier of the parent document
    pub source: String,

    /// Page of the parent document
    pub page: Option<u32>,

    /// Index of this chunk within the parent document (0-based)
    pub chunk_index: usize,

    /// Character offset of the chunk start within the parent text
    pub offset: usize,

    /// The text content of this chunk
    pub content: String,
}

impl Chunk {
    pub fn new(
        source: impl Into<String>,
        page: Option<u32>,
        chunk_index: usize,
        offset: usize,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            source: source.into(),
            page,
            chunk_index,
            offset,
            content: content.into(),
        }
    }
}
