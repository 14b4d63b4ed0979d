//! Vector search result model

use serde::{Deserialize, Serialize};

/// A chunk returned by a similarity search, ranked by distance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub source: String,
    pub page: Option<u32>,
    pub content: String,

    /// Cosine distance to the query vector (lower is closer)
    pub distance: f32,
}

impl SearchResult {
    pub fn new(
        id: String,
        source: String,
        page: Option<u32>,
        content: String,
        distance: f32,
    ) -> Self {
        Self {
            id,
            source,
            page,
            content,
            distance,
        }
    }

    /// Citation label, `manual.pdf#p2` or the bare source when unpaginated
    pub fn label(&self) -> String {
        match self.page {
            Some(page) => format!("{}#p{}", self.source, page),
            None => self.source.clone(),
        }
    }
}
