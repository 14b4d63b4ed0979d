//! Text chunking implementation
//!
//! Splits page text into overlapping character windows. Window ends snap back
//! to a paragraph break, newline or space when one falls in the second half of
//! the window, so chunks rarely cut words in half.

use anyhow::{anyhow, Result};

use crate::domain::models::{Chunk, ChunkingConfig, Document};

/// Separators tried in order when snapping a window end
const SEPARATORS: [&str; 3] = ["\n\n", "\n", " "];

/// Character-window text chunker
#[derive(Debug, Clone)]
pub struct Chunker {
    config: ChunkingConfig,
}

impl Chunker {
    /// Create a chunker, rejecting an invalid configuration
    pub fn with_config(config: ChunkingConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| anyhow!("Invalid chunking config: {}", e))?;

        Ok(Self { config })
    }

    /// Split a document into chunks, skipping whitespace-only windows
    pub fn chunk_document(&self, document: &Document) -> Vec<Chunk> {
        self.split(&document.text)
            .into_iter()
            .enumerate()
            .map(|(index, (offset, content))| {
                Chunk::new(document.source.clone(), document.page, index, offset, content)
            })
            .collect()
    }

    /// Split text into `(char_offset, content)` windows
    pub fn split(&self, text: &str) -> Vec<(usize, String)> {
        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        let mut windows = Vec::new();
        let mut start = 0;

        while start < total {
            let mut end = (start + size).min(total);

            if self.config.respect_boundaries && end < total {
                if let Some(snapped) = snap_to_boundary(&chars[start..end], size / 2) {
                    end = start + snapped;
                }
            }

            let window = &chars[start..end];
            let leading = window.iter().take_while(|c| c.is_whitespace()).count();
            let trailing = window[leading..]
                .iter()
                .rev()
                .take_while(|c| c.is_whitespace())
                .count();
            let content: String = window[leading..window.len() - trailing].iter().collect();

            let mut floor = start;
            if !content.is_empty() {
                floor += leading;
                windows.push((floor, content));
            }

            if end >= total {
                break;
            }

            // Always advance past the previous chunk start
            start = end.saturating_sub(overlap).max(floor + 1);
        }

        windows
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            config: ChunkingConfig::default(),
        }
    }
}

/// Length of the window cut at the last separator beyond `min_len`
fn snap_to_boundary(window: &[char], min_len: usize) -> Option<usize> {
    for separator in SEPARATORS {
        let sep: Vec<char> = separator.chars().collect();
        if window.len() < sep.len() {
            continue;
        }

        let found = (0..=window.len() - sep.len())
            .rev()
            .find(|&i| window[i..i + sep.len()] == sep[..])
            .map(|i| i + sep.len());

        if let Some(cut) = found.filter(|&cut| cut > min_len) {
            return Some(cut);
        }
    }

    None
}
