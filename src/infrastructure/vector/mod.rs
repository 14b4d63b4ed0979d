//! Chunking and the persisted vector index

pub mod chunker;
pub mod vector_store;

pub use chunker::Chunker;
pub use vector_store::{EmbeddedChunk, IndexMeta, VectorStore, VectorStoreError, INDEX_FILE};
