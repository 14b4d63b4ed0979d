//! Offline ingestion pipeline
//!
//! PDF directory → page documents → overlapping chunks → embeddings →
//! persisted vector index.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::adapters::embeddings::provider_from_config;
use crate::domain::errors::DomainError;
use crate::domain::models::{Chunk, ChunkingConfig, Config, Document};
use crate::domain::ports::{EmbeddingInput, EmbeddingProvider};
use crate::infrastructure::pdf;
use crate::infrastructure::vector::{Chunker, EmbeddedChunk, IndexMeta, VectorStore, VectorStoreError};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Data directory not found: {0}")]
    DataDirMissing(PathBuf),

    #[error("No readable PDF documents found in {0}")]
    NoDocuments(PathBuf),

    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Invalid chunking configuration: {0}")]
    InvalidChunking(String),

    #[error("Failed to read data directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Embedding failed: {0}")]
    Embedding(#[from] DomainError),

    #[error("Vector index error: {0}")]
    Store(#[from] VectorStoreError),

    #[error("Embedding provider returned {actual} vectors for {expected} chunks")]
    EmbeddingCountMismatch { expected: usize, actual: usize },

    #[error("PDF extraction task failed: {0}")]
    Task(String),
}

/// Summary of one ingestion run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Pages with text that were loaded
    pub documents: usize,
    /// Chunks produced by the splitter
    pub chunks: usize,
    /// Records written to the index
    pub records: usize,
    /// Source files that contributed at least one page
    pub sources: Vec<String>,
}

/// Where to read from and write to
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub data_dir: PathBuf,
    pub index_dir: PathBuf,
    /// Drop the existing index before writing
    pub reset: bool,
}

impl IngestOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            data_dir: PathBuf::from(&config.rag.data_dir),
            index_dir: PathBuf::from(&config.rag.index_path),
            reset: false,
        }
    }
}

pub struct IngestionService {
    embedder: Arc<dyn EmbeddingProvider>,
    chunker: Chunker,
    batch_size: usize,
}

impl IngestionService {
    pub fn new(embedder: Arc<dyn EmbeddingProvider>, chunker: Chunker, batch_size: usize) -> Self {
        Self {
            embedder,
            chunker,
            batch_size: batch_size.max(1),
        }
    }

    /// Build the pipeline from configuration
    ///
    /// A missing embedding credential is rejected here, before any API call.
    pub fn from_config(config: &Config) -> Result<Self, IngestError> {
        if config.embedding.provider.requires_credential() && config.openai.credential().is_none() {
            return Err(IngestError::MissingCredential(
                "OPENAI_API_KEY is required to compute embeddings".to_string(),
            ));
        }

        let chunker = Chunker::with_config(ChunkingConfig::new(
            config.rag.chunk_size,
            config.rag.chunk_overlap,
        ))
        .map_err(|e| IngestError::InvalidChunking(e.to_string()))?;

        Ok(Self::new(
            provider_from_config(config)?,
            chunker,
            config.embedding.batch_size,
        ))
    }

    /// Run the whole pipeline once
    #[instrument(skip(self, options), fields(data_dir = %options.data_dir.display(), index = %options.index_dir.display()))]
    pub async fn ingest(&self, options: &IngestOptions) -> Result<IngestReport, IngestError> {
        let meta = IndexMeta {
            model: self.embedder.model().to_string(),
            dimension: self.embedder.dimension(),
        };
        if !options.reset {
            check_existing_index(&options.index_dir, &meta).await?;
        }

        let documents = load_documents(&options.data_dir).await?;
        let mut sources: Vec<String> = documents.iter().map(|d| d.source.clone()).collect();
        sources.dedup();

        let chunks: Vec<Chunk> = documents
            .iter()
            .flat_map(|document| self.chunker.chunk_document(document))
            .collect();
        info!(
            documents = documents.len(),
            chunks = chunks.len(),
            provider = self.embedder.name(),
            "Split documents into chunks"
        );

        if chunks.is_empty() {
            return Err(IngestError::NoDocuments(options.data_dir.clone()));
        }

        let records = self.embed_chunks(chunks).await?;

        if options.reset {
            VectorStore::reset(&options.index_dir)?;
        }

        let store = VectorStore::create(&options.index_dir, &meta).await?;
        let written = store.insert_chunks(&records).await?;
        store.close().await;

        let report = IngestReport {
            documents: documents.len(),
            chunks: records.len(),
            records: written,
            sources,
        };
        info!(records = report.records, sources = report.sources.len(), "Ingestion complete");

        Ok(report)
    }

    async fn embed_chunks(&self, chunks: Vec<Chunk>) -> Result<Vec<EmbeddedChunk>, IngestError> {
        let mut records = Vec::with_capacity(chunks.len());
        let total = chunks.len();
        let batch_size = self.batch_size.min(self.embedder.max_batch_size()).max(1);

        for batch in chunks.chunks(batch_size) {
            let inputs: Vec<EmbeddingInput> = batch
                .iter()
                .map(|chunk| EmbeddingInput {
                    id: chunk.id.clone(),
                    text: chunk.content.clone(),
                })
                .collect();

            let outputs = self.embedder.embed_batch(&inputs).await?;
            if outputs.len() != batch.len() {
                return Err(IngestError::EmbeddingCountMismatch {
                    expected: batch.len(),
                    actual: outputs.len(),
                });
            }

            for (chunk, output) in batch.iter().zip(outputs) {
                records.push(EmbeddedChunk {
                    chunk: chunk.clone(),
                    embedding: output.vector,
                });
            }
            debug!(done = records.len(), total, "Embedded batch");
        }

        Ok(records)
    }
}

/// Refuse an existing index built with another model before paying for embeddings
async fn check_existing_index(index_dir: &Path, meta: &IndexMeta) -> Result<(), IngestError> {
    if !VectorStore::exists(index_dir) {
        return Ok(());
    }

    let store = VectorStore::open_read_only(index_dir).await?;
    let existing = store.meta().await;
    store.close().await;

    match existing? {
        Some(existing) => Ok(existing.ensure_compatible(meta)?),
        None => Ok(()),
    }
}

/// PDF files directly inside `dir`, sorted by name
pub fn discover_pdfs(dir: &Path) -> Result<Vec<PathBuf>, IngestError> {
    if !dir.is_dir() {
        return Err(IngestError::DataDirMissing(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if path.is_file() && is_pdf {
            files.push(path);
        }
    }
    files.sort();

    Ok(files)
}

/// Load every page with text; unreadable files are skipped
async fn load_documents(dir: &Path) -> Result<Vec<Document>, IngestError> {
    let files = discover_pdfs(dir)?;
    let mut documents = Vec::new();

    for file in files {
        let path = file.clone();
        let pages = tokio::task::spawn_blocking(move || pdf::extract_pages(&path))
            .await
            .map_err(|e| IngestError::Task(e.to_string()))?;

        match pages {
            Ok(pages) if pages.is_empty() => {
                warn!(file = %file.display(), "PDF has no extractable text, skipping");
            }
            Ok(pages) => {
                debug!(file = %file.display(), pages = pages.len(), "Loaded PDF");
                documents.extend(pages);
            }
            Err(e) => warn!(file = %file.display(), error = %e, "Skipping unreadable PDF"),
        }
    }

    if documents.is_empty() {
        return Err(IngestError::NoDocuments(dir.to_path_buf()));
    }

    Ok(documents)
}
