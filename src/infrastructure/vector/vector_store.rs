//! Persisted vector index on SQLite
//!
//! Embeddings are stored as little-endian f32 BLOBs next to the chunk text.
//! Similarity search is a full scan with cosine distance computed in Rust,
//! which is plenty for the few thousand chunks a document set produces.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::models::{Chunk, SearchResult};

/// File holding the index inside the index directory
pub const INDEX_FILE: &str = "index.sqlite3";

#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("Vector index not found at {0}")]
    Missing(PathBuf),

    #[error("Failed to create index directory: {0}")]
    DirectoryCreationFailed(#[source] std::io::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt embedding for record {id}: {len} bytes")]
    CorruptEmbedding { id: String, len: usize },

    #[error("Embedding dimension mismatch: index holds {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Index was built with model '{existing}', refusing to mix in '{requested}'")]
    ModelMismatch { existing: String, requested: String },
}

/// Model and dimension an index was built with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMeta {
    pub model: String,
    pub dimension: usize,
}

impl IndexMeta {
    /// Fails when vectors described by `requested` cannot share an index built with `self`
    pub fn ensure_compatible(&self, requested: &Self) -> Result<(), VectorStoreError> {
        if self.model != requested.model {
            return Err(VectorStoreError::ModelMismatch {
                existing: self.model.clone(),
                requested: requested.model.clone(),
            });
        }
        if self.dimension != requested.dimension {
            return Err(VectorStoreError::DimensionMismatch {
                expected: self.dimension,
                actual: requested.dimension,
            });
        }
        Ok(())
    }
}

/// A chunk together with its embedding, ready to persist
#[derive(Debug, Clone)]
pub struct EmbeddedChunk {
    pub chunk: Chunk,
    pub embedding: Vec<f32>,
}

/// SQLite-backed vector index
pub struct VectorStore {
    pool: SqlitePool,
    path: PathBuf,
}

impl VectorStore {
    /// Path of the index file inside `dir`
    pub fn index_file(dir: &Path) -> PathBuf {
        dir.join(INDEX_FILE)
    }

    /// Whether an index has been written to `dir`
    pub fn exists(dir: &Path) -> bool {
        Self::index_file(dir).is_file()
    }

    /// Open the index for writing, creating it when missing
    ///
    /// An existing index must have been built with the same model and dimension.
    pub async fn create(dir: &Path, meta: &IndexMeta) -> Result<Self, VectorStoreError> {
        std::fs::create_dir_all(dir).map_err(VectorStoreError::DirectoryCreationFailed)?;
        let path = Self::index_file(dir);

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Delete)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let store = Self { pool, path };
        store.create_schema().await?;

        match store.meta().await? {
            Some(existing) => {
                existing.ensure_compatible(meta)?;
                debug!(path = %store.path.display(), "Appending to existing index");
            }
            None => {
                store.write_meta(meta).await?;
                info!(path = %store.path.display(), model = %meta.model, "Created vector index");
            }
        }

        Ok(store)
    }

    /// Open an existing index without write access
    pub async fn open_read_only(dir: &Path) -> Result<Self, VectorStoreError> {
        let path = Self::index_file(dir);
        if !path.is_file() {
            return Err(VectorStoreError::Missing(path));
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .read_only(true)
            .create_if_missing(false);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        Ok(Self { pool, path })
    }

    /// Delete the index file in `dir`, if any
    pub fn reset(dir: &Path) -> std::io::Result<bool> {
        let path = Self::index_file(dir);
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)?;
        info!(path = %path.display(), "Removed existing vector index");
        Ok(true)
    }

    async fn create_schema(&self) -> Result<(), VectorStoreError> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS embeddings (
                id TEXT PRIMARY KEY,
                source TEXT NOT NULL,
                page INTEGER,
                chunk_index INTEGER NOT NULL,
                start_offset INTEGER NOT NULL,
                content TEXT NOT NULL,
                embedding BLOB NOT NULL,
                model TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_embeddings_source ON embeddings(source)")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS index_meta (key TEXT PRIMARY KEY, value TEXT NOT NULL)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn write_meta(&self, meta: &IndexMeta) -> Result<(), VectorStoreError> {
        let mut tx = self.pool.begin().await?;
        for (key, value) in [
            ("model", meta.model.clone()),
            ("dimension", meta.dimension.to_string()),
        ] {
            sqlx::query("INSERT OR REPLACE INTO index_meta (key, value) VALUES (?, ?)")
                .bind(key)
                .bind(value)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Model and dimension recorded when the index was created
    pub async fn meta(&self) -> Result<Option<IndexMeta>, VectorStoreError> {
        let rows = sqlx::query("SELECT key, value FROM index_meta")
            .fetch_all(&self.pool)
            .await?;

        let mut model = None;
        let mut dimension = None;
        for row in rows {
            let key: String = row.get("key");
            let value: String = row.get("value");
            match key.as_str() {
                "model" => model = Some(value),
                "dimension" => dimension = value.parse::<usize>().ok(),
                _ => {}
            }
        }

        Ok(model
            .zip(dimension)
            .map(|(model, dimension)| IndexMeta { model, dimension }))
    }

    /// Persist chunks with their embeddings in a single transaction
    pub async fn insert_chunks(
        &self,
        records: &[EmbeddedChunk],
    ) -> Result<usize, VectorStoreError> {
        let meta = self.meta().await?;
        let (model, dimension) = meta
            .map(|m| (m.model, m.dimension))
            .unwrap_or_default();

        let created_at = Utc::now().to_rfc3339();
        let mut tx = self.pool.begin().await?;

        for record in records {
            if dimension != 0 && record.embedding.len() != dimension {
                return Err(VectorStoreError::DimensionMismatch {
                    expected: dimension,
                    actual: record.embedding.len(),
                });
            }

            let chunk = &record.chunk;
            sqlx::query(
                r"
                INSERT INTO embeddings
                    (id, source, page, chunk_index, start_offset, content, embedding, model, created_at)
                VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                ",
            )
            .bind(&chunk.id)
            .bind(&chunk.source)
            .bind(chunk.page.map(i64::from))
            .bind(to_i64(chunk.chunk_index))
            .bind(to_i64(chunk.offset))
            .bind(&chunk.content)
            .bind(embedding_to_bytes(&record.embedding))
            .bind(&model)
            .bind(&created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        debug!(records = records.len(), "Persisted embeddings");
        Ok(records.len())
    }

    /// The `limit` records closest to `query` by cosine distance
    pub async fn search_similar(
        &self,
        query: &[f32],
        limit: usize,
    ) -> Result<Vec<SearchResult>, VectorStoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let rows = sqlx::query("SELECT id, source, page, content, embedding FROM embeddings")
            .fetch_all(&self.pool)
            .await?;

        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.get("id");
            let bytes: Vec<u8> = row.get("embedding");
            let embedding = bytes_to_embedding(&bytes).ok_or_else(|| {
                VectorStoreError::CorruptEmbedding {
                    id: id.clone(),
                    len: bytes.len(),
                }
            })?;
            let page: Option<i64> = row.get("page");

            results.push(SearchResult::new(
                id,
                row.get("source"),
                page.and_then(|p| u32::try_from(p).ok()),
                row.get("content"),
                cosine_distance(query, &embedding),
            ));
        }

        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results.truncate(limit);

        Ok(results)
    }

    /// Number of stored records
    pub async fn count(&self) -> Result<usize, VectorStoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM embeddings")
            .fetch_one(&self.pool)
            .await?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Distinct sources in the index, sorted
    pub async fn sources(&self) -> Result<Vec<String>, VectorStoreError> {
        let sources = sqlx::query_scalar("SELECT DISTINCT source FROM embeddings ORDER BY source")
            .fetch_all(&self.pool)
            .await?;
        Ok(sources)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}

fn to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Serialize embedding vector to bytes for storage
pub fn embedding_to_bytes(embedding: &[f32]) -> Vec<u8> {
    embedding.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Deserialize embedding vector from bytes
pub fn bytes_to_embedding(bytes: &[u8]) -> Option<Vec<f32>> {
    if bytes.len() % 4 != 0 {
        return None;
    }

    Some(
        bytes
            .chunks_exact(4)
            .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect(),
    )
}

/// Cosine distance between two vectors; `f32::MAX` when undefined
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return f32::MAX;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if mag_a == 0.0 || mag_b == 0.0 {
        return f32::MAX;
    }

    1.0 - (dot / (mag_a * mag_b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(dimension: usize) -> IndexMeta {
        IndexMeta {
            model: "test-model".to_string(),
            dimension,
        }
    }

    fn record(source: &str, content: &str, embedding: Vec<f32>) -> EmbeddedChunk {
        EmbeddedChunk {
            chunk: Chunk::new(source, Some(1), 0, 0, content),
            embedding,
        }
    }

    #[test]
    fn test_cosine_distance() {
        assert!(cosine_distance(&[1.0, 0.0], &[1.0, 0.0]).abs() < 1e-6);
        assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
        assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < 1e-6);
        assert_eq!(cosine_distance(&[1.0], &[1.0, 0.0]), f32::MAX);
        assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]), f32::MAX);
    }

    #[test]
    fn test_embedding_bytes() {
        let embedding = vec![0.25, -1.5, 3.0];
        let bytes = embedding_to_bytes(&embedding);
        assert_eq!(bytes.len(), 12);
        assert_eq!(bytes_to_embedding(&bytes), Some(embedding));
        assert_eq!(bytes_to_embedding(&[0, 1, 2]), None);
    }

    #[tokio::test]
    async fn test_open_missing_index() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!VectorStore::exists(dir.path()));

        let err = VectorStore::open_read_only(dir.path()).await.err().unwrap();
        assert!(matches!(err, VectorStoreError::Missing(_)));
    }

    #[tokio::test]
    async fn test_insert_and_search() {
        let dir = tempfile::tempdir().unwrap();
        let store = VectorStore::create(dir.path(), &meta(2)).await.unwrap();

        store
            .insert_chunks(&[
                record("a.pdf", "east", vec![1.0, 0.0]),
                record("b.pdf", "north", vec![0.0, 1.0]),
                record("a.pdf", "north-east", vec![0.7, 0.7]),
            ])
            .await
            .unwrap();
        store.close().await;

        let reader = VectorStore::open_read_only(dir.path()).await.unwrap();
        assert_eq!(reader.count().await.unwrap(), 3);
        assert_eq!(reader.sources().await.unwrap(), vec!["a.pdf", "b.pdf"]);
        assert_eq!(reader.meta().await.unwrap(), Some(meta(2)));

        let results = reader.search_similar(&[1.0, 0.1], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "east");
        assert_eq!(results[1].content, "north-east");
        assert!(results[0].distance <= results[1].distance);
        assert_eq!(results[0].page, Some(1));
    }

    #[tokio::test]
    async fn test_reopen_is_additive() {
        let dir = tempfile::tempdir().unwrap();

        for content in ["one", "two"] {
            let store = VectorStore::create(dir.path(), &meta(2)).await.unwrap();
            store
                .insert_chunks(&[record("a.pdf", content, vec![1.0, 0.0])])
                .await
                .unwrap();
            store.close().await;
        }

        let reader = VectorStore::open_read_only(dir.path()).await.unwrap();
        assert_eq!(reader.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_rejects_mismatched_model_and_dimension() {
        let dir = tempfile::tempdir().unwrap();
        VectorStore::create(dir.path(), &meta(2)).await.unwrap().close().await;

        let other_model = IndexMeta {
            model: "other".to_string(),
            dimension: 2,
        };
        assert!(matches!(
            VectorStore::create(dir.path(), &other_model).await.err().unwrap(),
            VectorStoreError::ModelMismatch { .. }
        ));
        assert!(matches!(
            VectorStore::create(dir.path(), &meta(3)).await.err().unwrap(),
            VectorStoreError::DimensionMismatch { .. }
        ));

        let store = VectorStore::create(dir.path(), &meta(2)).await.unwrap();
        let err = store
            .insert_chunks(&[record("a.pdf", "bad", vec![1.0, 0.0, 0.0])])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            VectorStoreError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
        assert_eq!(store.count().await.unwrap(), 0, "Failed batch is rolled back");
    }

    #[tokio::test]
    async fn test_reset() {
        let dir = tempfile::tempdir().unwrap();
        VectorStore::create(dir.path(), &meta(2)).await.unwrap().close().await;

        assert!(VectorStore::reset(dir.path()).unwrap());
        assert!(!VectorStore::exists(dir.path()));
        assert!(!VectorStore::reset(dir.path()).unwrap());
    }
}
