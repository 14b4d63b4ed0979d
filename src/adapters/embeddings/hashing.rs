//! Offline feature-hashing embedding provider.
//!
//! Maps lowercase word tokens into a fixed number of signed buckets and
//! L2-normalises the result. Texts sharing vocabulary end up close under
//! cosine distance, which is enough for local runs and deterministic tests
//! without network access or credentials.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::ports::embedding::{EmbeddingInput, EmbeddingOutput, EmbeddingProvider};

/// Model name recorded in indexes built by this provider.
pub const HASHING_MODEL: &str = "feature-hashing-v1";

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

/// Deterministic bag-of-words embedding provider.
#[derive(Debug, Clone)]
pub struct HashingEmbeddingProvider {
    dimension: usize,
}

impl HashingEmbeddingProvider {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    /// Embed synchronously; the same text always yields the same vector.
    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0_f32; self.dimension];

        for token in tokens(text) {
            let hash = fnv1a(token.as_bytes());
            let bucket = usize::try_from(hash % self.dimension as u64).unwrap_or_default();
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            embedding[bucket] += sign;
        }

        let magnitude = embedding
            .iter()
            .map(|x| f64::from(*x) * f64::from(*x))
            .sum::<f64>()
            .sqrt();

        if magnitude > 1e-10 {
            #[allow(clippy::cast_possible_truncation)]
            let magnitude = magnitude as f32;
            for val in &mut embedding {
                *val /= magnitude;
            }
        } else {
            // No tokens: fall back to a uniform unit vector
            #[allow(clippy::cast_precision_loss)]
            let uniform = 1.0 / (self.dimension as f32).sqrt();
            embedding.fill(uniform);
        }

        embedding
    }
}

fn tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
        .map(str::to_lowercase)
}

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes.iter().fold(FNV_OFFSET, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

#[async_trait]
impl EmbeddingProvider for HashingEmbeddingProvider {
    fn name(&self) -> &'static str {
        "hashing"
    }

    fn model(&self) -> &str {
        HASHING_MODEL
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    async fn embed(&self, text: &str) -> DomainResult<Vec<f32>> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, inputs: &[EmbeddingInput]) -> DomainResult<Vec<EmbeddingOutput>> {
        Ok(inputs
            .iter()
            .map(|input| EmbeddingOutput {
                id: input.id.clone(),
                vector: self.embed_text(&input.text),
            })
            .collect())
    }

    fn max_batch_size(&self) -> usize {
        usize::MAX
    }
}
