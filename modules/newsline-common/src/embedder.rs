//! The text embedding model is an externally-owned pure function
//! `embed(text) -> float[384]` (spec §1). `Embedder` is the seam at which
//! this codebase plugs into whatever model serves that function — shared
//! by the indexer (embedding article bodies) and the search service
//! (embedding query text for semantic search), mirroring the `EmbedAgent`
//! boundary used for embeddings elsewhere in this pipeline.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::EMBEDDING_DIM;

#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Deterministic placeholder embedder: hashes n-grams of the input into a
/// fixed-size, L2-normalized vector. Stands in for the real sentence
/// embedding model at this boundary so the pipeline is runnable without an
/// external model dependency.
pub struct HashingEmbedder;

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut vec = vec![0f32; EMBEDDING_DIM];
        for token in text.split_whitespace() {
            let digest = md5::compute(token.as_bytes());
            for (i, byte) in digest.0.iter().enumerate() {
                let idx = (i * 7 + *byte as usize) % EMBEDDING_DIM;
                vec[idx] += (*byte as f32 / 255.0) - 0.5;
            }
        }
        let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vec {
                *v /= norm;
            }
        }
        Ok(vec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn embeds_to_expected_dimension_and_is_normalized() {
        let embedder = HashingEmbedder;
        let vec = embedder.embed("hello world").await.unwrap();
        assert_eq!(vec.len(), EMBEDDING_DIM);
        let norm = vec.iter().map(|v| v * v).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-4 || norm == 0.0);
    }

    #[tokio::test]
    async fn same_text_embeds_identically() {
        let embedder = HashingEmbedder;
        let a = embedder.embed("same text").await.unwrap();
        let b = embedder.embed("same text").await.unwrap();
        assert_eq!(a, b);
    }
}
