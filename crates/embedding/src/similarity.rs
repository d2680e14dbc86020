//! Similarity ranking of link titles against a query.
//!
//! Ties are broken by original candidate order: scores are sorted with a
//! stable sort, so two equally similar titles keep the order the link source
//! produced them in.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::{EmbeddingError, EmbeddingProvider};

/// Ranks candidate texts by closeness to a query.
#[async_trait]
pub trait SimilarityOracle: Send + Sync {
  /// Up to `k` candidates ordered by descending similarity to `query`.
  ///
  /// The result length is `min(k, candidates.len())`.
  async fn top_k(&self, candidates: &[&str], query: &str, k: usize) -> Result<Vec<String>, EmbeddingError>;
}

/// Oracle backed by an embedding model and cosine similarity.
///
/// The provider is built once at startup and shared read-only.
#[derive(Clone)]
pub struct EmbeddingOracle {
  provider: Arc<dyn EmbeddingProvider>,
}

impl EmbeddingOracle {
  pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
    Self { provider }
  }

  pub fn provider(&self) -> &dyn EmbeddingProvider {
    self.provider.as_ref()
  }
}

#[async_trait]
impl SimilarityOracle for EmbeddingOracle {
  async fn top_k(&self, candidates: &[&str], query: &str, k: usize) -> Result<Vec<String>, EmbeddingError> {
    if candidates.is_empty() || k == 0 {
      return Ok(Vec::new());
    }

    let query_embedding = self.provider.embed(query).await?;
    let candidate_embeddings = self.provider.embed_batch(candidates).await?;

    if candidate_embeddings.len() != candidates.len() {
      return Err(EmbeddingError::CountMismatch {
        got: candidate_embeddings.len(),
        expected: candidates.len(),
      });
    }

    let ranked = rank_by_similarity(&query_embedding, &candidate_embeddings, k);
    debug!(
      query = %query,
      candidates = candidates.len(),
      returned = ranked.len(),
      "Ranked candidates by similarity"
    );

    Ok(ranked.into_iter().map(|idx| candidates[idx].to_string()).collect())
  }
}

/// Cosine similarity; 0.0 when either vector has zero magnitude or lengths differ.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
  if a.len() != b.len() || a.is_empty() {
    return 0.0;
  }

  let mut dot = 0.0f32;
  let mut norm_a = 0.0f32;
  let mut norm_b = 0.0f32;
  for (x, y) in a.iter().zip(b) {
    dot += x * y;
    norm_a += x * x;
    norm_b += y * y;
  }

  if norm_a == 0.0 || norm_b == 0.0 {
    return 0.0;
  }
  dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Indices of the `k` candidates most similar to `query`, best first.
pub fn rank_by_similarity(query: &[f32], candidates: &[Vec<f32>], k: usize) -> Vec<usize> {
  let mut scored: Vec<(usize, f32)> = candidates
    .iter()
    .enumerate()
    .map(|(idx, embedding)| {
      let score = cosine_similarity(query, embedding);
      (idx, if score.is_nan() { f32::NEG_INFINITY } else { score })
    })
    .collect();

  // sort_by is stable: equal scores keep candidate order
  scored.sort_by(|a, b| b.1.total_cmp(&a.1));
  scored.truncate(k);
  scored.into_iter().map(|(idx, _)| idx).collect()
}
