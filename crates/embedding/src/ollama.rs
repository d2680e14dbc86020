//! Sentence embeddings from a local Ollama server.
//!
//! Link titles are short, but a busy article offers over a thousand of them,
//! so batches are split and sent with bounded concurrency. Vectors always come
//! back in input order.

use std::{future::Future, sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Semaphore;
use tracing::{debug, warn};
use wikirun_core::EmbeddingConfig;

use crate::{EmbeddingError, EmbeddingProvider};

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
/// MiniLM-L6-v2 sentence transformer as packaged by Ollama
const DEFAULT_MODEL: &str = "all-minilm";
const DEFAULT_DIMENSIONS: usize = 384;
const DEFAULT_MAX_BATCH_SIZE: usize = 256;
/// In-flight sub-batch requests; a local GPU gains nothing beyond this
const DEFAULT_MAX_CONCURRENT: usize = 4;
const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct OllamaProvider {
  client: reqwest::Client,
  base_url: String,
  model: String,
  dimensions: usize,
  max_batch_size: usize,
  max_concurrent: usize,
}

impl Default for OllamaProvider {
  fn default() -> Self {
    Self::new()
  }
}

impl OllamaProvider {
  pub fn new() -> Self {
    Self {
      client: reqwest::Client::new(),
      base_url: DEFAULT_OLLAMA_URL.to_string(),
      model: DEFAULT_MODEL.to_string(),
      dimensions: DEFAULT_DIMENSIONS,
      max_batch_size: DEFAULT_MAX_BATCH_SIZE,
      max_concurrent: DEFAULT_MAX_CONCURRENT,
    }
  }

  pub fn from_config(config: &EmbeddingConfig) -> Self {
    Self::new()
      .with_url(config.ollama_url.as_str())
      .with_model(&config.model, config.dimensions)
  }

  pub fn with_url(mut self, url: impl Into<String>) -> Self {
    let url: String = url.into();
    self.base_url = url.trim_end_matches('/').to_string();
    self
  }

  pub fn with_model(mut self, model: impl Into<String>, dimensions: usize) -> Self {
    self.model = model.into();
    self.dimensions = dimensions;
    self
  }

  /// Titles per request (at least 1)
  pub fn with_max_batch_size(mut self, max_batch_size: usize) -> Self {
    self.max_batch_size = max_batch_size.max(1);
    self
  }

  /// Requests in flight at once (at least 1)
  pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
    self.max_concurrent = max_concurrent.max(1);
    self
  }

  pub fn max_batch_size(&self) -> usize {
    self.max_batch_size
  }

  fn endpoint(&self, path: &str) -> String {
    format!("{}{}", self.base_url, path)
  }

  /// Whether an installed model name refers to the configured model.
  ///
  /// Ollama reports tags (`all-minilm:latest`, `all-minilm:l6-v2`); the config
  /// usually names the bare model.
  fn is_configured_model(&self, installed: &str) -> bool {
    let bare = installed.split(':').next().unwrap_or(installed);
    installed == self.model || bare == self.model
  }

  async fn installed_models(&self) -> Option<Vec<String>> {
    #[derive(Deserialize)]
    struct Tags {
      models: Vec<Tag>,
    }
    #[derive(Deserialize)]
    struct Tag {
      name: String,
    }

    let response = self
      .client
      .get(self.endpoint("/api/tags"))
      .timeout(PROBE_TIMEOUT)
      .send()
      .await
      .ok()?;
    if !response.status().is_success() {
      return None;
    }
    let tags: Tags = response.json().await.ok()?;
    Some(tags.models.into_iter().map(|t| t.name).collect())
  }

  /// Report reachability and whether the configured model is pulled.
  pub async fn check_health(&self) -> OllamaHealthStatus {
    let models = self.installed_models().await;
    let available = models.is_some();
    let models = models.unwrap_or_default();
    let configured_model_available = models.iter().any(|m| self.is_configured_model(m));

    OllamaHealthStatus {
      available,
      models,
      configured_model: self.model.clone(),
      configured_model_available,
    }
  }

  async fn embed_chunk(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    let request = EmbedRequest {
      model: &self.model,
      input: texts,
    };
    debug!(model = %self.model, texts = texts.len(), "Requesting embeddings");

    let response = self
      .client
      .post(self.endpoint("/api/embed"))
      .json(&request)
      .send()
      .await?;

    let status = response.status();
    if !status.is_success() {
      let body = response.text().await.unwrap_or_default();
      warn!(%status, body = %body, "Ollama embedding request rejected");
      return Err(EmbeddingError::ProviderError(format!("Ollama returned {status}: {body}")));
    }

    let EmbedResponse { embeddings } = response.json().await?;
    if embeddings.len() != texts.len() {
      return Err(EmbeddingError::CountMismatch {
        got: embeddings.len(),
        expected: texts.len(),
      });
    }
    if let Some(odd) = embeddings.iter().find(|e| e.len() != self.dimensions) {
      warn!(got = odd.len(), expected = self.dimensions, "Embedding dimensions differ from config");
    }

    Ok(embeddings)
  }
}

/// Health status for Ollama
#[derive(Debug, Clone, Serialize)]
pub struct OllamaHealthStatus {
  pub available: bool,
  pub models: Vec<String>,
  pub configured_model: String,
  pub configured_model_available: bool,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
  model: &'a str,
  input: &'a [&'a str],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
  embeddings: Vec<Vec<f32>>,
}

#[async_trait]
impl EmbeddingProvider for OllamaProvider {
  fn name(&self) -> &str {
    "ollama"
  }

  fn model_id(&self) -> &str {
    &self.model
  }

  fn dimensions(&self) -> usize {
    self.dimensions
  }

  async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
    self
      .embed_chunk(&[text])
      .await?
      .pop()
      .ok_or(EmbeddingError::CountMismatch { got: 0, expected: 1 })
  }

  async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
    if texts.is_empty() {
      return Ok(Vec::new());
    }
    if texts.len() <= self.max_batch_size {
      return self.embed_chunk(texts).await;
    }

    debug!(
      texts = texts.len(),
      batch_size = self.max_batch_size,
      concurrency = self.max_concurrent,
      "Splitting embedding request"
    );

    let chunks: Vec<_> = texts
      .chunks(self.max_batch_size)
      .map(|chunk| {
        let provider = self.clone();
        let chunk: Vec<String> = chunk.iter().map(|s| s.to_string()).collect();
        async move {
          let refs: Vec<&str> = chunk.iter().map(String::as_str).collect();
          provider.embed_chunk(&refs).await
        }
      })
      .collect();

    join_in_order(chunks, self.max_concurrent).await
  }

  async fn is_available(&self) -> bool {
    self.installed_models().await.is_some()
  }
}

/// Run chunk requests with at most `max_concurrent` in flight and concatenate
/// their vectors in chunk order. The first failed chunk fails the batch.
async fn join_in_order<F>(chunks: Vec<F>, max_concurrent: usize) -> Result<Vec<Vec<f32>>, EmbeddingError>
where
  F: Future<Output = Result<Vec<Vec<f32>>, EmbeddingError>>,
{
  let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
  let tasks = chunks.into_iter().enumerate().map(|(idx, chunk)| {
    let semaphore = semaphore.clone();
    async move {
      let _permit = semaphore
        .acquire_owned()
        .await
        .map_err(|_| EmbeddingError::ProviderError("semaphore closed".to_string()))?;
      Ok::<_, EmbeddingError>((idx, chunk.await?))
    }
  });

  let mut indexed = futures::future::join_all(tasks)
    .await
    .into_iter()
    .collect::<Result<Vec<_>, _>>()?;
  indexed.sort_by_key(|(idx, _)| *idx);

  Ok(indexed.into_iter().flat_map(|(_, vectors)| vectors).collect())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_provider_defaults() {
    let provider = OllamaProvider::new();
    assert_eq!(provider.name(), "ollama");
    assert_eq!(provider.model_id(), "all-minilm");
    assert_eq!(provider.dimensions(), 384);
  }

  #[test]
  fn test_provider_from_config() {
    let config = EmbeddingConfig {
      ollama_url: "http://gpu-box:11434/".to_string(),
      model: "nomic-embed-text".to_string(),
      dimensions: 768,
    };
    let provider = OllamaProvider::from_config(&config);

    assert_eq!(provider.model_id(), "nomic-embed-text");
    assert_eq!(provider.dimensions(), 768);
    assert_eq!(provider.endpoint("/api/embed"), "http://gpu-box:11434/api/embed");
  }

  #[test]
  fn test_limits_never_zero() {
    let provider = OllamaProvider::new().with_max_batch_size(0).with_max_concurrent(0);
    assert_eq!(provider.max_batch_size(), 1);
    assert_eq!(provider.max_concurrent, 1);
  }

  #[test]
  fn test_configured_model_matches_tags() {
    let provider = OllamaProvider::new();
    assert!(provider.is_configured_model("all-minilm"));
    assert!(provider.is_configured_model("all-minilm:latest"));
    assert!(!provider.is_configured_model("all-minilm-l12:latest"));
    assert!(!provider.is_configured_model("nomic-embed-text:latest"));
  }

  #[tokio::test]
  async fn test_embed_batch_empty_input() {
    // no request is made for empty input
    let provider = OllamaProvider::new().with_url("http://127.0.0.1:9");
    assert!(provider.embed_batch(&[]).await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_join_in_order_keeps_chunk_order() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let in_flight = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));

    // later chunks finish first
    let chunks: Vec<_> = (0..5u64)
      .map(|i| {
        let in_flight = in_flight.clone();
        let peak = peak.clone();
        async move {
          let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
          peak.fetch_max(now, Ordering::SeqCst);
          tokio::time::sleep(Duration::from_millis(50 - i * 10)).await;
          in_flight.fetch_sub(1, Ordering::SeqCst);
          Ok(vec![vec![i as f32], vec![i as f32 + 0.5]])
        }
      })
      .collect();

    let vectors = join_in_order(chunks, 2).await.unwrap();

    let firsts: Vec<f32> = vectors.iter().map(|v| v[0]).collect();
    assert_eq!(firsts, vec![0.0, 0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 4.5]);
    assert!(peak.load(Ordering::SeqCst) <= 2);
  }

  #[tokio::test]
  async fn test_join_in_order_fails_on_any_chunk() {
    let chunks: Vec<_> = (0..3)
      .map(|i| async move {
        if i == 1 {
          Err(EmbeddingError::CountMismatch { got: 0, expected: 3 })
        } else {
          Ok(vec![vec![1.0]])
        }
      })
      .collect();

    let err = join_in_order(chunks, 4).await.unwrap_err();
    assert!(matches!(err, EmbeddingError::CountMismatch { got: 0, expected: 3 }));
  }

  #[tokio::test]
  async fn test_multi_chunk_batch_unreachable_server() {
    let provider = OllamaProvider::new()
      .with_url("http://127.0.0.1:9")
      .with_max_batch_size(2);
    assert!(provider.embed_batch(&["Potato", "Tuber", "Andes"]).await.is_err());
  }

  #[tokio::test]
  async fn test_unreachable_server() {
    let provider = OllamaProvider::new().with_url("http://127.0.0.1:9");
    assert!(provider.embed_batch(&["Potato"]).await.is_err());
    assert!(!provider.is_available().await);

    let health = provider.check_health().await;
    assert!(!health.available);
    assert!(!health.configured_model_available);
  }

  // Requires a running Ollama instance with the model pulled
  #[tokio::test]
  async fn test_embed_batch_keeps_order_across_chunks() {
    let provider = OllamaProvider::new().with_max_batch_size(3);
    if !provider.check_health().await.configured_model_available {
      eprintln!("Ollama or all-minilm not available, skipping test");
      return;
    }

    let texts = ["Potato", "Tuber", "Andes", "Peru", "Barack Obama", "Hawaii", "Chicago"];
    let batched = provider.embed_batch(&texts).await.unwrap();
    assert_eq!(batched.len(), 7);

    let single = provider.embed("Barack Obama").await.unwrap();
    let drift: f32 = single.iter().zip(&batched[4]).map(|(a, b)| (a - b).abs()).sum();
    assert!(drift < 1e-3);
  }
}
