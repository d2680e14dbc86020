use std::sync::Arc;

use wikirun_core::LlmConfig;

mod ollama;
mod provider;

pub use ollama::OllamaChatProvider;
pub use provider::{LlmProvider, Result};

/// Build the generator named by `[llm]` in the config.
///
/// Called once in `main`; every strategy shares the returned handle.
pub fn create_provider(config: &LlmConfig) -> Arc<dyn LlmProvider> {
  Arc::new(OllamaChatProvider::from_config(config))
}

/// One generation call.
///
/// Empty `model` and zero `timeout_secs` defer to the provider's configuration,
/// so strategies only ever fill in the prompt.
#[derive(Debug, Clone, Default)]
pub struct InferenceRequest {
  pub prompt: String,
  pub system_prompt: Option<String>,
  pub model: String,
  pub timeout_secs: u64,
}

impl InferenceRequest {
  pub fn new(prompt: impl Into<String>) -> Self {
    Self {
      prompt: prompt.into(),
      ..Default::default()
    }
  }

  pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
    self.system_prompt = Some(system_prompt.into());
    self
  }
}

/// Generated text plus the usage numbers Ollama reports (0 when absent).
#[derive(Debug, Clone, Default)]
pub struct InferenceResponse {
  pub text: String,
  /// Prompt tokens evaluated
  pub input_tokens: u32,
  /// Tokens generated
  pub output_tokens: u32,
  /// Wall time of the call
  pub duration_ms: u64,
}

impl InferenceResponse {
  /// Bare reply, for providers without usage statistics
  pub fn text(text: impl Into<String>) -> Self {
    Self {
      text: text.into(),
      ..Default::default()
    }
  }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
  #[error("Request failed: {0}")]
  Request(#[from] reqwest::Error),
  #[error("Generation timed out after {0}s")]
  Timeout(u64),
  #[error("Provider error: {0}")]
  ProviderError(String),
  #[error("Malformed response body: {0}")]
  ParseError(#[from] serde_json::Error),
  #[error("Model returned an empty reply")]
  NoResponse,
}
