//! Text generation through a local Ollama server.
//!
//! Uses the non-streaming `/api/chat` endpoint and returns the assistant
//! message content verbatim.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};
use wikirun_core::LlmConfig;

use crate::{InferenceRequest, InferenceResponse, LlmError, LlmProvider, Result};

const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "llama3.1";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Ollama chat provider
#[derive(Debug, Clone)]
pub struct OllamaChatProvider {
  client: reqwest::Client,
  base_url: String,
  model: String,
  timeout_secs: u64,
}

impl Default for OllamaChatProvider {
  fn default() -> Self {
    Self::new()
  }
}

impl OllamaChatProvider {
  pub fn new() -> Self {
    Self {
      client: reqwest::Client::new(),
      base_url: DEFAULT_OLLAMA_URL.to_string(),
      model: DEFAULT_MODEL.to_string(),
      timeout_secs: DEFAULT_TIMEOUT_SECS,
    }
  }

  pub fn from_config(config: &LlmConfig) -> Self {
    Self::new()
      .with_url(config.ollama_url.trim_end_matches('/'))
      .with_model(&config.model)
      .with_timeout(config.timeout_secs)
  }

  pub fn with_url(mut self, url: impl Into<String>) -> Self {
    self.base_url = url.into();
    self
  }

  pub fn with_model(mut self, model: impl Into<String>) -> Self {
    self.model = model.into();
    self
  }

  pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
    self.timeout_secs = timeout_secs;
    self
  }

  pub fn model(&self) -> &str {
    &self.model
  }

  fn chat_url(&self) -> String {
    format!("{}/api/chat", self.base_url)
  }

  fn build_body<'a>(&'a self, request: &'a InferenceRequest) -> ChatRequest<'a> {
    let model = if request.model.is_empty() {
      self.model.as_str()
    } else {
      request.model.as_str()
    };

    let mut messages = Vec::with_capacity(2);
    if let Some(system) = &request.system_prompt {
      messages.push(ChatMessage {
        role: "system",
        content: system,
      });
    }
    messages.push(ChatMessage {
      role: "user",
      content: &request.prompt,
    });

    ChatRequest {
      model,
      messages,
      stream: false,
    }
  }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
  model: &'a str,
  messages: Vec<ChatMessage<'a>>,
  stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
  role: &'a str,
  content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
  message: Option<ResponseMessage>,
  #[serde(default)]
  prompt_eval_count: u32,
  #[serde(default)]
  eval_count: u32,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
  #[serde(default)]
  content: String,
}

#[async_trait]
impl LlmProvider for OllamaChatProvider {
  fn name(&self) -> &str {
    "ollama-chat"
  }

  async fn is_available(&self) -> bool {
    match self
      .client
      .get(&self.base_url)
      .timeout(Duration::from_secs(5))
      .send()
      .await
    {
      Ok(response) => response.status().is_success(),
      Err(_) => false,
    }
  }

  async fn infer(&self, request: InferenceRequest) -> Result<InferenceResponse> {
    let start = Instant::now();
    let timeout_secs = if request.timeout_secs == 0 {
      self.timeout_secs
    } else {
      request.timeout_secs
    };
    let body = self.build_body(&request);

    debug!(
      model = %body.model,
      prompt_len = request.prompt.len(),
      timeout_secs,
      "Starting inference request"
    );

    let response = self
      .client
      .post(self.chat_url())
      .timeout(Duration::from_secs(timeout_secs))
      .json(&body)
      .send()
      .await
      .map_err(|e| if e.is_timeout() { LlmError::Timeout(timeout_secs) } else { e.into() })?;

    if !response.status().is_success() {
      let status = response.status();
      let text = response.text().await.unwrap_or_default();
      warn!("Ollama chat failed: {} - {}", status, text);
      return Err(LlmError::ProviderError(format!("Ollama returned {}: {}", status, text)));
    }

    let raw = response.text().await?;
    let parsed: ChatResponse = serde_json::from_str(&raw)?;
    let text = parsed.message.map(|m| m.content).unwrap_or_default();

    if text.trim().is_empty() {
      warn!(model = %body.model, "Ollama returned no response text");
      return Err(LlmError::NoResponse);
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    trace!(
      response_len = text.len(),
      input_tokens = parsed.prompt_eval_count,
      output_tokens = parsed.eval_count,
      duration_ms,
      "Inference completed"
    );

    Ok(InferenceResponse {
      text,
      input_tokens: parsed.prompt_eval_count,
      output_tokens: parsed.eval_count,
      duration_ms,
    })
  }
}
