//! Text generation seam used by the LLM-backed strategies.
//!
//! Strategies hold an `Arc<dyn LlmProvider>` built once at startup, so tests
//! can swap in a scripted generator without touching the network.

use async_trait::async_trait;

use crate::{InferenceRequest, InferenceResponse, LlmError};

pub type Result<T> = std::result::Result<T, LlmError>;

/// A backend that turns a prompt into text.
///
/// ```ignore
/// struct Parrot;
///
/// #[async_trait::async_trait]
/// impl LlmProvider for Parrot {
///   fn name(&self) -> &str {
///     "parrot"
///   }
///
///   async fn is_available(&self) -> bool {
///     true
///   }
///
///   async fn infer(&self, request: InferenceRequest) -> Result<InferenceResponse> {
///     Ok(InferenceResponse::text("[[Physics]]"))
///   }
/// }
/// ```
#[async_trait]
pub trait LlmProvider: Send + Sync {
  /// Short identifier for logs and health output
  fn name(&self) -> &str;

  /// Whether the backend answers right now (server up, model reachable)
  async fn is_available(&self) -> bool;

  /// Generate a reply. One attempt only; callers own any fallback.
  async fn infer(&self, request: InferenceRequest) -> Result<InferenceResponse>;
}
