use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use embedding::SimilarityOracle;
use llm::{InferenceRequest, LlmProvider};
use regex::Regex;
use tracing::{debug, warn};

use super::{
  Decision, DecisionContext, FallbackReason, Strategy, StrategyKind, prompts::reason_prompt,
  rank_then_generate::first_mentioned,
};

const SHORTLIST_SIZE: usize = 5;

static BRACKETED: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\[(.*?)\]\]").expect("valid regex"));

/// Contents of the first `[[...]]` span, trimmed.
pub fn extract_bracketed(reply: &str) -> Option<&str> {
  BRACKETED
    .captures(reply)
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str().trim())
}

/// Shortlists by similarity, then lets the LLM reason before naming a link.
pub struct RankThenReason {
  oracle: Arc<dyn SimilarityOracle>,
  generator: Arc<dyn LlmProvider>,
}

impl RankThenReason {
  pub fn new(oracle: Arc<dyn SimilarityOracle>, generator: Arc<dyn LlmProvider>) -> Self {
    Self { oracle, generator }
  }
}

/// Resolve a reasoning reply against the shortlist.
///
/// The bracketed answer wins; otherwise any mention in the whole reply counts.
fn pick_from_reply<'a>(shortlist: &'a [String], reply: &str) -> Option<&'a String> {
  extract_bracketed(reply)
    .and_then(|answer| first_mentioned(shortlist, answer))
    .or_else(|| first_mentioned(shortlist, reply))
}

#[async_trait]
impl Strategy for RankThenReason {
  fn name(&self) -> &str {
    StrategyKind::RankThenReason.display_name()
  }

  async fn decide(&self, ctx: &DecisionContext<'_>) -> Decision {
    let titles = ctx.titles();
    let shortlist = match self.oracle.top_k(&titles, ctx.target_keywords, SHORTLIST_SIZE).await {
      Ok(shortlist) => shortlist,
      Err(e) => {
        warn!(page = %ctx.current_title, err = %e, "Similarity ranking failed");
        return ctx.first_link(FallbackReason::OracleUnavailable);
      }
    };
    let Some(best_ranked) = shortlist.first().cloned() else {
      return ctx.first_link(FallbackReason::NoCandidates);
    };

    let prompt = reason_prompt(ctx.current_title, ctx.target_label, &shortlist);
    let reply = match self.generator.infer(InferenceRequest::new(prompt)).await {
      Ok(response) => response.text,
      Err(e) => {
        warn!(page = %ctx.current_title, err = %e, "Generation failed, using top-ranked link");
        return Decision::fallback(best_ranked, FallbackReason::GenerationFailed);
      }
    };
    debug!(page = %ctx.current_title, reply_len = reply.len(), "Model reasoning received");

    match pick_from_reply(&shortlist, &reply) {
      Some(title) => Decision::chosen(title.as_str()),
      None => Decision::fallback(best_ranked, FallbackReason::ParseMismatch),
    }
  }
}
