use std::sync::Arc;

use async_trait::async_trait;
use embedding::SimilarityOracle;
use llm::{InferenceRequest, LlmProvider};
use tracing::{debug, warn};

use super::{Decision, DecisionContext, FallbackReason, Strategy, StrategyKind, prompts::select_prompt};

const SHORTLIST_SIZE: usize = 10;

/// Shortlists by similarity, then asks the LLM for one exact title.
pub struct RankThenGenerate {
  oracle: Arc<dyn SimilarityOracle>,
  generator: Arc<dyn LlmProvider>,
}

impl RankThenGenerate {
  pub fn new(oracle: Arc<dyn SimilarityOracle>, generator: Arc<dyn LlmProvider>) -> Self {
    Self { oracle, generator }
  }
}

/// Trim the reply and drop every quote character.
pub fn normalize_reply(reply: &str) -> String {
  reply.trim().replace(['"', '\''], "")
}

/// First shortlisted title appearing in `text`, ignoring case.
pub(crate) fn first_mentioned<'a>(shortlist: &'a [String], text: &str) -> Option<&'a String> {
  let text = text.to_lowercase();
  shortlist.iter().find(|title| text.contains(&title.to_lowercase()))
}

#[async_trait]
impl Strategy for RankThenGenerate {
  fn name(&self) -> &str {
    StrategyKind::RankThenGenerate.display_name()
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

    let prompt = select_prompt(ctx.current_title, ctx.target_label, &shortlist);
    let reply = match self.generator.infer(InferenceRequest::new(prompt)).await {
      Ok(response) => response.text,
      Err(e) => {
        warn!(page = %ctx.current_title, err = %e, "Generation failed, using top-ranked link");
        return Decision::fallback(best_ranked, FallbackReason::GenerationFailed);
      }
    };

    let reply = normalize_reply(&reply);
    debug!(page = %ctx.current_title, reply = %reply, "Model picked link");

    match first_mentioned(&shortlist, &reply) {
      Some(title) => Decision::chosen(title.as_str()),
      None => Decision::fallback(best_ranked, FallbackReason::ParseMismatch),
    }
  }
}
