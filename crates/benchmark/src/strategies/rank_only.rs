use std::sync::Arc;

use async_trait::async_trait;
use embedding::SimilarityOracle;
use tracing::warn;

use super::{Decision, DecisionContext, FallbackReason, Strategy, StrategyKind};

/// Follows whichever link the similarity oracle ranks first.
pub struct RankOnly {
  oracle: Arc<dyn SimilarityOracle>,
}

impl RankOnly {
  pub fn new(oracle: Arc<dyn SimilarityOracle>) -> Self {
    Self { oracle }
  }
}

#[async_trait]
impl Strategy for RankOnly {
  fn name(&self) -> &str {
    StrategyKind::RankOnly.display_name()
  }

  async fn decide(&self, ctx: &DecisionContext<'_>) -> Decision {
    let titles = ctx.titles();
    match self.oracle.top_k(&titles, ctx.target_keywords, 1).await {
      Ok(ranked) => match ranked.into_iter().next() {
        Some(best) => Decision::Chosen(best),
        None => ctx.first_link(FallbackReason::NoCandidates),
      },
      Err(e) => {
        warn!(page = %ctx.current_title, err = %e, "Similarity ranking failed");
        ctx.first_link(FallbackReason::OracleUnavailable)
      }
    }
  }
}
