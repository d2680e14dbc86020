//! Link-choosing strategies.
//!
//! A strategy only answers "which of these links next?". It never sees the
//! visited set and never fails: when a collaborator breaks, it says so with
//! [`Decision::Fallback`] and the engine carries on.

mod prompts;
mod rank_only;
mod rank_then_generate;
mod rank_then_reason;

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use embedding::SimilarityOracle;
use llm::LlmProvider;
use serde::{Deserialize, Serialize};
use wikirun_core::CandidateSet;

pub use prompts::{reason_prompt, select_prompt};
pub use rank_only::RankOnly;
pub use rank_then_generate::{RankThenGenerate, normalize_reply};
pub use rank_then_reason::{RankThenReason, extract_bracketed};

use crate::{BenchmarkError, Result};

/// Everything a strategy may look at for one step.
#[derive(Debug, Clone, Copy)]
pub struct DecisionContext<'a> {
  pub current_title: &'a str,
  pub target_label: &'a str,
  pub target_keywords: &'a str,
  /// Unvisited outgoing links, never empty when the engine asks
  pub valid_links: &'a CandidateSet,
}

impl DecisionContext<'_> {
  /// Candidate titles in document order.
  pub fn titles(&self) -> Vec<&str> {
    self.valid_links.titles().collect()
  }

  /// Decision used when nothing better is available: the first link on the page.
  pub fn first_link(&self, reason: FallbackReason) -> Decision {
    match self.valid_links.first_title() {
      Some(title) => Decision::fallback(title, reason),
      None => Decision::fallback("", FallbackReason::NoCandidates),
    }
  }
}

/// Why a strategy could not produce its own answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
  /// The similarity oracle failed
  OracleUnavailable,
  /// The oracle returned nothing to choose from
  NoCandidates,
  /// Text generation failed
  GenerationFailed,
  /// The generated reply named none of the offered links
  ParseMismatch,
}

impl fmt::Display for FallbackReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      FallbackReason::OracleUnavailable => "oracle unavailable",
      FallbackReason::NoCandidates => "no candidates",
      FallbackReason::GenerationFailed => "generation failed",
      FallbackReason::ParseMismatch => "reply matched no candidate",
    };
    f.write_str(s)
  }
}

/// Outcome of asking a strategy for the next link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
  Chosen(String),
  Fallback { choice: String, reason: FallbackReason },
}

impl Decision {
  pub fn chosen(title: impl Into<String>) -> Self {
    Decision::Chosen(title.into())
  }

  pub fn fallback(title: impl Into<String>, reason: FallbackReason) -> Self {
    Decision::Fallback {
      choice: title.into(),
      reason,
    }
  }

  /// The link title this decision points at.
  pub fn choice(&self) -> &str {
    match self {
      Decision::Chosen(choice) | Decision::Fallback { choice, .. } => choice,
    }
  }

  pub fn is_fallback(&self) -> bool {
    matches!(self, Decision::Fallback { .. })
  }
}

#[async_trait]
pub trait Strategy: Send + Sync {
  /// Label shown in the results table
  fn name(&self) -> &str;

  async fn decide(&self, ctx: &DecisionContext<'_>) -> Decision;
}

/// Built-in strategies, selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum StrategyKind {
  /// Follow the link most similar to the target keywords
  RankOnly,
  /// Shortlist by similarity, let the LLM pick the exact title
  RankThenGenerate,
  /// Shortlist by similarity, let the LLM reason before picking
  RankThenReason,
}

impl StrategyKind {
  pub const ALL: [StrategyKind; 3] = [
    StrategyKind::RankOnly,
    StrategyKind::RankThenGenerate,
    StrategyKind::RankThenReason,
  ];

  /// Command-line identifier
  pub fn as_str(&self) -> &'static str {
    match self {
      StrategyKind::RankOnly => "rank-only",
      StrategyKind::RankThenGenerate => "rank-then-generate",
      StrategyKind::RankThenReason => "rank-then-reason",
    }
  }

  /// Table label; fits the METHOD column
  pub fn display_name(&self) -> &'static str {
    match self {
      StrategyKind::RankOnly => "Rank Only",
      StrategyKind::RankThenGenerate => "Rank + Generate",
      StrategyKind::RankThenReason => "Rank + Reason",
    }
  }

  pub fn needs_llm(&self) -> bool {
    !matches!(self, StrategyKind::RankOnly)
  }
}

impl fmt::Display for StrategyKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for StrategyKind {
  type Err = BenchmarkError;

  fn from_str(s: &str) -> Result<Self> {
    StrategyKind::ALL
      .into_iter()
      .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
      .ok_or_else(|| BenchmarkError::UnknownStrategy(s.to_string()))
  }
}

/// Ordered collection of strategies to benchmark.
///
/// Order is the run order inside each scenario.
#[derive(Clone, Default)]
pub struct StrategyRegistry {
  entries: Vec<Arc<dyn Strategy>>,
}

impl StrategyRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Build the requested built-in strategies around shared collaborators.
  ///
  /// An empty `kinds` selects all of them.
  pub fn build(kinds: &[StrategyKind], oracle: Arc<dyn SimilarityOracle>, generator: Arc<dyn LlmProvider>) -> Self {
    let kinds: &[StrategyKind] = if kinds.is_empty() { &StrategyKind::ALL } else { kinds };

    let mut registry = Self::new();
    for kind in kinds {
      if registry.get(kind.display_name()).is_some() {
        continue;
      }
      let strategy: Arc<dyn Strategy> = match kind {
        StrategyKind::RankOnly => Arc::new(RankOnly::new(oracle.clone())),
        StrategyKind::RankThenGenerate => Arc::new(RankThenGenerate::new(oracle.clone(), generator.clone())),
        StrategyKind::RankThenReason => Arc::new(RankThenReason::new(oracle.clone(), generator.clone())),
      };
      registry.register(strategy);
    }
    registry
  }

  /// Append a strategy, replacing any existing one with the same name in place.
  pub fn register(&mut self, strategy: Arc<dyn Strategy>) {
    match self.entries.iter_mut().find(|s| s.name() == strategy.name()) {
      Some(slot) => *slot = strategy,
      None => self.entries.push(strategy),
    }
  }

  pub fn get(&self, name: &str) -> Option<&Arc<dyn Strategy>> {
    self.entries.iter().find(|s| s.name() == name)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Strategy>> {
    self.entries.iter()
  }

  pub fn names(&self) -> Vec<&str> {
    self.entries.iter().map(|s| s.name()).collect()
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
