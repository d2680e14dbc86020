//! Wikipedia speedrun benchmark for link-choosing strategies
//!
//! An agent starts on one article and follows links until it reaches a page
//! whose title names the target, hits a page with nothing new to follow, or
//! runs out of steps. Strategies only decide *which* link to follow; the
//! engine owns everything else so that results stay comparable.
//!
//! ## Key Concepts
//!
//! - **Engine**: the step loop, win/dead-end/timeout detection, the shortcut
//!   rule and invalid-choice fallback
//! - **Strategies**: similarity-only, similarity + LLM pick, similarity + LLM reasoning
//! - **Harness**: every scenario × every strategy, sequentially, with pacing
//! - **Reports**: console table, JSON (machine-readable) and Markdown

pub mod engine;
pub mod harness;
pub mod reports;
pub mod strategies;

pub use engine::NavigationEngine;
pub use harness::{BenchmarkHarness, BenchmarkRow};
pub use reports::{BenchmarkReport, MarkdownReport, render_table};
pub use strategies::{Decision, FallbackReason, Strategy, StrategyKind, StrategyRegistry};

use thiserror::Error;

/// Benchmark-specific errors
#[derive(Debug, Error)]
pub enum BenchmarkError {
  #[error("Unknown strategy: {0}")]
  UnknownStrategy(String),

  #[error("IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON error: {0}")]
  Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BenchmarkError>;
