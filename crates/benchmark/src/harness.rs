//! Runs every scenario against every strategy and keeps the results.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wikirun_core::{GameConfig, GameResult, ScenarioSpec};

use crate::{engine::NavigationEngine, strategies::StrategyRegistry};

/// One (scenario, strategy) outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkRow {
  /// Scenario label, `<start slug> -> <target>`
  pub scenario: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub scenario_id: Option<String>,
  pub strategy: String,
  #[serde(flatten)]
  pub result: GameResult,
}

/// Sequential benchmark runner.
///
/// Scenarios form the outer loop and strategies the inner one, so rows come
/// out grouped by scenario in registry order.
pub struct BenchmarkHarness {
  engine: NavigationEngine,
  strategies: StrategyRegistry,
  max_steps: usize,
  pacing: Duration,
  rows: Vec<BenchmarkRow>,
}

impl BenchmarkHarness {
  pub fn new(engine: NavigationEngine, strategies: StrategyRegistry) -> Self {
    Self::from_config(engine, strategies, &GameConfig::default())
  }

  pub fn from_config(engine: NavigationEngine, strategies: StrategyRegistry, config: &GameConfig) -> Self {
    Self {
      engine,
      strategies,
      max_steps: config.max_steps,
      pacing: Duration::from_millis(config.pacing_ms),
      rows: Vec::new(),
    }
  }

  pub fn with_max_steps(mut self, max_steps: usize) -> Self {
    self.max_steps = max_steps;
    self
  }

  pub fn with_pacing(mut self, pacing: Duration) -> Self {
    self.pacing = pacing;
    self
  }

  pub fn strategies(&self) -> &StrategyRegistry {
    &self.strategies
  }

  /// Number of games a run over `scenarios` will play.
  pub fn total_runs(&self, scenarios: &[ScenarioSpec]) -> usize {
    scenarios.len() * self.strategies.len()
  }

  pub async fn run(&mut self, scenarios: &[ScenarioSpec]) -> &[BenchmarkRow] {
    self.run_observed(scenarios, |_| {}).await
  }

  /// Like [`run`](Self::run), calling `on_row` as soon as each game finishes.
  pub async fn run_observed<F>(&mut self, scenarios: &[ScenarioSpec], mut on_row: F) -> &[BenchmarkRow]
  where
    F: FnMut(&BenchmarkRow),
  {
    let mut first = true;

    for scenario in scenarios {
      let label = scenario.label();
      info!(scenario = %label, "Starting scenario");

      for strategy in self.strategies.iter() {
        if !first && !self.pacing.is_zero() {
          debug!(pacing_ms = self.pacing.as_millis() as u64, "Pacing before next run");
          tokio::time::sleep(self.pacing).await;
        }
        first = false;

        info!(scenario = %label, strategy = strategy.name(), "Running strategy");
        let result = self
          .engine
          .run_game(
            strategy.as_ref(),
            &scenario.start,
            &scenario.target,
            &scenario.keywords,
            self.max_steps,
          )
          .await;
        info!(
          scenario = %label,
          strategy = strategy.name(),
          status = %result.status,
          steps = result.steps_taken,
          "Game finished"
        );

        let row = BenchmarkRow {
          scenario: label.clone(),
          scenario_id: scenario.id.clone(),
          strategy: strategy.name().to_string(),
          result,
        };
        on_row(&row);
        self.rows.push(row);
      }
    }

    &self.rows
  }

  /// All rows collected so far, across every call to `run`.
  pub fn rows(&self) -> &[BenchmarkRow] {
    &self.rows
  }

  pub fn into_rows(self) -> Vec<BenchmarkRow> {
    self.rows
  }
}
