//! JSON report format for benchmark results.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use wikirun_core::GameStatus;

use crate::{Result, harness::BenchmarkRow};

/// Complete benchmark report in JSON format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
  /// Report metadata
  pub metadata: ReportMetadata,
  /// Per-strategy summary, in the order strategies first appear in the rows
  pub strategies: Vec<StrategySummary>,
  /// Raw rows, one per (scenario, strategy)
  pub rows: Vec<BenchmarkRow>,
}

/// Report metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
  /// Report generation timestamp
  pub timestamp: DateTime<Utc>,
  /// Benchmark version
  pub version: String,
  /// Hostname
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hostname: Option<String>,
  /// Step ceiling used for every game
  pub max_steps: usize,
  /// Distinct scenarios run
  pub total_scenarios: usize,
  /// Games played
  pub total_runs: usize,
}

/// Outcome counts for one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
  pub strategy: String,
  pub runs: usize,
  pub wins: usize,
  pub dead_ends: usize,
  pub timeouts: usize,
  /// Wins / runs (0.0-1.0)
  pub win_rate: f64,
  /// Mean seconds to win over winning runs only
  #[serde(skip_serializing_if = "Option::is_none")]
  pub avg_win_secs: Option<f64>,
  /// Mean steps over winning runs only
  #[serde(skip_serializing_if = "Option::is_none")]
  pub avg_win_steps: Option<f64>,
}

impl StrategySummary {
  fn from_rows<'a>(strategy: &str, rows: impl Iterator<Item = &'a BenchmarkRow>) -> Self {
    let mut summary = Self {
      strategy: strategy.to_string(),
      runs: 0,
      wins: 0,
      dead_ends: 0,
      timeouts: 0,
      win_rate: 0.0,
      avg_win_secs: None,
      avg_win_steps: None,
    };

    let mut win_secs = 0.0;
    let mut win_steps = 0usize;
    for row in rows {
      summary.runs += 1;
      match row.result.status {
        GameStatus::Win => {
          summary.wins += 1;
          win_secs += row.result.elapsed_secs;
          win_steps += row.result.steps_taken;
        }
        GameStatus::DeadEnd => summary.dead_ends += 1,
        GameStatus::Timeout => summary.timeouts += 1,
      }
    }

    if summary.runs > 0 {
      summary.win_rate = summary.wins as f64 / summary.runs as f64;
    }
    if summary.wins > 0 {
      summary.avg_win_secs = Some(win_secs / summary.wins as f64);
      summary.avg_win_steps = Some(win_steps as f64 / summary.wins as f64);
    }
    summary
  }
}

/// Strategy names in order of first appearance.
pub(crate) fn strategy_order(rows: &[BenchmarkRow]) -> Vec<&str> {
  let mut names: Vec<&str> = Vec::new();
  for row in rows {
    if !names.contains(&row.strategy.as_str()) {
      names.push(&row.strategy);
    }
  }
  names
}

pub(crate) fn summarize(rows: &[BenchmarkRow]) -> Vec<StrategySummary> {
  strategy_order(rows)
    .into_iter()
    .map(|name| StrategySummary::from_rows(name, rows.iter().filter(|r| r.strategy == name)))
    .collect()
}

impl BenchmarkReport {
  /// Create a report from harness rows.
  pub fn from_rows(rows: &[BenchmarkRow], max_steps: usize) -> Self {
    let mut scenarios: Vec<&str> = rows.iter().map(|r| r.scenario.as_str()).collect();
    scenarios.sort_unstable();
    scenarios.dedup();

    Self {
      metadata: ReportMetadata {
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        hostname: hostname::get().ok().and_then(|h| h.into_string().ok()),
        max_steps,
        total_scenarios: scenarios.len(),
        total_runs: rows.len(),
      },
      strategies: summarize(rows),
      rows: rows.to_vec(),
    }
  }

  /// Save report to a JSON file.
  pub async fn save(&self, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(self)?;
    tokio::fs::write(path, json).await?;
    Ok(())
  }

  /// Load report from a JSON file.
  pub async fn load(path: &Path) -> Result<Self> {
    let json = tokio::fs::read_to_string(path).await?;
    let report = serde_json::from_str(&json)?;
    Ok(report)
  }
}
