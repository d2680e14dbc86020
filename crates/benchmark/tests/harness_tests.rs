//! Integration tests for the benchmark harness and its reports.

mod common;

use std::{sync::Arc, time::Duration};

use benchmark::{
  BenchmarkHarness, NavigationEngine, StrategyKind, StrategyRegistry,
  reports::{BenchmarkReport, generate_reports},
  render_table,
};
use common::{GraphLinkSource, ScriptedGenerator, ScriptedOracle, WIKI};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wikirun_core::{GameConfig, GameStatus, ScenarioSpec};

fn graph() -> Arc<GraphLinkSource> {
  Arc::new(
    GraphLinkSource::new()
      .with_links("Potato", &["Andes", "United_States"])
      .with_links("United_States", &["Barack_Obama"])
      .with_links("Sharknado_2:_The_Second_One", &["Shark"]),
  )
}

fn scenarios() -> Vec<ScenarioSpec> {
  vec![
    ScenarioSpec::new(format!("{WIKI}Potato"), "Barack Obama", "Barack Obama president").with_id("potato-obama"),
    ScenarioSpec::new(
      format!("{WIKI}Sharknado_2:_The_Second_One"),
      "William Shakespeare",
      "William Shakespeare writer",
    ),
  ]
}

fn harness(kinds: &[StrategyKind]) -> BenchmarkHarness {
  let oracle = Arc::new(ScriptedOracle::prefer(&["United States"]));
  let generator = Arc::new(ScriptedGenerator::always("[[United States]]"));
  let registry = StrategyRegistry::build(kinds, oracle, generator);
  let config = GameConfig {
    max_steps: 15,
    pacing_ms: 0,
  };
  BenchmarkHarness::from_config(NavigationEngine::new(graph()), registry, &config)
}

#[tokio::test]
async fn test_rows_cover_every_pair_in_order() {
  let mut harness = harness(&[]);
  let scenarios = scenarios();
  assert_eq!(harness.total_runs(&scenarios), 6);

  let rows = harness.run(&scenarios).await;

  let pairs: Vec<(&str, &str)> = rows.iter().map(|r| (r.scenario.as_str(), r.strategy.as_str())).collect();
  assert_eq!(
    pairs,
    vec![
      ("Potato -> Barack Obama", "Rank Only"),
      ("Potato -> Barack Obama", "Rank + Generate"),
      ("Potato -> Barack Obama", "Rank + Reason"),
      (
        "Sharknado_2:_The_Second_One -> William Shakespeare",
        "Rank Only"
      ),
      (
        "Sharknado_2:_The_Second_One -> William Shakespeare",
        "Rank + Generate"
      ),
      (
        "Sharknado_2:_The_Second_One -> William Shakespeare",
        "Rank + Reason"
      ),
    ]
  );

  for row in &rows[..3] {
    assert_eq!(row.result.status, GameStatus::Win);
    assert_eq!(row.result.steps_taken, 3);
    assert_eq!(row.scenario_id.as_deref(), Some("potato-obama"));
  }
  for row in &rows[3..] {
    assert_eq!(row.result.status, GameStatus::DeadEnd);
    assert_eq!(row.result.path, vec!["Sharknado 2: The Second One", "Shark"]);
  }
}

#[tokio::test]
async fn test_selected_strategies_only() {
  let mut harness = harness(&[StrategyKind::RankThenReason, StrategyKind::RankOnly]);
  let rows = harness.run(&scenarios()[..1]).await;

  let strategies: Vec<&str> = rows.iter().map(|r| r.strategy.as_str()).collect();
  assert_eq!(strategies, vec!["Rank + Reason", "Rank Only"]);
}

#[tokio::test]
async fn test_observer_sees_each_row() {
  let mut harness = harness(&[StrategyKind::RankOnly]);
  let mut seen = Vec::new();

  harness
    .run_observed(&scenarios(), |row| seen.push(row.result.status))
    .await;

  assert_eq!(seen, vec![GameStatus::Win, GameStatus::DeadEnd]);
  assert_eq!(harness.rows().len(), 2);
}

#[tokio::test]
async fn test_pacing_between_runs() {
  let mut harness = harness(&[StrategyKind::RankOnly]).with_pacing(Duration::from_millis(30));

  let started = std::time::Instant::now();
  harness.run(&scenarios()).await;

  // two runs, one pause between them
  assert!(started.elapsed() >= Duration::from_millis(30));
}

#[tokio::test]
async fn test_table_and_reports() {
  let mut harness = harness(&[StrategyKind::RankOnly]);
  let rows = harness.run(&scenarios()).await.to_vec();

  let table = render_table(&rows);
  let lines: Vec<&str> = table.lines().collect();
  assert_eq!(lines.len(), 6);
  assert!(lines[3].starts_with("Potato -> Barack Obama              | Rank Only          | WIN      | "));
  assert!(lines[4].ends_with("| DEAD_END | -        | 2"));

  let temp = TempDir::new().unwrap();
  let written = generate_reports(&rows, 15, temp.path(), Some("smoke")).await.unwrap();
  assert_eq!(written.len(), 2);
  assert!(temp.path().join("smoke.md").exists());

  let report = BenchmarkReport::load(&temp.path().join("smoke.json")).await.unwrap();
  assert_eq!(report.rows.len(), 2);
  assert_eq!(report.strategies[0].wins, 1);
  assert_eq!(report.strategies[0].dead_ends, 1);
}

#[test]
fn test_bundled_scenarios_file_loads() {
  let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("scenarios/default.toml");
  let scenarios = wikirun_core::load_scenarios(&path).unwrap();

  assert_eq!(scenarios.len(), 4);
  assert_eq!(scenarios[0].label(), "Potato -> Barack Obama");
  assert_eq!(wikirun_core::filter_scenarios(&scenarios, "*shakespeare").len(), 1);
}
