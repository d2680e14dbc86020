//! Integration tests for the navigation engine.
//!
//! Games run over in-memory link graphs with scripted collaborators.

mod common;

use std::{collections::HashSet, sync::Arc};

use async_trait::async_trait;
use benchmark::{
  NavigationEngine, StrategyRegistry,
  strategies::{Decision, DecisionContext, RankOnly, Strategy},
};
use common::{GraphLinkSource, ScriptedGenerator, ScriptedOracle, page};
use pretty_assertions::assert_eq;
use wikirun_core::{GameStatus, MoveKind};

/// Always names a link that does not exist.
struct Stubborn;

#[async_trait]
impl Strategy for Stubborn {
  fn name(&self) -> &str {
    "stubborn"
  }

  async fn decide(&self, _ctx: &DecisionContext<'_>) -> Decision {
    Decision::chosen("Nowhere")
  }
}

fn engine(graph: &Arc<GraphLinkSource>) -> NavigationEngine {
  NavigationEngine::new(graph.clone())
}

#[tokio::test]
async fn test_dead_end_at_start() {
  let graph = Arc::new(GraphLinkSource::new());
  let oracle = Arc::new(ScriptedOracle::candidate_order());
  let strategy = RankOnly::new(oracle.clone());

  let result = engine(&graph)
    .run_game(&strategy, &page("Potato"), "Barack Obama", "Barack Obama president", 15)
    .await;

  assert_eq!(result.status, GameStatus::DeadEnd);
  assert_eq!(result.elapsed_secs, 0.0);
  assert_eq!(result.steps_taken, 1);
  assert_eq!(result.path, vec!["Potato".to_string()]);
  assert_eq!(graph.fetches(), 1);
  assert_eq!(oracle.calls(), 0);
}

#[tokio::test]
async fn test_start_matching_target_wins_without_calls() {
  let graph = Arc::new(GraphLinkSource::new().with_links("Barack_Obama", &["Hawaii"]));
  let oracle = Arc::new(ScriptedOracle::candidate_order());
  let strategy = RankOnly::new(oracle.clone());

  let result = engine(&graph)
    .run_game(&strategy, &page("Barack_Obama"), "barack obama", "Barack Obama president", 15)
    .await;

  assert_eq!(result.status, GameStatus::Win);
  assert!(result.elapsed_secs >= 0.0);
  assert_eq!(result.steps_taken, 1);
  assert_eq!(result.path, vec!["Barack Obama".to_string()]);
  assert!(result.moves.is_empty());
  assert_eq!(graph.fetches(), 0);
  assert_eq!(oracle.calls(), 0);
}

#[tokio::test]
async fn test_endless_graph_times_out() {
  let graph = Arc::new(GraphLinkSource::chain(50));
  let strategy = RankOnly::new(Arc::new(ScriptedOracle::candidate_order()));

  let result = engine(&graph)
    .run_game(&strategy, &page("Page_0"), "Shakespeare", "William Shakespeare", 3)
    .await;

  assert_eq!(result.status, GameStatus::Timeout);
  assert_eq!(result.elapsed_secs, 0.0);
  assert_eq!(result.steps_taken, 3);
  assert_eq!(result.path, vec!["Page 0", "Page 1", "Page 2"]);
  assert_eq!(result.moves.len(), 3);
}

#[tokio::test]
async fn test_zero_step_budget() {
  let graph = Arc::new(GraphLinkSource::chain(5));
  let strategy = RankOnly::new(Arc::new(ScriptedOracle::candidate_order()));

  let result = engine(&graph)
    .run_game(&strategy, &page("Page_0"), "Page 0", "Page 0", 0)
    .await;

  assert_eq!(result.status, GameStatus::Timeout);
  assert_eq!(result.steps_taken, 0);
  assert!(result.path.is_empty());
  assert_eq!(graph.fetches(), 0);
}

#[tokio::test]
async fn test_steps_never_exceed_budget() {
  let graph = Arc::new(GraphLinkSource::chain(20));
  let strategy = RankOnly::new(Arc::new(ScriptedOracle::candidate_order()));
  let engine = engine(&graph);

  for max_steps in 1..=6 {
    let result = engine
      .run_game(&strategy, &page("Page_0"), "Unreachable", "Unreachable", max_steps)
      .await;
    assert_eq!(result.steps_taken, max_steps);
    assert_eq!(result.path.len(), result.steps_taken);
  }
}

#[tokio::test]
async fn test_shortcut_preempts_every_strategy() {
  let graph = Arc::new(GraphLinkSource::new().with_titled_links(
    "Potato",
    &[
      ("Andes", "Andes"),
      ("barack obama's presidency", "Presidency_of_Barack_Obama"),
      ("Barack Obama", "Barack_Obama"),
    ],
  ));
  let oracle = Arc::new(ScriptedOracle::prefer(&["Andes"]));
  let generator = Arc::new(ScriptedGenerator::always("Andes"));
  let registry = StrategyRegistry::build(&[], oracle.clone(), generator.clone());
  assert_eq!(registry.len(), 3);

  for strategy in registry.iter() {
    let result = engine(&graph)
      .run_game(strategy.as_ref(), &page("Potato"), "Barack Obama", "Barack Obama president", 15)
      .await;

    assert_eq!(result.status, GameStatus::Win, "{}", strategy.name());
    assert_eq!(result.path, vec!["Potato", "Presidency of Barack Obama"]);
    assert_eq!(result.moves[0].link, "barack obama's presidency");
    assert_eq!(result.moves[0].kind, MoveKind::Shortcut);
  }

  assert_eq!(oracle.calls(), 0);
  assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn test_invalid_choice_falls_back_to_first_link() {
  let graph = Arc::new(
    GraphLinkSource::new()
      .with_links("Potato", &["Andes", "Peru"])
      .with_links("Andes", &["Lima", "Barack_Obama"]),
  );

  let result = engine(&graph)
    .run_game(&Stubborn, &page("Potato"), "Barack Obama", "Barack Obama", 15)
    .await;

  assert_eq!(result.status, GameStatus::Win);
  assert_eq!(result.path, vec!["Potato", "Andes", "Barack Obama"]);
  assert_eq!(result.moves[0].link, "Andes");
  assert_eq!(result.moves[0].kind, MoveKind::Fallback);
  assert_eq!(result.moves[1].kind, MoveKind::Shortcut);
}

#[tokio::test]
async fn test_visited_pages_are_never_revisited() {
  let graph = Arc::new(
    GraphLinkSource::new()
      .with_links("Potato", &["Tuber", "Andes"])
      .with_links("Tuber", &["Potato", "Andes"])
      .with_links("Andes", &["Potato", "Tuber"]),
  );
  let strategy = RankOnly::new(Arc::new(ScriptedOracle::candidate_order()));

  let result = engine(&graph)
    .run_game(&strategy, &page("Potato"), "Barack Obama", "Barack Obama", 15)
    .await;

  assert_eq!(result.status, GameStatus::DeadEnd);
  assert_eq!(result.path, vec!["Potato", "Tuber", "Andes"]);
  let unique: HashSet<&String> = result.path.iter().collect();
  assert_eq!(unique.len(), result.path.len());
}

#[tokio::test]
async fn test_strategy_choice_is_followed() {
  let graph = Arc::new(
    GraphLinkSource::new()
      .with_links("Potato", &["Andes", "United_States"])
      .with_links("United_States", &["Barack_Obama"]),
  );
  let strategy = RankOnly::new(Arc::new(ScriptedOracle::prefer(&["United States"])));

  let result = engine(&graph)
    .run_game(&strategy, &page("Potato"), "Barack Obama", "Barack Obama president", 15)
    .await;

  assert_eq!(result.status, GameStatus::Win);
  assert_eq!(result.steps_taken, 3);
  assert_eq!(result.moves[0].kind, MoveKind::Strategy);
  assert_eq!(result.moves[0].from, "Potato");
  assert_eq!(result.moves[0].link, "United States");
}

#[tokio::test]
async fn test_oracle_failure_takes_first_link() {
  let graph = Arc::new(GraphLinkSource::new().with_links("Potato", &["Andes", "Peru"]));
  let strategy = RankOnly::new(Arc::new(ScriptedOracle::failing()));

  let result = engine(&graph)
    .run_game(&strategy, &page("Potato"), "Barack Obama", "Barack Obama", 15)
    .await;

  assert_eq!(result.status, GameStatus::DeadEnd);
  assert_eq!(result.path, vec!["Potato", "Andes"]);
  assert_eq!(result.moves[0].kind, MoveKind::Fallback);
}
