//! Outcome of one navigation game.

use serde::{Deserialize, Serialize};

/// Terminal status of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameStatus {
  Win,
  DeadEnd,
  Timeout,
}

impl GameStatus {
  pub fn as_str(&self) -> &'static str {
    match self {
      GameStatus::Win => "WIN",
      GameStatus::DeadEnd => "DEAD_END",
      GameStatus::Timeout => "TIMEOUT",
    }
  }
}

impl std::fmt::Display for GameStatus {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    // pad() so callers can use width specifiers in tables
    f.pad(self.as_str())
  }
}

/// How the link followed at a step was selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoveKind {
  /// A link already naming the target preempted the strategy
  Shortcut,
  /// The strategy's answer was a valid candidate
  Strategy,
  /// The strategy fell back, or named a link that was not a candidate
  Fallback,
}

/// One transition between pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
  pub step: usize,
  pub from: String,
  pub link: String,
  pub kind: MoveKind,
}

/// Result of a single game. Built once by the engine and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
  pub status: GameStatus,
  /// Seconds from game start to the win; 0 for any other status
  pub elapsed_secs: f64,
  pub steps_taken: usize,
  /// Titles visited, one per step
  pub path: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub moves: Vec<Move>,
}

impl GameResult {
  pub fn won(elapsed_secs: f64, path: Vec<String>, moves: Vec<Move>) -> Self {
    Self {
      status: GameStatus::Win,
      elapsed_secs,
      steps_taken: path.len(),
      path,
      moves,
    }
  }

  pub fn dead_end(path: Vec<String>, moves: Vec<Move>) -> Self {
    Self {
      status: GameStatus::DeadEnd,
      elapsed_secs: 0.0,
      steps_taken: path.len(),
      path,
      moves,
    }
  }

  pub fn timed_out(path: Vec<String>, moves: Vec<Move>) -> Self {
    Self {
      status: GameStatus::Timeout,
      elapsed_secs: 0.0,
      steps_taken: path.len(),
      path,
      moves,
    }
  }

  pub fn is_win(&self) -> bool {
    self.status == GameStatus::Win
  }
}
