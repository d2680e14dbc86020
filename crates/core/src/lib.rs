//! Shared types for the wikirun benchmark.
//!
//! Everything the navigation engine, the strategies and the collaborators
//! exchange lives here: page references, candidate link sets, game results,
//! scenario definitions and the TOML configuration.

pub mod candidates;
pub mod config;
mod error;
pub mod game;
pub mod page;
pub mod scenario;

pub use candidates::CandidateSet;
pub use config::{Config, EmbeddingConfig, GameConfig, LinksConfig, LlmConfig};
pub use error::{CoreError, Result};
pub use game::{GameResult, GameStatus, Move, MoveKind};
pub use page::{PageRef, contains_ignore_case};
pub use scenario::{ScenarioSpec, default_scenarios, filter_scenarios, load_scenarios};
