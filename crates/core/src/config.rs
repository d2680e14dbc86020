//! Configuration for the benchmark and its collaborators.
//!
//! Config priority: explicit `--config` path > user (~/.config/wikirun/config.toml) > defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{CoreError, Result};

// ============================================================================
// Game Configuration
// ============================================================================

/// Step budget and pacing for benchmark runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
  /// Hard ceiling on steps per game (default: 15)
  pub max_steps: usize,

  /// Delay between successive strategy runs in milliseconds (default: 1000).
  /// 0 disables pacing.
  pub pacing_ms: u64,
}

impl Default for GameConfig {
  fn default() -> Self {
    Self {
      max_steps: 15,
      pacing_ms: 1000,
    }
  }
}

// ============================================================================
// Link Source Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinksConfig {
  /// Origin that relative article links are resolved against
  pub base_url: String,

  /// User-Agent header sent with every page fetch
  pub user_agent: String,

  /// Per-request timeout in seconds
  pub timeout_secs: u64,
}

impl Default for LinksConfig {
  fn default() -> Self {
    Self {
      base_url: "https://en.wikipedia.org".to_string(),
      user_agent: "SpeedrunBot/1.0".to_string(),
      timeout_secs: 5,
    }
  }
}

// ============================================================================
// Embedding Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
  /// Ollama server URL
  pub ollama_url: String,

  /// Embedding model (all-minilm is the MiniLM-L6-v2 sentence transformer)
  pub model: String,

  /// Embedding dimensions (must match model output)
  pub dimensions: usize,
}

impl Default for EmbeddingConfig {
  fn default() -> Self {
    Self {
      ollama_url: "http://localhost:11434".to_string(),
      model: "all-minilm".to_string(),
      dimensions: 384,
    }
  }
}

// ============================================================================
// Text Generation Configuration
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
  /// Ollama server URL
  pub ollama_url: String,

  /// Chat model used by the generating strategies
  pub model: String,

  /// Timeout for a single generation in seconds
  pub timeout_secs: u64,
}

impl Default for LlmConfig {
  fn default() -> Self {
    Self {
      ollama_url: "http://localhost:11434".to_string(),
      model: "llama3.1".to_string(),
      timeout_secs: 120,
    }
  }
}

// ============================================================================
// Main Configuration
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
  pub game: GameConfig,
  pub links: LinksConfig,
  pub embedding: EmbeddingConfig,
  pub llm: LlmConfig,
}

impl Config {
  /// Load config from an explicit path, else the user config, else defaults.
  ///
  /// An explicit path must exist; a missing user config is not an error.
  pub fn load(explicit: Option<&Path>) -> Result<Self> {
    if let Some(path) = explicit {
      if !path.exists() {
        return Err(CoreError::Config(format!("Config file not found: {}", path.display())));
      }
      return Self::load_file(path);
    }

    if let Some(user_config_path) = Self::user_config_path()
      && user_config_path.exists()
    {
      return Self::load_file(&user_config_path);
    }

    Ok(Self::default())
  }

  pub fn load_file(path: &Path) -> Result<Self> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
  }

  /// Get the user-level config path
  pub fn user_config_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("WIKIRUN_CONFIG_DIR") {
      return Some(PathBuf::from(path).join("config.toml"));
    }

    dirs::config_dir().map(|p: PathBuf| p.join("wikirun").join("config.toml"))
  }

  pub fn validate(&self) -> Result<()> {
    if self.game.max_steps == 0 {
      return Err(CoreError::Config("game.max_steps must be at least 1".into()));
    }
    if self.links.base_url.trim().is_empty() {
      return Err(CoreError::Config("links.base_url cannot be empty".into()));
    }
    Ok(())
  }
}
