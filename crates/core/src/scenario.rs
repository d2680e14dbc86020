//! Benchmark scenario definitions (TOML schema).
//!
//! A scenarios file holds an ordered list of cases:
//!
//! ```toml
//! [[scenarios]]
//! id = "potato-obama"
//! start = "https://en.wikipedia.org/wiki/Potato"
//! target = "Barack Obama"
//! keywords = "Barack Obama president"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::page::PageRef;
use crate::{CoreError, Result};

/// One benchmark case: where to start and what to look for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSpec {
  /// Optional stable identifier used for filtering
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,
  /// Start page URL
  pub start: PageRef,
  /// Text that must appear in the title of the goal page
  pub target: String,
  /// Query text handed to the similarity oracle
  pub keywords: String,
}

#[derive(Debug, Deserialize)]
struct ScenarioFile {
  #[serde(default)]
  scenarios: Vec<ScenarioSpec>,
}

impl ScenarioSpec {
  pub fn new(start: impl Into<PageRef>, target: impl Into<String>, keywords: impl Into<String>) -> Self {
    Self {
      id: None,
      start: start.into(),
      target: target.into(),
      keywords: keywords.into(),
    }
  }

  pub fn with_id(mut self, id: impl Into<String>) -> Self {
    self.id = Some(id.into());
    self
  }

  /// Display label, e.g. `Potato -> Barack Obama`.
  pub fn label(&self) -> String {
    format!("{} -> {}", self.start.last_segment(), self.target)
  }

  pub fn validate(&self) -> Result<()> {
    if self.start.url().trim().is_empty() {
      return Err(CoreError::Scenario("Start page cannot be empty".into()));
    }
    if !self.start.is_article() {
      return Err(CoreError::Scenario(format!(
        "Start page must be a /wiki/ article URL, got {}",
        self.start
      )));
    }
    if self.target.trim().is_empty() {
      return Err(CoreError::Scenario(format!(
        "Target cannot be empty (start: {})",
        self.start
      )));
    }
    if self.keywords.trim().is_empty() {
      return Err(CoreError::Scenario(format!("Keywords cannot be empty ({})", self.label())));
    }
    Ok(())
  }
}

/// Load and validate scenarios from a TOML file, preserving file order.
pub fn load_scenarios(path: &Path) -> Result<Vec<ScenarioSpec>> {
  let content = std::fs::read_to_string(path)?;
  parse_scenarios(&content)
}

fn parse_scenarios(content: &str) -> Result<Vec<ScenarioSpec>> {
  let file: ScenarioFile = toml::from_str(content)?;
  for scenario in &file.scenarios {
    scenario.validate()?;
  }
  Ok(file.scenarios)
}

/// Built-in scenarios used when no file is given.
pub fn default_scenarios() -> Vec<ScenarioSpec> {
  vec![
    ScenarioSpec::new(
      "https://en.wikipedia.org/wiki/Potato",
      "Barack Obama",
      "Barack Obama president",
    )
    .with_id("potato-obama"),
    ScenarioSpec::new(
      "https://en.wikipedia.org/wiki/Sharknado_2:_The_Second_One",
      "William Shakespeare",
      "William Shakespeare writer",
    )
    .with_id("sharknado-shakespeare"),
  ]
}

/// Filter scenarios by pattern (supports glob-style wildcards) against id and label.
pub fn filter_scenarios<'a>(scenarios: &'a [ScenarioSpec], pattern: &str) -> Vec<&'a ScenarioSpec> {
  let pattern = glob::Pattern::new(pattern).ok();

  scenarios
    .iter()
    .filter(|s| {
      pattern.as_ref().is_none_or(|p| {
        s.id.as_deref().is_some_and(|id| p.matches(id)) || p.matches(&s.label())
      })
    })
    .collect()
}
