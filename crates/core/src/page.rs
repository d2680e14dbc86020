//! Page identifiers and title derivation.

use serde::{Deserialize, Serialize};

/// Path marker separating the host part of an article URL from its slug.
const ARTICLE_MARKER: &str = "/wiki/";

/// Opaque identifier of a page in the link graph (an article URL).
///
/// The human-readable title is always derived from the URL and never stored
/// alongside it, so two refs with the same URL always report the same title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageRef(String);

impl PageRef {
  pub fn new(url: impl Into<String>) -> Self {
    Self(url.into())
  }

  pub fn url(&self) -> &str {
    &self.0
  }

  /// Article slug: everything after the last `/wiki/`, or the trailing path
  /// segment for URLs without that marker.
  pub fn slug(&self) -> &str {
    match self.0.rsplit_once(ARTICLE_MARKER) {
      Some((_, slug)) => slug,
      None => self.last_segment(),
    }
  }

  /// Whether the URL names an article: a `/wiki/` path with a slug after it.
  pub fn is_article(&self) -> bool {
    self.0.rsplit_once(ARTICLE_MARKER).is_some_and(|(_, slug)| !slug.is_empty())
  }

  /// Trailing `/`-separated segment, untouched.
  pub fn last_segment(&self) -> &str {
    self.0.rsplit('/').next().unwrap_or(&self.0)
  }

  /// Human-readable title: the slug with underscores turned into spaces.
  pub fn title(&self) -> String {
    self.slug().replace('_', " ")
  }
}

impl std::fmt::Display for PageRef {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<&str> for PageRef {
  fn from(url: &str) -> Self {
    Self::new(url)
  }
}

impl From<String> for PageRef {
  fn from(url: String) -> Self {
    Self(url)
  }
}

/// Case-insensitive substring test used by the win check, the shortcut rule
/// and every strategy's reply matching.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(&needle.to_lowercase())
}
