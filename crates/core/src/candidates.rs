//! Ordered link candidates for a single navigation step.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::page::{PageRef, contains_ignore_case};

/// Outgoing links of one page, keyed by visible link text.
///
/// Iteration follows document order. That order is load-bearing: the engine's
/// shortcut rule and every fallback pick the *first* matching key. Inserting a
/// title that already exists keeps its original position and replaces its
/// target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateSet(IndexMap<String, PageRef>);

impl CandidateSet {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn insert(&mut self, title: impl Into<String>, page: PageRef) {
    self.0.insert(title.into(), page);
  }

  pub fn get(&self, title: &str) -> Option<&PageRef> {
    self.0.get(title)
  }

  pub fn contains(&self, title: &str) -> bool {
    self.0.contains_key(title)
  }

  pub fn len(&self) -> usize {
    self.0.len()
  }

  pub fn is_empty(&self) -> bool {
    self.0.is_empty()
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, &PageRef)> {
    self.0.iter().map(|(title, page)| (title.as_str(), page))
  }

  pub fn titles(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  /// First title in document order.
  pub fn first_title(&self) -> Option<&str> {
    self.0.keys().next().map(String::as_str)
  }

  /// Copy of this set without links pointing at already visited pages.
  pub fn without_visited(&self, visited: &HashSet<PageRef>) -> Self {
    self
      .0
      .iter()
      .filter(|(_, page)| !visited.contains(*page))
      .map(|(title, page)| (title.clone(), page.clone()))
      .collect()
  }

  /// First title (in document order) whose text contains `needle`, ignoring case.
  pub fn find_title_containing(&self, needle: &str) -> Option<&str> {
    self.titles().find(|title| contains_ignore_case(title, needle))
  }
}

impl FromIterator<(String, PageRef)> for CandidateSet {
  fn from_iter<I: IntoIterator<Item = (String, PageRef)>>(iter: I) -> Self {
    let mut set = Self::new();
    for (title, page) in iter {
      set.insert(title, page);
    }
    set
  }
}
