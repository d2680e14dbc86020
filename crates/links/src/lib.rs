//! Outgoing links of a page.
//!
//! A [`LinkSource`] never fails: any network, status or parse problem is
//! logged and reported as an empty candidate set, which the navigation engine
//! treats as a dead end.

mod extract;
mod wikipedia;

use async_trait::async_trait;
use wikirun_core::{CandidateSet, PageRef};

pub use extract::{extract_links, is_article_href, is_noise_text};
pub use wikipedia::WikipediaLinkSource;

#[async_trait]
pub trait LinkSource: Send + Sync {
  /// Outgoing links of `page` in document order; empty on any failure.
  async fn fetch_links(&self, page: &PageRef) -> CandidateSet;
}

#[derive(Debug, thiserror::Error)]
pub enum LinkError {
  #[error("Request failed: {0}")]
  Request(#[from] reqwest::Error),
  #[error("Page returned status {0}")]
  Status(u16),
  #[error("Page has no article content region")]
  MissingContent,
  #[error("Invalid URL: {0}")]
  InvalidUrl(#[from] url::ParseError),
  #[error("Invalid selector: {0}")]
  Selector(String),
}
