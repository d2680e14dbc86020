use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};
use url::Url;
use wikirun_core::{CandidateSet, LinksConfig, PageRef};

use crate::{LinkError, LinkSource, extract_links};

/// Live link source backed by Wikipedia article pages.
#[derive(Debug, Clone)]
pub struct WikipediaLinkSource {
  client: reqwest::Client,
  base_url: Url,
}

impl WikipediaLinkSource {
  pub fn from_config(config: &LinksConfig) -> Result<Self, LinkError> {
    let client = reqwest::Client::builder()
      .user_agent(config.user_agent.as_str())
      .timeout(Duration::from_secs(config.timeout_secs))
      .build()?;
    let base_url = Url::parse(&config.base_url)?;
    Ok(Self { client, base_url })
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  /// Fetch and parse one page, surfacing every failure.
  pub async fn try_fetch(&self, page: &PageRef) -> Result<CandidateSet, LinkError> {
    let response = self.client.get(page.url()).send().await?;

    let status = response.status();
    if !status.is_success() {
      return Err(LinkError::Status(status.as_u16()));
    }

    let html = response.text().await?;
    extract_links(&html, &self.base_url)
  }
}

#[async_trait]
impl LinkSource for WikipediaLinkSource {
  async fn fetch_links(&self, page: &PageRef) -> CandidateSet {
    match self.try_fetch(page).await {
      Ok(links) => {
        debug!(page = %page, links = links.len(), "Fetched links");
        links
      }
      Err(e) => {
        warn!(page = %page, err = %e, "Link fetch failed, treating page as dead end");
        CandidateSet::new()
      }
    }
  }
}
