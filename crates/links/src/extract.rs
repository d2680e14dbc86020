use scraper::{Html, Selector};
use url::Url;
use wikirun_core::{CandidateSet, PageRef};

use crate::LinkError;

/// Article body container on MediaWiki pages.
const CONTENT_SELECTOR: &str = "#mw-content-text";
const ARTICLE_PREFIX: &str = "/wiki/";
/// Link texts that are citation plumbing rather than navigation.
const NOISE_MARKERS: &[&str] = &["Identifier", "Wayback"];

/// Whether `href` points at a plain article (no namespace, not the main page).
pub fn is_article_href(href: &str) -> bool {
  href.starts_with(ARTICLE_PREFIX) && !href.contains(':') && !href.contains("Main_Page")
}

/// Whether visible link text should be skipped.
pub fn is_noise_text(text: &str) -> bool {
  text.is_empty() || NOISE_MARKERS.iter().any(|marker| text.contains(marker))
}

/// Extract article links from the content region of a MediaWiki page.
///
/// - Only anchors inside `#mw-content-text` are considered
/// - Keys are trimmed visible text, values are `href` resolved against `base`
/// - Document order is preserved; a repeated text keeps its first position
///   and points at its last target
pub fn extract_links(html: &str, base: &Url) -> Result<CandidateSet, LinkError> {
  let document = Html::parse_document(html);
  let content_selector = Selector::parse(CONTENT_SELECTOR).map_err(|e| LinkError::Selector(e.to_string()))?;
  let anchor_selector = Selector::parse("a[href]").map_err(|e| LinkError::Selector(e.to_string()))?;

  let content = document
    .select(&content_selector)
    .next()
    .ok_or(LinkError::MissingContent)?;

  let mut links = CandidateSet::new();
  for element in content.select(&anchor_selector) {
    let Some(href) = element.value().attr("href") else {
      continue;
    };
    if !is_article_href(href) {
      continue;
    }

    let text = element.text().collect::<String>();
    let title = text.trim();
    if is_noise_text(title) {
      continue;
    }

    let Ok(target) = base.join(href) else {
      continue;
    };
    links.insert(title, PageRef::new(target.as_str()));
  }

  Ok(links)
}
