//! Common test utilities for benchmark integration tests
//!
//! In-memory stand-ins for the three collaborators, so games run without
//! network access, Ollama, or timing noise.

use std::{
  collections::{HashMap, VecDeque},
  sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
  },
};

use async_trait::async_trait;
use embedding::{EmbeddingError, SimilarityOracle};
use links::LinkSource;
use llm::{InferenceRequest, InferenceResponse, LlmError, LlmProvider};
use wikirun_core::{CandidateSet, PageRef};

pub const WIKI: &str = "https://en.wikipedia.org/wiki/";

#[allow(dead_code)]
pub fn page(slug: &str) -> PageRef {
  PageRef::new(format!("{WIKI}{slug}"))
}

/// Fixed link graph keyed by page; unknown pages have no links.
#[derive(Default)]
pub struct GraphLinkSource {
  edges: HashMap<PageRef, CandidateSet>,
  fetches: AtomicUsize,
}

#[allow(dead_code)]
impl GraphLinkSource {
  pub fn new() -> Self {
    Self::default()
  }

  /// Links from `from` to each slug, titled after the slug.
  pub fn with_links(self, from: &str, to: &[&str]) -> Self {
    let links: Vec<(String, &str)> = to.iter().map(|slug| (slug.replace('_', " "), *slug)).collect();
    let links: Vec<(&str, &str)> = links.iter().map(|(title, slug)| (title.as_str(), *slug)).collect();
    self.with_titled_links(from, &links)
  }

  /// Links from `from` given as `(link text, target slug)` pairs.
  pub fn with_titled_links(mut self, from: &str, links: &[(&str, &str)]) -> Self {
    let set = self.edges.entry(page(from)).or_default();
    for (title, slug) in links {
      set.insert(*title, page(slug));
    }
    self
  }

  /// `Page_0 -> Page_1 -> ... -> Page_{len}`, one link per page.
  pub fn chain(len: usize) -> Self {
    (0..len).fold(Self::new(), |graph, i| {
      graph.with_links(&format!("Page_{i}"), &[format!("Page_{}", i + 1).as_str()])
    })
  }

  pub fn fetches(&self) -> usize {
    self.fetches.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl LinkSource for GraphLinkSource {
  async fn fetch_links(&self, page: &PageRef) -> CandidateSet {
    self.fetches.fetch_add(1, Ordering::SeqCst);
    self.edges.get(page).cloned().unwrap_or_default()
  }
}

/// Oracle whose ranking is decided by the test.
pub enum OracleMode {
  /// Candidate order is the ranking
  CandidateOrder,
  /// Listed titles first (in this order), then the rest in candidate order
  Prefer(Vec<String>),
  /// Every call succeeds with no ranking
  Empty,
  /// Every call fails
  Fail,
}

pub struct ScriptedOracle {
  mode: OracleMode,
  calls: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedOracle {
  pub fn new(mode: OracleMode) -> Self {
    Self {
      mode,
      calls: AtomicUsize::new(0),
    }
  }

  pub fn candidate_order() -> Self {
    Self::new(OracleMode::CandidateOrder)
  }

  pub fn prefer(titles: &[&str]) -> Self {
    Self::new(OracleMode::Prefer(titles.iter().map(|t| t.to_string()).collect()))
  }

  pub fn failing() -> Self {
    Self::new(OracleMode::Fail)
  }

  pub fn empty() -> Self {
    Self::new(OracleMode::Empty)
  }

  pub fn calls(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl SimilarityOracle for ScriptedOracle {
  async fn top_k(&self, candidates: &[&str], _query: &str, k: usize) -> Result<Vec<String>, EmbeddingError> {
    self.calls.fetch_add(1, Ordering::SeqCst);

    let ranked: Vec<String> = match &self.mode {
      OracleMode::CandidateOrder => candidates.iter().map(|c| c.to_string()).collect(),
      OracleMode::Prefer(preferred) => {
        let mut ranked: Vec<String> = preferred
          .iter()
          .filter(|p| candidates.contains(&p.as_str()))
          .cloned()
          .collect();
        ranked.extend(
          candidates
            .iter()
            .filter(|c| !preferred.iter().any(|p| p.as_str() == **c))
            .map(|c| c.to_string()),
        );
        ranked
      }
      OracleMode::Empty => Vec::new(),
      OracleMode::Fail => return Err(EmbeddingError::NotAvailable),
    };

    Ok(ranked.into_iter().take(k).collect())
  }
}

/// Generator replaying queued replies; `None` entries fail the call.
///
/// Once the queue is drained every call gets the fallback reply.
pub struct ScriptedGenerator {
  replies: Mutex<VecDeque<Option<String>>>,
  fallback: Option<String>,
  prompts: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl ScriptedGenerator {
  pub fn always(reply: &str) -> Self {
    Self {
      replies: Mutex::new(VecDeque::new()),
      fallback: Some(reply.to_string()),
      prompts: Mutex::new(Vec::new()),
    }
  }

  pub fn failing() -> Self {
    Self {
      replies: Mutex::new(VecDeque::new()),
      fallback: None,
      prompts: Mutex::new(Vec::new()),
    }
  }

  pub fn queued(replies: &[Option<&str>]) -> Self {
    Self {
      replies: Mutex::new(replies.iter().map(|r| r.map(str::to_string)).collect()),
      fallback: None,
      prompts: Mutex::new(Vec::new()),
    }
  }

  pub fn calls(&self) -> usize {
    self.prompts.lock().unwrap().len()
  }

  pub fn prompts(&self) -> Vec<String> {
    self.prompts.lock().unwrap().clone()
  }
}

#[async_trait]
impl LlmProvider for ScriptedGenerator {
  fn name(&self) -> &str {
    "scripted"
  }

  async fn is_available(&self) -> bool {
    true
  }

  async fn infer(&self, request: InferenceRequest) -> Result<InferenceResponse, LlmError> {
    self.prompts.lock().unwrap().push(request.prompt);
    let next = self
      .replies
      .lock()
      .unwrap()
      .pop_front()
      .unwrap_or_else(|| self.fallback.clone());
    next.map(InferenceResponse::text).ok_or(LlmError::NoResponse)
  }
}
