//! Game loop for a single navigation run.

use std::{collections::HashSet, sync::Arc, time::Instant};

use links::LinkSource;
use tracing::{debug, info, warn};
use wikirun_core::{CandidateSet, GameResult, Move, MoveKind, PageRef, contains_ignore_case};

use crate::strategies::{Decision, DecisionContext, Strategy};

/// Drives one game at a time against a link source.
///
/// The engine owns the visited set and the path; strategies see only the
/// unvisited links of the current page. It never fails: broken collaborators
/// turn into dead ends or fallback moves.
#[derive(Clone)]
pub struct NavigationEngine {
  links: Arc<dyn LinkSource>,
}

impl NavigationEngine {
  pub fn new(links: Arc<dyn LinkSource>) -> Self {
    Self { links }
  }

  /// Play from `start` until a page title contains `target_label`, nothing new
  /// is reachable, or `max_steps` pages have been visited.
  pub async fn run_game(
    &self,
    strategy: &dyn Strategy,
    start: &PageRef,
    target_label: &str,
    target_keywords: &str,
    max_steps: usize,
  ) -> GameResult {
    let started = Instant::now();
    let mut current = start.clone();
    let mut visited: HashSet<PageRef> = HashSet::from([start.clone()]);
    let mut path: Vec<String> = Vec::new();
    let mut moves: Vec<Move> = Vec::new();

    for step in 1..=max_steps {
      let title = current.title();
      path.push(title.clone());
      debug!(step, page = %title, strategy = strategy.name(), "Visiting page");

      if contains_ignore_case(&title, target_label) {
        let elapsed = started.elapsed().as_secs_f64();
        info!(
          strategy = strategy.name(),
          steps = path.len(),
          elapsed_secs = elapsed,
          "Reached target"
        );
        return GameResult::won(elapsed, path, moves);
      }

      let valid_links = self.links.fetch_links(&current).await.without_visited(&visited);
      if valid_links.is_empty() {
        info!(strategy = strategy.name(), page = %title, steps = path.len(), "Dead end");
        return GameResult::dead_end(path, moves);
      }

      let (link, kind) = match valid_links.find_title_containing(target_label) {
        Some(shortcut) => {
          info!(step, link = %shortcut, "Target link on page, taking shortcut");
          (shortcut.to_string(), MoveKind::Shortcut)
        }
        None => {
          let ctx = DecisionContext {
            current_title: &title,
            target_label,
            target_keywords,
            valid_links: &valid_links,
          };
          let decision = strategy.decide(&ctx).await;
          validate_choice(decision, &valid_links)
        }
      };

      let Some(next) = valid_links.get(&link).cloned() else {
        // Only reachable if the set has no first title, which was ruled out above
        return GameResult::dead_end(path, moves);
      };

      debug!(step, from = %title, link = %link, kind = ?kind, "Following link");
      moves.push(Move {
        step,
        from: title,
        link,
        kind,
      });
      visited.insert(next.clone());
      current = next;
    }

    info!(strategy = strategy.name(), steps = path.len(), "Step limit reached");
    GameResult::timed_out(path, moves)
  }
}

/// Turn a strategy decision into a link that is actually on the page.
///
/// Anything that is not a key of `valid_links` is replaced by the first key.
fn validate_choice(decision: Decision, valid_links: &CandidateSet) -> (String, MoveKind) {
  match decision {
    Decision::Chosen(choice) if valid_links.contains(&choice) => (choice, MoveKind::Strategy),
    Decision::Fallback { choice, reason } if valid_links.contains(&choice) => {
      warn!(link = %choice, reason = %reason, "Strategy fell back");
      (choice, MoveKind::Fallback)
    }
    other => {
      let first = valid_links.first_title().unwrap_or_default().to_string();
      warn!(
        choice = %other.choice(),
        substitute = %first,
        "Strategy chose a link that is not on the page"
      );
      (first, MoveKind::Fallback)
    }
  }
}
