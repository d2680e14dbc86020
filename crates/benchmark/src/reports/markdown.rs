//! Markdown report generation.

use std::{fmt::Write as _, path::Path};

use chrono::Utc;

use super::{json::summarize, table::format_time};
use crate::{Result, harness::BenchmarkRow};

/// Markdown report generator.
pub struct MarkdownReport {
  content: String,
}

impl MarkdownReport {
  /// Create a markdown report from harness rows.
  pub fn from_rows(rows: &[BenchmarkRow], max_steps: usize) -> Self {
    let mut content = String::new();

    Self::write_header(&mut content, rows, max_steps);
    Self::write_summary(&mut content, rows);
    Self::write_results(&mut content, rows);
    Self::write_paths(&mut content, rows);

    Self { content }
  }

  fn write_header(out: &mut String, rows: &[BenchmarkRow], max_steps: usize) {
    let _ = writeln!(out, "# Wikipedia Speedrun Benchmark");
    let _ = writeln!(out);
    let _ = writeln!(out, "**Generated:** {}", Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(out, "**Version:** {}", env!("CARGO_PKG_VERSION"));
    let _ = writeln!(out, "**Runs:** {}", rows.len());
    let _ = writeln!(out, "**Max steps:** {}", max_steps);
    let _ = writeln!(out);
  }

  fn write_summary(out: &mut String, rows: &[BenchmarkRow]) {
    let _ = writeln!(out, "## Summary");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Strategy | Wins | Dead ends | Timeouts | Win rate | Avg win time | Avg win steps |");
    let _ = writeln!(out, "|----------|------|-----------|----------|----------|--------------|---------------|");
    for summary in summarize(rows) {
      let avg_time = summary
        .avg_win_secs
        .map(|s| format!("{s:.2}s"))
        .unwrap_or_else(|| "-".to_string());
      let avg_steps = summary
        .avg_win_steps
        .map(|s| format!("{s:.1}"))
        .unwrap_or_else(|| "-".to_string());
      let _ = writeln!(
        out,
        "| {} | {}/{} | {} | {} | {:.0}% | {} | {} |",
        summary.strategy,
        summary.wins,
        summary.runs,
        summary.dead_ends,
        summary.timeouts,
        summary.win_rate * 100.0,
        avg_time,
        avg_steps
      );
    }
    let _ = writeln!(out);
  }

  fn write_results(out: &mut String, rows: &[BenchmarkRow]) {
    let _ = writeln!(out, "## Results");
    let _ = writeln!(out);
    let _ = writeln!(out, "| Scenario | Method | Status | Time | Steps |");
    let _ = writeln!(out, "|----------|--------|--------|------|-------|");
    for row in rows {
      let _ = writeln!(
        out,
        "| {} | {} | {} | {} | {} |",
        row.scenario,
        row.strategy,
        row.result.status,
        format_time(row),
        row.result.steps_taken
      );
    }
    let _ = writeln!(out);
  }

  fn write_paths(out: &mut String, rows: &[BenchmarkRow]) {
    if rows.is_empty() {
      return;
    }

    let _ = writeln!(out, "## Paths");
    let _ = writeln!(out);
    for row in rows {
      let _ = writeln!(out, "### {} ({})", row.scenario, row.strategy);
      let _ = writeln!(out);
      let _ = writeln!(out, "{}", row.result.path.join(" → "));
      let fallbacks = row
        .result
        .moves
        .iter()
        .filter(|m| m.kind == wikirun_core::MoveKind::Fallback)
        .count();
      if fallbacks > 0 {
        let _ = writeln!(out);
        let _ = writeln!(out, "_{} fallback move(s)_", fallbacks);
      }
      let _ = writeln!(out);
    }
  }

  pub fn content(&self) -> &str {
    &self.content
  }

  /// Save report to a file.
  pub async fn save(&self, path: &Path) -> Result<()> {
    tokio::fs::write(path, &self.content).await?;
    Ok(())
  }
}
