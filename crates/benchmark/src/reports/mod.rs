//! Report generation for benchmark results.
//!
//! - Table: fixed-width console summary printed after a run
//! - JSON: Machine-readable rows plus per-strategy summary
//! - Markdown: Human-readable summary

mod json;
mod markdown;
mod table;

use std::path::{Path, PathBuf};

pub use json::{BenchmarkReport, ReportMetadata, StrategySummary};
pub use markdown::MarkdownReport;
pub use table::{format_time, render_table};

use crate::harness::BenchmarkRow;

/// Write `<run_name>.json` and `<run_name>.md` into `output_dir`.
///
/// Returns the paths written, JSON first.
pub async fn generate_reports(
  rows: &[BenchmarkRow],
  max_steps: usize,
  output_dir: &Path,
  run_name: Option<&str>,
) -> crate::Result<Vec<PathBuf>> {
  tokio::fs::create_dir_all(output_dir).await?;

  let run_name = run_name.unwrap_or("benchmark");

  let json_path = output_dir.join(format!("{}.json", run_name));
  let report = BenchmarkReport::from_rows(rows, max_steps);
  report.save(&json_path).await?;

  let md_path = output_dir.join(format!("{}.md", run_name));
  let md_report = MarkdownReport::from_rows(rows, max_steps);
  md_report.save(&md_path).await?;

  Ok(vec![json_path, md_path])
}
