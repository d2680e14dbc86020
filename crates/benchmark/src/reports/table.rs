//! Fixed-width console table.

use std::fmt::Write as _;

use crate::harness::BenchmarkRow;

const SCENARIO_WIDTH: usize = 35;
const METHOD_WIDTH: usize = 18;
const STATUS_WIDTH: usize = 8;
const TIME_WIDTH: usize = 8;
const RULE_WIDTH: usize = 90;

/// Time column: seconds with two decimals for a win, `-` otherwise.
pub fn format_time(row: &BenchmarkRow) -> String {
  if row.result.is_win() {
    format!("{:.2}s", row.result.elapsed_secs)
  } else {
    "-".to_string()
  }
}

/// Render rows as `SCENARIO | METHOD | STATUS | TIME | STEPS`.
///
/// Scenario labels longer than the column are cut, never wrapped.
pub fn render_table(rows: &[BenchmarkRow]) -> String {
  let rule = "=".repeat(RULE_WIDTH);
  let mut out = String::new();

  let _ = writeln!(out, "{rule}");
  let _ = writeln!(
    out,
    "{:<SCENARIO_WIDTH$} | {:<METHOD_WIDTH$} | {:<STATUS_WIDTH$} | {:<TIME_WIDTH$} | STEPS",
    "SCENARIO", "METHOD", "STATUS", "TIME"
  );
  let _ = writeln!(out, "{rule}");

  for row in rows {
    let scenario: String = row.scenario.chars().take(SCENARIO_WIDTH).collect();
    let _ = writeln!(
      out,
      "{:<SCENARIO_WIDTH$} | {:<METHOD_WIDTH$} | {:<STATUS_WIDTH$} | {:<TIME_WIDTH$} | {}",
      scenario,
      row.strategy,
      row.result.status,
      format_time(row),
      row.result.steps_taken
    );
  }

  let _ = writeln!(out, "{rule}");
  out
}
