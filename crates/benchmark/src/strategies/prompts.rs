//! Prompt templates for the generating strategies.

use std::fmt::Write as _;

fn write_candidates(out: &mut String, candidates: &[String]) {
  for candidate in candidates {
    let _ = writeln!(out, "- {candidate}");
  }
}

/// Ask for one exact link title and nothing else.
pub fn select_prompt(current: &str, target: &str, candidates: &[String]) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "Wikipedia Game. Current Page: \"{current}\". Target Goal: \"{target}\".");
  let _ = writeln!(
    out,
    "Select the single best link from the list below to get logically closer to the target."
  );
  let _ = writeln!(out);
  let _ = writeln!(out, "Candidates:");
  write_candidates(&mut out, candidates);
  let _ = writeln!(out);
  out.push_str("Reply ONLY with the exact link text. No explanations.");
  out
}

/// Ask for brief reasoning followed by the pick in `[[double brackets]]`.
pub fn reason_prompt(current: &str, target: &str, candidates: &[String]) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "Wikipedia Game. Current: \"{current}\". Target: \"{target}\".");
  let _ = writeln!(out, "Candidates:");
  write_candidates(&mut out, candidates);
  let _ = writeln!(out);
  let _ = writeln!(out, "Task:");
  let _ = writeln!(out, "1. Analyze which link is logically closest to the target.");
  let _ = writeln!(out, "2. Explain your reasoning briefly.");
  out.push_str("3. Finally, write the selected link inside brackets like: [[Link Name]]");
  out
}
