//! Small utility helpers used across modules.

use std::sync::OnceLock;

use regex::Regex;

/// A run of non-terminators closed by one of `.`, `。` (ideographic full stop)
/// or `．` (fullwidth full stop).
const SENTENCE_PATTERN: &str = "[^.。．]+[.。．]";

fn sentence_regex() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(SENTENCE_PATTERN).expect("sentence pattern is valid"))
}

/// Split description text into trimmed, non-empty sentences.
///
/// Text after the last terminator is dropped. When nothing qualifies the
/// result is a single empty string, so callers can always pick one entry.
pub fn split_sentences(text: &str) -> Vec<String> {
  let mut lines: Vec<String> = sentence_regex()
    .find_iter(text)
    .map(|m| m.as_str().trim())
    .filter(|s| !s.is_empty())
    .map(str::to_string)
    .collect();
  if lines.is_empty() {
    lines.push(String::new());
  }
  lines
}

/// Log-safe truncation for large strings.
/// Avoids spamming logs with whole HTML pages.
pub fn trunc_for_log(s: &str, max: usize) -> String {
  if s.len() <= max {
    return s.to_string();
  }
  let mut cut = max;
  while !s.is_char_boundary(cut) {
    cut -= 1;
  }
  format!("{}… ({} bytes total)", &s[..cut], s.len())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn splits_on_ascii_periods_and_trims() {
    assert_eq!(split_sentences("A. B. C."), vec!["A.", "B.", "C."]);
  }

  #[test]
  fn splits_on_cjk_terminators() {
    let lines = split_sentences("첫 문장입니다。두 번째．세 번째.");
    assert_eq!(lines, vec!["첫 문장입니다。", "두 번째．", "세 번째."]);
  }

  #[test]
  fn text_without_terminator_falls_back_to_empty_line() {
    assert_eq!(split_sentences("no terminator here"), vec![String::new()]);
    assert_eq!(split_sentences(""), vec![String::new()]);
  }

  #[test]
  fn trailing_fragment_is_dropped() {
    assert_eq!(split_sentences("Read N. Print the sum"), vec!["Read N."]);
  }

  #[test]
  fn surrounding_whitespace_is_trimmed() {
    assert_eq!(split_sentences("One.\n\n  Two.  "), vec!["One.", "Two."]);
  }

  #[test]
  fn resplitting_a_sentence_is_idempotent() {
    for line in split_sentences("Given N numbers, print their sum. Numbers fit in 32 bits.") {
      assert_eq!(split_sentences(&line), vec![line.clone()]);
    }
  }

  #[test]
  fn trunc_respects_char_boundaries() {
    let s = "문제문제문제";
    let out = trunc_for_log(s, 4);
    assert!(out.starts_with("문"));
    assert!(out.ends_with("(18 bytes total)"));
    assert_eq!(trunc_for_log("short", 10), "short");
  }
}
