//! Domain models: the problem shown to the player and the guesses they submit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One quiz round: a problem identified by its judge id, with a single
/// sentence of its description as the clue.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
  /// Decimal judge identifier, e.g. "1000".
  pub id: String,
  /// Inner markup of the title node.
  pub title: String,
  /// One trimmed sentence of the description, possibly empty.
  pub line: String,
}

/// Verdict of a guess, named after judge verdicts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
  /// Accepted.
  Ac,
  /// Wrong answer.
  Wa,
}

impl Verdict {
  pub fn is_accepted(self) -> bool {
    matches!(self, Verdict::Ac)
  }
}

/// A graded guess. Lives only as long as the session that produced it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Submission {
  pub id: Uuid,
  /// The line that was on screen when the guess was made.
  pub problem: String,
  pub input: String,
  pub result: Verdict,
  pub time: DateTime<Utc>,
}

impl Submission {
  pub fn new(problem: &Problem, input: String, result: Verdict) -> Self {
    Self {
      id: Uuid::new_v4(),
      problem: problem.line.clone(),
      input,
      result,
      time: Utc::now(),
    }
  }
}
