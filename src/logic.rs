//! Core behaviors shared by the HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Grading a guess against the current problem (id or title)
//!   - The per-connection quiz session: current problem + submission history

use tracing::{error, info, instrument};

use crate::domain::{Problem, Submission, Verdict};
use crate::error::ResolveError;
use crate::state::AppState;

/// Grade a guess. A non-blank title guess takes precedence over the id guess.
/// Returns None when both are blank, in which case nothing is recorded.
pub fn grade_guess(problem: &Problem, id_guess: Option<&str>, title_guess: Option<&str>) -> Option<(String, Verdict)> {
  let mut graded = None;
  if let Some(id) = id_guess.filter(|s| !s.trim().is_empty()) {
    let verdict = if id == problem.id { Verdict::Ac } else { Verdict::Wa };
    graded = Some((id.to_string(), verdict));
  }
  if let Some(title) = title_guess.filter(|s| !s.trim().is_empty()) {
    let verdict = if title == problem.title { Verdict::Ac } else { Verdict::Wa };
    graded = Some((title.to_string(), verdict));
  }
  graded
}

/// What happened to a guess submitted in a session.
#[derive(Debug)]
pub enum SubmitOutcome {
  /// No problem is on screen (never loaded, or the last load failed).
  NoProblem,
  /// Both inputs were blank.
  Blank,
  Graded {
    submission: Submission,
    /// Present after an accepted guess: the result of loading the next problem.
    next: Option<Result<Problem, ResolveError>>,
  },
}

/// Quiz state for one connection. Nothing here outlives the connection.
#[derive(Debug, Default)]
pub struct QuizSession {
  current: Option<Problem>,
  submissions: Vec<Submission>,
}

impl QuizSession {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn current(&self) -> Option<&Problem> {
    self.current.as_ref()
  }

  /// Submissions, newest first.
  pub fn submissions(&self) -> &[Submission] {
    &self.submissions
  }

  /// Replace the current problem with a freshly resolved one. On failure the
  /// session is left without a problem.
  #[instrument(level = "info", skip_all)]
  pub async fn load_next(&mut self, state: &AppState) -> Result<Problem, ResolveError> {
    match state.next_problem().await {
      Ok(problem) => {
        info!(target: "oneline_judge", id = %problem.id, "problem loaded into session");
        self.current = Some(problem.clone());
        Ok(problem)
      }
      Err(e) => {
        error!(target: "oneline_judge", error = %e, "failed to load problem");
        self.current = None;
        Err(e)
      }
    }
  }

  /// Grade a guess, record it, and move on to a new problem if it was accepted.
  #[instrument(level = "info", skip(self, state))]
  pub async fn submit(&mut self, state: &AppState, id_guess: Option<&str>, title_guess: Option<&str>) -> SubmitOutcome {
    let Some(problem) = self.current.as_ref() else {
      return SubmitOutcome::NoProblem;
    };
    let Some((input, verdict)) = grade_guess(problem, id_guess, title_guess) else {
      return SubmitOutcome::Blank;
    };

    let submission = Submission::new(problem, input, verdict);
    info!(target: "oneline_judge", id = %problem.id, result = ?verdict, "guess graded");
    self.submissions.insert(0, submission.clone());

    let next = if verdict.is_accepted() {
      Some(self.load_next(state).await)
    } else {
      None
    };
    SubmitOutcome::Graded { submission, next }
  }
}
