//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs basic result info.

use std::sync::Arc;
use axum::{extract::State, http::StatusCode, Json, response::{IntoResponse, Response}};
use tracing::{error, info, instrument};

use crate::logic::grade_guess;
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_get_problem(State(state): State<Arc<AppState>>) -> Response {
  match state.next_problem().await {
    Ok(problem) => {
      info!(target: "oneline_judge", id = %problem.id, "HTTP problem served");
      Json(problem).into_response()
    }
    Err(e) => {
      error!(target: "oneline_judge", error = %e, "HTTP problem failed");
      (StatusCode::SERVICE_UNAVAILABLE, Json(ErrorOut { error: GENERIC_ERROR.into() })).into_response()
    }
  }
}

/// Stateless grading: the client sends back the problem it was shown.
#[instrument(level = "info", skip(body), fields(problem_id = %body.problem.id))]
pub async fn http_post_guess(Json(body): Json<GuessIn>) -> Response {
  match grade_guess(&body.problem, body.id.as_deref(), body.title.as_deref()) {
    Some((input, result)) => {
      info!(target: "oneline_judge", id = %body.problem.id, result = ?result, "HTTP guess graded");
      Json(GuessOut { input, result }).into_response()
    }
    None => (
      StatusCode::BAD_REQUEST,
      Json(ErrorOut { error: "guess needs an id or a title".into() }),
    )
      .into_response(),
  }
}
