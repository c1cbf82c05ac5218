//! WebSocket upgrade + message loop. Each connection is one quiz session:
//! its current problem and submission history live here and die with it.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{info, error, instrument, debug};

use crate::logic::{QuizSession, SubmitOutcome};
use crate::protocol::{ClientWsMessage, ServerWsMessage, GENERIC_ERROR};
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "oneline_judge", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "oneline_judge", "WebSocket connected");
  let mut session = QuizSession::new();
  'conn: while let Some(Ok(msg)) = socket.recv().await {
    let txt = match inbound(msg) {
      Inbound::Text(txt) => txt,
      Inbound::Close => break,
      Inbound::Skip => continue,
    };
    let replies = match serde_json::from_str::<ClientWsMessage>(&txt) {
      Ok(incoming) => {
        debug!(target: "oneline_judge", "WS received: {:?}", &incoming);
        handle_client_ws(incoming, &mut session, &state).await
      }
      Err(e) => vec![ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }],
    };

    for reply in replies {
      let out = serde_json::to_string(&reply).unwrap_or_else(|e| {
        serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
      });
      if let Err(e) = socket.send(Message::Text(out)).await {
        error!(target: "oneline_judge", error = %e, "WS send error");
        break 'conn;
      }
    }
  }
  info!(
    target: "oneline_judge",
    submissions = session.submissions().len(),
    last_problem = session.current().map(|p| p.id.as_str()).unwrap_or("-"),
    "WebSocket disconnected"
  );
}

#[derive(Debug, PartialEq, Eq)]
enum Inbound {
  Text(String),
  Close,
  Skip,
}

/// Only text frames carry protocol messages. Pings are answered by the
/// websocket layer itself, so control and binary frames are skipped.
fn inbound(msg: Message) -> Inbound {
  match msg {
    Message::Text(txt) => Inbound::Text(txt),
    Message::Close(_) => Inbound::Close,
    Message::Ping(_) | Message::Pong(_) | Message::Binary(_) => Inbound::Skip,
  }
}

/// Apply one client message to the session. Usually one reply; an accepted
/// guess whose follow-up load fails yields the verdict and then an error.
#[instrument(level = "info", skip(session, state))]
pub async fn handle_client_ws(msg: ClientWsMessage, session: &mut QuizSession, state: &AppState) -> Vec<ServerWsMessage> {
  match msg {
    ClientWsMessage::Ping => vec![ServerWsMessage::Pong],

    ClientWsMessage::NewProblem => match session.load_next(state).await {
      Ok(problem) => vec![ServerWsMessage::Problem { problem }],
      Err(_) => vec![ServerWsMessage::Error { message: GENERIC_ERROR.into() }],
    },

    ClientWsMessage::Submit { id, title } => {
      match session.submit(state, id.as_deref(), title.as_deref()).await {
        SubmitOutcome::NoProblem => vec![ServerWsMessage::Error { message: "No problem loaded.".into() }],
        SubmitOutcome::Blank => vec![ServerWsMessage::Error { message: "Enter an id or a title.".into() }],
        SubmitOutcome::Graded { submission, next: None } => vec![ServerWsMessage::Verdict { submission, next: None }],
        SubmitOutcome::Graded { submission, next: Some(Ok(problem)) } => {
          vec![ServerWsMessage::Verdict { submission, next: Some(problem) }]
        }
        SubmitOutcome::Graded { submission, next: Some(Err(_)) } => vec![
          ServerWsMessage::Verdict { submission, next: None },
          ServerWsMessage::Error { message: GENERIC_ERROR.into() },
        ],
      }
    }

    ClientWsMessage::History => vec![ServerWsMessage::History { submissions: session.submissions().to_vec() }],
  }
}
