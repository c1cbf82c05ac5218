//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::{Problem, Submission, Verdict};

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    /// Load a problem (first load, or "change problem").
    NewProblem,
    Submit {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        title: Option<String>,
    },
    History,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Problem {
        problem: Problem,
    },
    Verdict {
        submission: Submission,
        /// The next problem after an accepted guess.
        #[serde(skip_serializing_if = "Option::is_none")]
        next: Option<Problem>,
    },
    History {
        submissions: Vec<Submission>,
    },
    Error {
        message: String,
    },
}

/// Generic failure text shown in place of the quiz.
pub const GENERIC_ERROR: &str = "error";

//
// HTTP request/response DTOs
//

#[derive(Debug, Deserialize)]
pub struct GuessIn {
    pub problem: Problem,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GuessOut {
    pub input: String,
    pub result: Verdict,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorOut {
    pub error: String,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}
