//! Oneline Judge · guess a judge problem from one sentence of its statement
//!
//! - Axum HTTP + WebSocket API
//! - Random problem resolver over the judge site, cached in Upstash Redis or memory
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT                      : u16 (default 3000)
//!   PUBLIC_MAX_ID             : exclusive id bound (default 30000)
//!   PROBLEM_BASE_URL          : default "https://www.acmicpc.net"
//!   UPSTASH_REDIS_REST_URL    : Upstash cache (with the token)
//!   UPSTASH_REDIS_REST_TOKEN
//!   RESOLVER_CONFIG_PATH      : path to TOML config (`[resolver]` table)
//!   LOG_LEVEL                 : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT                : "pretty" (default) or "json"

mod cache;
mod config;
mod domain;
mod error;
mod html;
mod logic;
mod protocol;
mod resolver;
mod routes;
mod source;
mod state;
mod telemetry;
mod util;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::AppConfig;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let config = AppConfig::from_env();

  // Shared state: cache backend, judge client, resolver.
  let state = Arc::new(AppState::new(&config)?);

  let app = build_router(state);

  let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
  let listener = TcpListener::bind(addr).await?;
  info!(target: "oneline_judge", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
