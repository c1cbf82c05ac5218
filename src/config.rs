//! Configuration from environment variables and an optional TOML file.
//!
//! Env variables:
//!   PORT                      : u16 (default 3000)
//!   PUBLIC_MAX_ID             : exclusive upper bound for sampled ids (default 30000)
//!   PROBLEM_BASE_URL          : judge site root (default "https://www.acmicpc.net")
//!   UPSTASH_REDIS_REST_URL    : with the token below, selects the Upstash cache
//!   UPSTASH_REDIS_REST_TOKEN
//!   RESOLVER_CONFIG_PATH      : TOML file with a `[resolver]` table (see `ResolverConfig`)
//!
//! Env values win over the TOML file.

use std::time::Duration;

use serde::Deserialize;
use tracing::{error, info, warn};

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ResolverConfig {
  /// Inclusive lower bound for sampled ids.
  pub min_id: u32,
  /// Exclusive upper bound for sampled ids.
  pub max_id: u32,
  /// How many identifiers may answer non-200 before giving up.
  pub max_attempts: u32,
  pub request_timeout_secs: u64,
  pub base_url: String,
  pub user_agent: String,
  /// Element id holding the statement text.
  pub description_id: String,
  /// Element id holding the title markup.
  pub title_id: String,
}

impl Default for ResolverConfig {
  fn default() -> Self {
    Self {
      min_id: 1000,
      max_id: 30000,
      max_attempts: 20,
      request_timeout_secs: 10,
      base_url: "https://www.acmicpc.net".into(),
      user_agent: concat!("oneline-judge/", env!("CARGO_PKG_VERSION")).into(),
      description_id: "problem_description".into(),
      title_id: "problem_title".into(),
    }
  }
}

impl ResolverConfig {
  pub fn request_timeout(&self) -> Duration {
    Duration::from_secs(self.request_timeout_secs)
  }
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpstashConfig {
  pub url: String,
  pub token: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
  pub port: u16,
  pub resolver: ResolverConfig,
  pub upstash: Option<UpstashConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct FileConfig {
  #[serde(default)]
  resolver: ResolverConfig,
}

impl AppConfig {
  pub fn from_env() -> Self {
    Self::from_lookup(|key| std::env::var(key).ok())
  }

  /// Build configuration from an arbitrary variable lookup.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
    let mut resolver = lookup("RESOLVER_CONFIG_PATH")
      .and_then(|path| load_resolver_file(&path))
      .unwrap_or_default();

    if let Some(raw) = lookup("PUBLIC_MAX_ID") {
      match raw.trim().parse::<u32>() {
        Ok(max_id) => resolver.max_id = max_id,
        Err(e) => warn!(target: "oneline_judge", %raw, error = %e, "Ignoring invalid PUBLIC_MAX_ID"),
      }
    }
    if let Some(base_url) = lookup("PROBLEM_BASE_URL").filter(|s| !s.trim().is_empty()) {
      resolver.base_url = base_url;
    }

    let port = lookup("PORT")
      .and_then(|p| p.parse::<u16>().ok())
      .unwrap_or(DEFAULT_PORT);

    let upstash = match (lookup("UPSTASH_REDIS_REST_URL"), lookup("UPSTASH_REDIS_REST_TOKEN")) {
      (Some(url), Some(token)) if !url.is_empty() && !token.is_empty() => Some(UpstashConfig { url, token }),
      (Some(_), None) | (None, Some(_)) => {
        warn!(target: "oneline_judge", "Only one of UPSTASH_REDIS_REST_URL/TOKEN is set; using in-memory cache");
        None
      }
      _ => None,
    };

    Self { port, resolver, upstash }
  }
}

/// Parse a `[resolver]` table. On any IO/parse error, logs and returns None.
fn load_resolver_file(path: &str) -> Option<ResolverConfig> {
  match std::fs::read_to_string(path) {
    Ok(s) => match parse_resolver_toml(&s) {
      Ok(cfg) => {
        info!(target: "oneline_judge", %path, "Loaded resolver config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "oneline_judge", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "oneline_judge", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

fn parse_resolver_toml(s: &str) -> Result<ResolverConfig, toml::de::Error> {
  toml::from_str::<FileConfig>(s).map(|f| f.resolver)
}
