//! Key-value cache for fetched problem pages.
//!
//! Each problem id owns two entries: the description text under `{id}` and
//! the title markup under `{id}-title`. Entries are written once and never
//! expire; problem statements are static.
//!
//! Two backends:
//!   - `MemoryCache`   : process-local map (default, and used in tests)
//!   - `UpstashCache`  : Upstash Redis over its REST API

use std::{collections::HashMap, time::Duration};

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::error::CacheError;
use crate::util::trunc_for_log;

/// Cache key for the description text of `id`.
pub fn text_key(id: u32) -> String {
    id.to_string()
}

/// Cache key for the title markup of `id`.
pub fn title_key(id: u32) -> String {
    format!("{id}-title")
}

#[async_trait]
pub trait ProblemCache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError>;
}

/// Process-local cache. Lost on restart, which only costs refetches.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

#[async_trait]
impl ProblemCache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Upstash Redis REST client. Commands are POSTed as a JSON array to the
/// database URL; replies are `{"result": ...}` or `{"error": "..."}`.
#[derive(Clone)]
pub struct UpstashCache {
    client: reqwest::Client,
    url: String,
    token: String,
}

#[derive(Deserialize)]
struct UpstashReply {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

impl UpstashCache {
    pub fn new(url: impl Into<String>, token: impl Into<String>, timeout: Duration) -> Result<Self, CacheError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn command(&self, args: Value) -> Result<Value, CacheError> {
        let res = self
            .client
            .post(&self.url)
            .header(AUTHORIZATION, format!("Bearer {}", self.token))
            .header(CONTENT_TYPE, "application/json")
            .json(&args)
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;
        if !status.is_success() {
            let msg = serde_json::from_str::<UpstashReply>(&body)
                .ok()
                .and_then(|r| r.error)
                .unwrap_or_else(|| trunc_for_log(&body, 200));
            return Err(CacheError::Status { status: status.as_u16(), body: msg });
        }

        let reply: UpstashReply = serde_json::from_str(&body)
            .map_err(|e| CacheError::Decode(format!("{e}: {}", trunc_for_log(&body, 200))))?;
        if let Some(err) = reply.error {
            return Err(CacheError::Upstash(err));
        }
        Ok(reply.result)
    }
}

#[async_trait]
impl ProblemCache for UpstashCache {
    #[instrument(level = "debug", skip(self), target = "cache")]
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match self.command(json!(["GET", key])).await? {
            Value::Null => Ok(None),
            Value::String(s) => Ok(Some(s)),
            other => {
                debug!(target: "cache", %key, "non-string GET result; keeping its JSON form");
                Ok(Some(other.to_string()))
            }
        }
    }

    #[instrument(level = "debug", skip(self, value), fields(value_len = value.len()), target = "cache")]
    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        self.command(json!(["SET", key, value])).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn upstash(server: &MockServer) -> UpstashCache {
        UpstashCache::new(server.uri(), "secret", Duration::from_secs(5)).expect("client builds")
    }

    #[test]
    fn keys_follow_id_and_id_title() {
        assert_eq!(text_key(1000), "1000");
        assert_eq!(title_key(1000), "1000-title");
    }

    #[tokio::test]
    async fn memory_cache_round_trip() {
        let cache = MemoryCache::new();
        assert_eq!(cache.get("1000").await.unwrap(), None);
        cache.set("1000", "first").await.unwrap();
        cache.set("1000", "second").await.unwrap();
        assert_eq!(cache.get("1000").await.unwrap().as_deref(), Some("second"));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn upstash_get_hit_and_miss() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(json!(["GET", "1000"])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "Print A+B." })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(body_json(json!(["GET", "1001"])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": null })))
            .mount(&server)
            .await;

        let cache = upstash(&server);
        assert_eq!(cache.get("1000").await.unwrap().as_deref(), Some("Print A+B."));
        assert_eq!(cache.get("1001").await.unwrap(), None);
    }

    #[tokio::test]
    async fn upstash_set_sends_command_array() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!(["SET", "1000-title", "A+B"])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "OK" })))
            .expect(1)
            .mount(&server)
            .await;

        upstash(&server).set("1000-title", "A+B").await.unwrap();
    }

    #[tokio::test]
    async fn upstash_error_field_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "WRONGTYPE" })))
            .mount(&server)
            .await;

        let err = upstash(&server).get("1000").await.unwrap_err();
        assert!(matches!(err, CacheError::Upstash(ref m) if m == "WRONGTYPE"), "got {err:?}");
    }

    #[tokio::test]
    async fn upstash_unauthorized_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "Unauthorized" })))
            .mount(&server)
            .await;

        let err = upstash(&server).set("1000", "x").await.unwrap_err();
        match err {
            CacheError::Status { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "Unauthorized");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn upstash_non_string_result_keeps_json_text() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(json!(["GET", "1000"])))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": 123 })))
            .mount(&server)
            .await;

        assert_eq!(upstash(&server).get("1000").await.unwrap().as_deref(), Some("123"));
    }
}
