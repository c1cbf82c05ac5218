//! Where problem pages come from.
//!
//! `HttpProblemSource` GETs `{base_url}/problem/{id}` from the judge site.
//! Only HTTP 200 counts as a page; any other status is reported as
//! `Unavailable` so the resolver can resample. Transport failures are errors.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header::USER_AGENT, StatusCode};
use tracing::{debug, instrument};

use crate::error::FetchError;

/// Result of asking the judge for one problem page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// HTTP 200 with the page body.
    Page(String),
    /// Any other status, e.g. 404 for an id that was never used.
    Unavailable(u16),
}

#[async_trait]
pub trait ProblemSource: Send + Sync {
    async fn fetch(&self, id: u32) -> Result<FetchOutcome, FetchError>;
}

#[derive(Clone)]
pub struct HttpProblemSource {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl HttpProblemSource {
    pub fn new(
        base_url: impl Into<String>,
        user_agent: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            user_agent: user_agent.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn problem_url(&self, id: u32) -> String {
        format!("{}/problem/{}", self.base_url, id)
    }
}

#[async_trait]
impl ProblemSource for HttpProblemSource {
    #[instrument(level = "debug", skip(self), target = "resolver")]
    async fn fetch(&self, id: u32) -> Result<FetchOutcome, FetchError> {
        let url = self.problem_url(id);
        let res = self
            .client
            .get(&url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|source| FetchError::Transport { id, source })?;

        let status = res.status();
        if status != StatusCode::OK {
            debug!(target: "resolver", id, status = status.as_u16(), "problem page unavailable");
            return Ok(FetchOutcome::Unavailable(status.as_u16()));
        }

        let body = res
            .text()
            .await
            .map_err(|source| FetchError::Body { id, source })?;
        debug!(target: "resolver", id, body_len = body.len(), "problem page fetched");
        Ok(FetchOutcome::Page(body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn source(server: &MockServer) -> HttpProblemSource {
        HttpProblemSource::new(server.uri(), "oneline-judge-test", Duration::from_secs(5))
            .expect("client builds")
    }

    #[test]
    fn url_template_uses_problem_path() {
        let src = HttpProblemSource::new("https://www.acmicpc.net/", "ua", Duration::from_secs(1))
            .expect("client builds");
        assert_eq!(src.problem_url(1000), "https://www.acmicpc.net/problem/1000");
    }

    #[tokio::test]
    async fn ok_status_yields_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/problem/1000"))
            .and(header("user-agent", "oneline-judge-test"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let outcome = source(&server).fetch(1000).await.expect("fetch ok");
        assert_eq!(outcome, FetchOutcome::Page("<html></html>".into()));
    }

    #[tokio::test]
    async fn non_ok_status_is_unavailable_not_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/problem/1001"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/problem/1002"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let src = source(&server);
        assert_eq!(src.fetch(1001).await.unwrap(), FetchOutcome::Unavailable(404));
        assert_eq!(src.fetch(1002).await.unwrap(), FetchOutcome::Unavailable(204));
    }

    #[tokio::test]
    async fn connection_failure_is_transport_error() {
        let addr = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
            listener.local_addr().expect("local addr")
        };
        let src = HttpProblemSource::new(format!("http://{addr}"), "ua", Duration::from_secs(2))
            .expect("client builds");
        let err = src.fetch(1000).await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { id: 1000, .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn truncated_body_is_body_error() {
        use std::io::{Read, Write};

        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().expect("accept");
            let mut buf = [0u8; 1024];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n<html>");
        });

        let src = HttpProblemSource::new(format!("http://{addr}"), "ua", Duration::from_secs(2))
            .expect("client builds");
        let err = src.fetch(1000).await.unwrap_err();
        assert!(matches!(err, FetchError::Body { id: 1000, .. }), "got {err:?}");
        server.join().expect("server thread");
    }
}
