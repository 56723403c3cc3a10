//! HTTP client abstraction layer for the outbound API calls
//!
//! Every call takes its headers as a per-request argument. Nothing is stored
//! on the client between requests, so one `DefaultHttpClient` can be shared by
//! any number of concurrent runs without one run's bearer token leaking into
//! another's request.
//!
//! Failures are classified here, once, into the error variants the
//! orchestration layer matches on:
//!
//! - unparsable URL or unbuildable request => `Error::InvalidUri`
//! - connect / DNS / timeout / send failure => `Error::Transport` (carries the URL)
//! - anything else from reqwest => `Error::Http`
//!
//! Non-success status codes are *not* errors at this layer; callers get the
//! status and body back and decide.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderName, HeaderValue};
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::Error;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
pub const USER_AGENT: &str = concat!("autolive/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A generic trait for making HTTP requests.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn post_json(
        &self,
        url: &str,
        body: &Value,
        headers: &[(&str, String)],
    ) -> Result<HttpResponse, Error>;

    async fn get(&self, url: &str, headers: &[(&str, String)]) -> Result<HttpResponse, Error>;
}

#[derive(Clone)]
pub struct DefaultHttpClient {
    client: reqwest::Client,
}

impl DefaultHttpClient {
    pub fn new() -> Result<Self, Error> {
        Self::with_timeout(REQUEST_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Platform(format!("Failed to build reqwest client: {e}")))?;
        Ok(Self { client })
    }

    async fn send(
        &self,
        builder: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<HttpResponse, Error> {
        let resp = builder
            .send()
            .await
            .map_err(|e| classify_reqwest_error(e, url))?;
        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| classify_reqwest_error(e, url))?;
        debug!("{url} => HTTP {status} ({} bytes)", body.len());
        Ok(HttpResponse { status, body })
    }
}

#[async_trait]
impl HttpClient for DefaultHttpClient {
    async fn post_json(
        &self,
        url: &str,
        body: &Value,
        headers: &[(&str, String)],
    ) -> Result<HttpResponse, Error> {
        let parsed = parse_url(url)?;
        let mut request = self.client.post(parsed).json(body);
        for (key, value) in headers {
            request = request.header(header_name(key)?, header_value(value)?);
        }
        self.send(request, url).await
    }

    async fn get(&self, url: &str, headers: &[(&str, String)]) -> Result<HttpResponse, Error> {
        let parsed = parse_url(url)?;
        let mut request = self.client.get(parsed);
        for (key, value) in headers {
            request = request.header(header_name(key)?, header_value(value)?);
        }
        self.send(request, url).await
    }
}

/// Only absolute http(s) URLs are accepted.
pub fn parse_url(url: &str) -> Result<Url, Error> {
    let parsed = Url::parse(url).map_err(|e| Error::InvalidUri(format!("[{url}]: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(Error::InvalidUri(format!(
            "[{url}]: unsupported scheme '{other}'"
        ))),
    }
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

fn header_name(key: &str) -> Result<HeaderName, Error> {
    HeaderName::from_bytes(key.as_bytes())
        .map_err(|e| Error::InvalidUri(format!("bad header name '{key}': {e}")))
}

fn header_value(value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::InvalidUri(format!("bad header value: {e}")))
}

fn classify_reqwest_error(e: reqwest::Error, url: &str) -> Error {
    if e.is_builder() {
        Error::InvalidUri(format!("[{url}]: {e}"))
    } else if e.is_connect() || e.is_timeout() || e.is_request() {
        Error::Transport {
            url: url.to_string(),
            source: e,
        }
    } else {
        Error::Http(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_url_rejects_garbage_and_other_schemes() {
        assert!(matches!(parse_url("not a url"), Err(Error::InvalidUri(_))));
        assert!(matches!(parse_url("ftp://bsky.social/x"), Err(Error::InvalidUri(_))));
        assert!(parse_url("https://bsky.social/xrpc/com.atproto.server.createSession").is_ok());
    }

    #[test]
    fn bearer_header_shape() {
        let (name, value) = bearer("abc");
        assert_eq!(name, "Authorization");
        assert_eq!(value, "Bearer abc");
    }

    #[test]
    fn token_with_newline_is_a_construction_error() {
        assert!(matches!(header_value("Bearer a\nb"), Err(Error::InvalidUri(_))));
    }

    #[tokio::test]
    async fn connection_refused_is_transport_error_with_url() {
        // Grab a free port, then close it so the connect is refused.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = DefaultHttpClient::with_timeout(Duration::from_secs(2)).unwrap();
        let url = format!("http://127.0.0.1:{port}/xrpc/com.atproto.server.createSession");
        let url = url.as_str();
        let err = client
            .post_json(url, &serde_json::json!({}), &[])
            .await
            .unwrap_err();
        match err {
            Error::Transport { url: got, .. } => assert_eq!(got, url),
            other => panic!("expected transport error, got {other:?}"),
        }
    }
}
