// File: autolive-core/src/platforms/bluesky/client.rs

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::Error;
use crate::http::{HttpClient, HttpResponse};

/// Entry point for XRPC calls against a Bluesky service.
///
/// Holds no credentials; authenticated calls take the session explicitly.
#[derive(Clone)]
pub struct BlueskyClient {
    http: Arc<dyn HttpClient>,
    service: String,
}

/// Body of a failed XRPC call, e.g. `{"error":"AuthenticationRequired","message":"Invalid identifier or password"}`.
#[derive(Debug, Deserialize)]
struct XrpcErrorBody {
    error: String,
    #[serde(default)]
    message: Option<String>,
}

impl BlueskyClient {
    /// - `service`: base URL of the entryway, e.g. `https://bsky.social`
    pub fn new(http: Arc<dyn HttpClient>, service: &str) -> Self {
        Self {
            http,
            service: service.trim_end_matches('/').to_string(),
        }
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn http_client(&self) -> Arc<dyn HttpClient> {
        self.http.clone()
    }

    /// `{base}/xrpc/{nsid}`
    pub fn xrpc_url(base: &str, nsid: &str) -> String {
        format!("{}/xrpc/{}", base.trim_end_matches('/'), nsid)
    }
}

/// Turns a response into `T`, or into the matching error variant.
pub(crate) fn decode_xrpc<T: DeserializeOwned>(url: &str, resp: HttpResponse) -> Result<T, Error> {
    if !resp.is_success() {
        return Err(xrpc_failure(url, resp));
    }
    serde_json::from_str(&resp.body).map_err(|e| Error::UnexpectedResponse {
        url: url.to_string(),
        reason: e.to_string(),
        body: resp.body,
    })
}

pub(crate) fn xrpc_failure(url: &str, resp: HttpResponse) -> Error {
    match serde_json::from_str::<XrpcErrorBody>(&resp.body) {
        Ok(err) => Error::Xrpc {
            url: url.to_string(),
            status: resp.status,
            error: err.error,
            message: err.message.unwrap_or_default(),
        },
        Err(_) => Error::UnexpectedResponse {
            url: url.to_string(),
            reason: format!("HTTP {}", resp.status),
            body: resp.body,
        },
    }
}
