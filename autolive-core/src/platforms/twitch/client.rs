// File: autolive-core/src/platforms/twitch/client.rs

use std::sync::Arc;

use crate::http::{bearer, HttpClient};

pub const HELIX_BASE: &str = "https://api.twitch.tv/helix";

/// A small wrapper client for calling Helix endpoints.
pub struct TwitchHelixClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
    bearer_token: String,
    client_id: String,
}

impl TwitchHelixClient {
    /// - `bearer_token`: a user access token belonging to the broadcaster
    /// - `client_id`: the application the token was issued to
    pub fn new(http: Arc<dyn HttpClient>, bearer_token: &str, client_id: &str) -> Self {
        Self::with_base_url(http, HELIX_BASE, bearer_token, client_id)
    }

    pub fn with_base_url(
        http: Arc<dyn HttpClient>,
        base_url: &str,
        bearer_token: &str,
        client_id: &str,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: bearer_token.to_string(),
            client_id: client_id.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn http_client(&self) -> Arc<dyn HttpClient> {
        self.http.clone()
    }

    /// `Client-Id` + `Authorization` headers every Helix call needs.
    pub fn auth_headers(&self) -> Vec<(&'static str, String)> {
        vec![
            ("Client-Id", self.client_id.clone()),
            bearer(&self.bearer_token),
        ]
    }
}
