// File: autolive-core/src/platforms/bluesky/requests/session.rs

use tracing::debug;

use autolive_common::models::{CreateSessionResponse, Credentials, Session};
use crate::Error;
use crate::platforms::bluesky::client::{decode_xrpc, BlueskyClient};

pub const CREATE_SESSION: &str = "com.atproto.server.createSession";

/// Logs in with identifier + app password.
///
/// A body that decodes but lacks a usable DID, token, or service endpoint is
/// reported as `Error::UnexpectedResponse` with the raw body attached.
pub async fn create_session(client: &BlueskyClient, creds: &Credentials) -> Result<Session, Error> {
    let url = BlueskyClient::xrpc_url(client.service(), CREATE_SESSION);
    let body = serde_json::to_value(creds)?;

    let resp = client.http_client().post_json(&url, &body, &[]).await?;
    let raw = resp.body.clone();
    let decoded: CreateSessionResponse = decode_xrpc(&url, resp)?;

    let session = Session::try_from(decoded).map_err(|e| Error::UnexpectedResponse {
        url: url.clone(),
        reason: e.to_string(),
        body: raw,
    })?;

    debug!(
        "Created session for did={} (handle={:?}) on {}",
        session.did, session.handle, session.service_endpoint
    );
    Ok(session)
}
