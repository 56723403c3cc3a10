// File: autolive-core/src/platforms/bluesky/requests/status.rs

use autolive_common::models::{LiveStatusRecord, PutRecordRequest, Session};
use crate::Error;
use crate::http::bearer;
use crate::platforms::bluesky::client::{xrpc_failure, BlueskyClient};

pub const PUT_RECORD: &str = "com.atproto.repo.putRecord";

/// Writes the `app.bsky.actor.status/self` record to the session's PDS.
///
/// Returns the raw response body.
pub async fn put_status_record(
    client: &BlueskyClient,
    session: &Session,
    record: LiveStatusRecord,
) -> Result<String, Error> {
    if session.access_jwt.is_empty() || session.service_endpoint.is_empty() {
        return Err(Error::Platform(
            "put_status_record called without an access token or service endpoint".into(),
        ));
    }

    let url = BlueskyClient::xrpc_url(&session.service_endpoint, PUT_RECORD);
    let body = serde_json::to_value(PutRecordRequest::status(&session.did, record))?;

    let resp = client
        .http_client()
        .post_json(&url, &body, &[bearer(&session.access_jwt)])
        .await?;

    if !resp.is_success() {
        return Err(xrpc_failure(&url, resp));
    }
    Ok(resp.body)
}
