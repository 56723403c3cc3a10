// File: autolive-core/src/platforms/twitch/requests/user.rs

use serde::Deserialize;
use tracing::debug;

use crate::Error;
use crate::platforms::twitch::client::TwitchHelixClient;

/// Response from "Get Users" endpoint.
#[derive(Debug, Deserialize)]
pub struct UsersResponse {
    pub data: Vec<UserData>,
}

/// Single user record.
#[derive(Debug, Clone, Deserialize)]
pub struct UserData {
    pub id: String,
    pub login: String,
    pub display_name: String,
}

/// Calls "Get Users" without parameters, which returns the token's owner.
///
/// `Ok(None)` when Helix answers with an empty `data` array.
pub async fn fetch_token_user(client: &TwitchHelixClient) -> Result<Option<UserData>, Error> {
    let url = format!("{}/users", client.base_url());
    let headers = client.auth_headers();
    let resp = client.http_client().get(&url, &headers).await?;

    if !resp.is_success() {
        return Err(Error::Platform(format!(
            "fetch_token_user: HTTP {} => {}",
            resp.status, resp.body
        )));
    }

    let users: UsersResponse =
        serde_json::from_str(&resp.body).map_err(|e| Error::UnexpectedResponse {
            url: url.clone(),
            reason: e.to_string(),
            body: resp.body.clone(),
        })?;

    let user = users.data.into_iter().next();
    if let Some(u) = &user {
        debug!("Helix token belongs to login='{}' id={}", u.login, u.id);
    }
    Ok(user)
}
