// File: autolive-core/src/platforms/twitch/broadcaster.rs

use async_trait::async_trait;

use autolive_common::models::BroadcasterInfo;
use autolive_common::traits::BroadcasterSource;
use crate::Error;
use crate::platforms::twitch::client::TwitchHelixClient;
use crate::platforms::twitch::requests::user::fetch_token_user;

/// A broadcaster given up front (CLI flag or `broadcaster` setting).
pub struct StaticBroadcaster {
    login: String,
}

impl StaticBroadcaster {
    pub fn new(login: impl Into<String>) -> Self {
        Self {
            login: login.into(),
        }
    }
}

#[async_trait]
impl BroadcasterSource for StaticBroadcaster {
    async fn current_broadcaster(&self) -> Result<BroadcasterInfo, Error> {
        let login = self.login.trim();
        if login.is_empty() {
            return Err(Error::BroadcasterUnavailable(
                "no broadcaster login configured".into(),
            ));
        }
        Ok(BroadcasterInfo {
            user_id: None,
            user_login: login.to_lowercase(),
            user_name: login.to_string(),
        })
    }
}

/// Resolves the broadcaster from the owner of a Helix user token.
///
/// `client` is `None` when no token or client id is configured.
pub struct HelixBroadcasterSource {
    client: Option<TwitchHelixClient>,
}

impl HelixBroadcasterSource {
    pub fn new(client: Option<TwitchHelixClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BroadcasterSource for HelixBroadcasterSource {
    async fn current_broadcaster(&self) -> Result<BroadcasterInfo, Error> {
        let client = self.client.as_ref().ok_or_else(|| {
            Error::BroadcasterUnavailable("no Twitch client id / access token configured".into())
        })?;

        match fetch_token_user(client).await {
            Ok(Some(user)) => Ok(BroadcasterInfo {
                user_id: Some(user.id),
                user_name: if user.display_name.is_empty() {
                    user.login.clone()
                } else {
                    user.display_name
                },
                user_login: user.login,
            }),
            Ok(None) => Err(Error::BroadcasterUnavailable(
                "Helix returned no user for the access token".into(),
            )),
            Err(e @ Error::Transport { .. }) | Err(e @ Error::InvalidUri(_)) => Err(e),
            Err(e) => Err(Error::BroadcasterUnavailable(e.to_string())),
        }
    }
}
