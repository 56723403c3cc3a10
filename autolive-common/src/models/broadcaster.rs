use serde::{Deserialize, Serialize};

pub const TWITCH_CHANNEL_BASE: &str = "https://www.twitch.tv/";

/// Who is currently authenticated as the stream's owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BroadcasterInfo {
    pub user_id: Option<String>,
    /// URL-safe login, e.g. `alice`.
    pub user_login: String,
    /// Display name, e.g. `Alice`. Falls back to the login when unknown.
    pub user_name: String,
}

impl BroadcasterInfo {
    /// A broadcaster known only by login (no Helix lookup performed).
    pub fn from_login(login: impl Into<String>) -> Self {
        let login = login.into();
        Self {
            user_id: None,
            user_name: login.clone(),
            user_login: login,
        }
    }

    pub fn channel_url(&self) -> String {
        format!("{TWITCH_CHANNEL_BASE}{}", self.user_login)
    }
}
