// File: autolive-common/src/models/config.rs

/// Setting names in the config store.
pub mod keys {
    pub const IDENTIFIER: &str = "identifier";
    pub const APP_PASSWORD: &str = "app-password";
    pub const DEFAULT_DURATION: &str = "default-live-duration-minutes";

    pub const BSKY_SERVICE: &str = "bsky-service";
    pub const TWITCH_CLIENT_ID: &str = "twitch-client-id";
    pub const TWITCH_ACCESS_TOKEN: &str = "twitch-access-token";
    pub const BROADCASTER: &str = "broadcaster";
    pub const STATUS_DESCRIPTION: &str = "status-description";

    /// Keys the bootstrap seeds and the announcer refuses to run without.
    pub const REQUIRED: [&str; 3] = [IDENTIFIER, APP_PASSWORD, DEFAULT_DURATION];

    /// Keys whose values are never echoed back in listings.
    pub const SECRET: [&str; 2] = [APP_PASSWORD, TWITCH_ACCESS_TOKEN];
}

/// Placeholder values written by the bootstrap. A stored value equal to its
/// sentinel counts as "not configured".
pub mod sentinels {
    pub const IDENTIFIER: &str = "BSKY_USERNAME_HERE";
    pub const APP_PASSWORD: &str = "BSKY_APP_PASS_HERE";
    pub const DEFAULT_DURATION: u32 = 1;
}

pub const DEFAULT_BSKY_SERVICE: &str = "https://bsky.social";

/// Sentinel for one of the required keys, as stored text.
pub fn sentinel_for(key: &str) -> Option<String> {
    match key {
        keys::IDENTIFIER => Some(sentinels::IDENTIFIER.to_string()),
        keys::APP_PASSWORD => Some(sentinels::APP_PASSWORD.to_string()),
        keys::DEFAULT_DURATION => Some(sentinels::DEFAULT_DURATION.to_string()),
        _ => None,
    }
}

pub fn is_secret(key: &str) -> bool {
    keys::SECRET.contains(&key)
}
