// File: autolive-core/src/config/mod.rs

use tracing::{info, warn};

use autolive_common::models::config::{keys, sentinel_for, sentinels, DEFAULT_BSKY_SERVICE};
use autolive_common::models::status::DEFAULT_DESCRIPTION;
use autolive_common::models::Credentials;
use autolive_common::traits::ConfigStore;
use crate::Error;

/// Seeds every required key that is absent with its placeholder.
///
/// Keys that already exist are left alone, whatever their value. Returns the
/// keys that were written.
pub async fn bootstrap_config(store: &dyn ConfigStore) -> Result<Vec<&'static str>, Error> {
    let existing = store.list_names().await?;
    let mut seeded = Vec::new();

    for key in keys::REQUIRED {
        if existing.iter().any(|name| name == key) {
            continue;
        }
        if let Some(placeholder) = sentinel_for(key) {
            store.set_value(key, &placeholder).await?;
            info!("Seeded config '{}' with placeholder value.", key);
            seeded.push(key);
        }
    }

    Ok(seeded)
}

/// All settings for one run, read once from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoLiveConfig {
    pub identifier: Option<String>,
    pub app_password: Option<String>,
    pub default_duration_minutes: Option<u32>,
    pub bsky_service: String,
    pub twitch_client_id: Option<String>,
    pub twitch_access_token: Option<String>,
    pub broadcaster: Option<String>,
    pub status_description: String,
}

/// What the announcer needs once validation passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveSettings {
    pub credentials: Credentials,
    pub duration_minutes: u32,
}

impl Default for AutoLiveConfig {
    fn default() -> Self {
        Self {
            identifier: None,
            app_password: None,
            default_duration_minutes: None,
            bsky_service: DEFAULT_BSKY_SERVICE.to_string(),
            twitch_client_id: None,
            twitch_access_token: None,
            broadcaster: None,
            status_description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

impl AutoLiveConfig {
    pub async fn load(store: &dyn ConfigStore) -> Result<Self, Error> {
        let identifier = configured(store.get_value(keys::IDENTIFIER).await?)
            .filter(|v| v != sentinels::IDENTIFIER);
        let app_password = configured(store.get_value(keys::APP_PASSWORD).await?)
            .filter(|v| v != sentinels::APP_PASSWORD);

        let default_duration_minutes =
            match configured(store.get_value(keys::DEFAULT_DURATION).await?) {
                Some(raw) => match raw.parse::<u32>() {
                    Ok(0) => None,
                    Ok(n) if n == sentinels::DEFAULT_DURATION => None,
                    Ok(n) => Some(n),
                    Err(_) => {
                        warn!(
                            "Config '{}' is not a whole number of minutes: '{}'",
                            keys::DEFAULT_DURATION,
                            raw
                        );
                        None
                    }
                },
                None => None,
            };

        let bsky_service = configured(store.get_value(keys::BSKY_SERVICE).await?)
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BSKY_SERVICE.to_string());

        Ok(Self {
            identifier,
            app_password,
            default_duration_minutes,
            bsky_service,
            twitch_client_id: configured(store.get_value(keys::TWITCH_CLIENT_ID).await?),
            twitch_access_token: configured(store.get_value(keys::TWITCH_ACCESS_TOKEN).await?),
            broadcaster: configured(store.get_value(keys::BROADCASTER).await?),
            status_description: configured(store.get_value(keys::STATUS_DESCRIPTION).await?)
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        })
    }

    /// Required keys that are absent or still hold their placeholder, in
    /// declaration order.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.identifier.is_none() {
            missing.push(keys::IDENTIFIER);
        }
        if self.app_password.is_none() {
            missing.push(keys::APP_PASSWORD);
        }
        if self.default_duration_minutes.is_none() {
            missing.push(keys::DEFAULT_DURATION);
        }
        missing
    }

    pub fn validate(&self) -> Result<LiveSettings, Error> {
        match (
            &self.identifier,
            &self.app_password,
            self.default_duration_minutes,
        ) {
            (Some(identifier), Some(password), Some(duration_minutes)) => Ok(LiveSettings {
                credentials: Credentials::new(identifier.clone(), password.clone()),
                duration_minutes,
            }),
            _ => Err(Error::ConfigurationMissing(
                self.missing_keys().into_iter().map(String::from).collect(),
            )),
        }
    }

    /// Overrides the stored duration for this run only.
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.default_duration_minutes = Some(minutes).filter(|m| *m > 0);
        self
    }

    pub fn with_broadcaster(mut self, login: impl Into<String>) -> Self {
        self.broadcaster = configured(Some(login.into()));
        self
    }
}

fn configured(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
