// File: autolive-core/src/services/live_announcer.rs

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, error, info};

use autolive_common::models::{BroadcasterInfo, LiveStatusRecord, Session};
use autolive_common::traits::BroadcasterSource;
use crate::Error;
use crate::config::{AutoLiveConfig, LiveSettings};
use crate::http::HttpClient;
use crate::platforms::bluesky::BlueskyClient;
use crate::platforms::bluesky::requests::session::create_session;
use crate::platforms::bluesky::requests::status::put_status_record;
use crate::platforms::twitch::{HelixBroadcasterSource, StaticBroadcaster, TwitchHelixClient};

/// What a successful run published.
#[derive(Debug, Clone)]
pub struct Announcement {
    pub did: String,
    pub record: LiveStatusRecord,
    pub response_body: String,
}

/// Logs into Bluesky and sets the account's status to "live on Twitch".
///
/// Every run creates a fresh session; nothing is cached between runs and
/// each HTTP call is attempted exactly once.
pub struct LiveAnnouncer {
    config: AutoLiveConfig,
    bluesky: BlueskyClient,
    broadcaster: Arc<dyn BroadcasterSource>,
}

impl LiveAnnouncer {
    pub fn new(
        config: AutoLiveConfig,
        http: Arc<dyn HttpClient>,
        broadcaster: Arc<dyn BroadcasterSource>,
    ) -> Self {
        let bluesky = BlueskyClient::new(http, &config.bsky_service);
        Self {
            config,
            bluesky,
            broadcaster,
        }
    }

    /// Picks the broadcaster source from the settings: a fixed login wins,
    /// otherwise the owner of the configured Helix token.
    pub fn from_config(config: AutoLiveConfig, http: Arc<dyn HttpClient>) -> Self {
        let broadcaster: Arc<dyn BroadcasterSource> = match &config.broadcaster {
            Some(login) => Arc::new(StaticBroadcaster::new(login.clone())),
            None => {
                let helix = match (&config.twitch_client_id, &config.twitch_access_token) {
                    (Some(client_id), Some(token)) => {
                        Some(TwitchHelixClient::new(http.clone(), token, client_id))
                    }
                    _ => None,
                };
                Arc::new(HelixBroadcasterSource::new(helix))
            }
        };
        Self::new(config, http, broadcaster)
    }

    /// Runs once and reports success. Every failure is logged here.
    pub async fn execute(&self) -> bool {
        match self.try_execute().await {
            Ok(announcement) => {
                debug!("{}", announcement.response_body);
                info!(
                    "Live status posted for {} => {}",
                    announcement.did, announcement.record.embed.external.uri
                );
                true
            }
            Err(e) => {
                log_failure(&e);
                false
            }
        }
    }

    pub async fn try_execute(&self) -> Result<Announcement, Error> {
        let started = Utc::now();

        // Nothing goes on the wire until every required key is set.
        let settings = self.config.validate()?;

        let session = create_session(&self.bluesky, &settings.credentials).await?;
        let broadcaster = self.broadcaster.current_broadcaster().await?;
        let record = self.build_record(&broadcaster, &settings, started);

        self.publish(&session, record).await
    }

    pub fn build_record(
        &self,
        broadcaster: &BroadcasterInfo,
        settings: &LiveSettings,
        now: DateTime<Utc>,
    ) -> LiveStatusRecord {
        LiveStatusRecord::for_twitch(
            broadcaster,
            settings.duration_minutes,
            &self.config.status_description,
            now,
        )
    }

    async fn publish(
        &self,
        session: &Session,
        record: LiveStatusRecord,
    ) -> Result<Announcement, Error> {
        let response_body = put_status_record(&self.bluesky, session, record.clone()).await?;
        Ok(Announcement {
            did: session.did.clone(),
            record,
            response_body,
        })
    }
}

fn log_failure(e: &Error) {
    match e {
        Error::ConfigurationMissing(keys) => {
            for key in keys {
                error!("Set the config value \"{}\" before running this action.", key);
            }
            error!("Exiting because required settings are not configured.");
        }
        Error::InvalidUri(detail) => {
            error!(
                "There is an issue with the request URI {}. Check the configured service URL.",
                detail
            );
        }
        Error::Transport { url, source } => {
            error!(
                "There was an issue contacting [{}]. Check connection settings and Bluesky status.",
                url
            );
            debug!("{:?}", source);
        }
        Error::UnexpectedResponse { url, reason, body } => {
            error!("The data returned by [{}] was not as expected: {}", url, reason);
            debug!("{}", body);
        }
        Error::Xrpc {
            url,
            status,
            error,
            message,
        } => {
            error!(
                "[{}] rejected the request: HTTP {} {}: {}",
                url, status, error, message
            );
        }
        Error::BroadcasterUnavailable(reason) => {
            error!(
                "You must be authenticated as the Twitch broadcaster to use this action ({}).",
                reason
            );
        }
        other => {
            error!("An unhandled error has occurred: {}", other);
            debug!("{:?}", other);
        }
    }
}
