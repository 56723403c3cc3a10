// File: autolive-common/src/models/status.rs

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::Error;
use crate::models::broadcaster::BroadcasterInfo;

pub const STATUS_COLLECTION: &str = "app.bsky.actor.status";
pub const STATUS_LIVE: &str = "app.bsky.actor.status#live";
pub const EMBED_EXTERNAL: &str = "app.bsky.embed.external";
pub const EMBED_EXTERNAL_LINK: &str = "app.bsky.embed.external#external";
pub const STATUS_RKEY: &str = "self";
pub const DEFAULT_DESCRIPTION: &str = "Check me out live on Twitch!";

/// `createdAt` layout: UTC, second precision, literal `Z`.
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn format_created_at(at: DateTime<Utc>) -> String {
    at.format(CREATED_AT_FORMAT).to_string()
}

pub fn parse_created_at(s: &str) -> Result<DateTime<Utc>, Error> {
    let naive = NaiveDateTime::parse_from_str(s, CREATED_AT_FORMAT)?;
    Ok(Utc.from_utc_datetime(&naive))
}

/// An `app.bsky.actor.status` record announcing a live broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStatusRecord {
    #[serde(rename = "$type")]
    pub record_type: String,
    pub status: String,
    pub created_at: String,
    pub duration_minutes: u32,
    pub embed: StatusEmbed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEmbed {
    #[serde(rename = "$type")]
    pub embed_type: String,
    pub external: ExternalLink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalLink {
    #[serde(rename = "$type")]
    pub link_type: String,
    pub uri: String,
    pub title: String,
    pub description: String,
}

impl LiveStatusRecord {
    /// Builds the record pointing at the broadcaster's Twitch channel.
    pub fn for_twitch(
        broadcaster: &BroadcasterInfo,
        duration_minutes: u32,
        description: &str,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            record_type: STATUS_COLLECTION.to_string(),
            status: STATUS_LIVE.to_string(),
            created_at: format_created_at(now),
            duration_minutes,
            embed: StatusEmbed {
                embed_type: EMBED_EXTERNAL.to_string(),
                external: ExternalLink {
                    link_type: EMBED_EXTERNAL_LINK.to_string(),
                    uri: broadcaster.channel_url(),
                    title: format!("{} - Twitch", broadcaster.user_name),
                    description: description.to_string(),
                },
            },
        }
    }
}

/// Body of `com.atproto.repo.putRecord`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PutRecordRequest {
    pub repo: String,
    pub collection: String,
    pub rkey: String,
    pub record: LiveStatusRecord,
}

impl PutRecordRequest {
    pub fn status(repo: &str, record: LiveStatusRecord) -> Self {
        Self {
            repo: repo.to_string(),
            collection: STATUS_COLLECTION.to_string(),
            rkey: STATUS_RKEY.to_string(),
            record,
        }
    }
}
