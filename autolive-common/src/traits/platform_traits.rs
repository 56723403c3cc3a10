// File: autolive-common/src/traits/platform_traits.rs

use async_trait::async_trait;

use crate::Error;
use crate::models::BroadcasterInfo;

/// Answers "who is the broadcaster right now?".
///
/// Implementations return `Error::BroadcasterUnavailable` when nobody is
/// authenticated as the channel owner.
#[async_trait]
pub trait BroadcasterSource: Send + Sync {
    async fn current_broadcaster(&self) -> Result<BroadcasterInfo, Error>;
}
