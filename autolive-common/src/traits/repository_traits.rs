// File: autolive-common/src/traits/repository_traits.rs

use async_trait::async_trait;

use crate::Error;

/// Persistent key/value settings shared by every run of the announcer.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn get_value(&self, config_key: &str) -> Result<Option<String>, Error>;
    async fn set_value(&self, config_key: &str, config_value: &str) -> Result<(), Error>;
    async fn delete_value(&self, config_key: &str) -> Result<(), Error>;
    async fn list_all(&self) -> Result<Vec<(String, String)>, Error>;

    async fn list_names(&self) -> Result<Vec<String>, Error> {
        Ok(self.list_all().await?.into_iter().map(|(k, _)| k).collect())
    }
}
