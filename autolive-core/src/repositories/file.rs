// File: autolive-core/src/repositories/file.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use autolive_common::traits::ConfigStore;
use crate::Error;

/// Settings persisted as a flat JSON object of string values.
///
/// The whole file is read on open and rewritten on every mutation.
pub struct FileConfigStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileConfigStore {
    /// Opens `path`, treating a missing file as an empty store.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, Error> {
        let path = path.into();
        let values = match tokio::fs::read_to_string(&path).await {
            Ok(text) if text.trim().is_empty() => BTreeMap::new(),
            Ok(text) => serde_json::from_str(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file at {}; starting empty.", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(Error::Io(e)),
        };
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// `<config dir>/autolive/settings.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("autolive").join("settings.json"))
    }

    async fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let text = serde_json::to_string_pretty(values)?;
        tokio::fs::write(&self.path, text).await?;
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FileConfigStore {
    async fn get_value(&self, config_key: &str) -> Result<Option<String>, Error> {
        Ok(self.values.lock().await.get(config_key).cloned())
    }

    async fn set_value(&self, config_key: &str, config_value: &str) -> Result<(), Error> {
        let mut values = self.values.lock().await;
        values.insert(config_key.to_string(), config_value.to_string());
        self.persist(&values).await
    }

    async fn delete_value(&self, config_key: &str) -> Result<(), Error> {
        let mut values = self.values.lock().await;
        if values.remove(config_key).is_some() {
            self.persist(&values).await?;
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<(String, String)>, Error> {
        Ok(self
            .values
            .lock()
            .await
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }
}
