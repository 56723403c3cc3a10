// File: autolive-core/src/repositories/memory.rs

use async_trait::async_trait;
use dashmap::DashMap;

use autolive_common::traits::ConfigStore;
use crate::Error;

/// Process-local settings. Nothing is written to disk.
#[derive(Default)]
pub struct InMemoryConfigStore {
    values: DashMap<String, String>,
}

impl InMemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let values = DashMap::new();
        for (k, v) in pairs {
            values.insert(k.into(), v.into());
        }
        Self { values }
    }
}

#[async_trait]
impl ConfigStore for InMemoryConfigStore {
    async fn get_value(&self, config_key: &str) -> Result<Option<String>, Error> {
        Ok(self.values.get(config_key).map(|entry| entry.value().clone()))
    }

    async fn set_value(&self, config_key: &str, config_value: &str) -> Result<(), Error> {
        self.values.insert(config_key.to_string(), config_value.to_string());
        Ok(())
    }

    async fn delete_value(&self, config_key: &str) -> Result<(), Error> {
        self.values.remove(config_key);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<(String, String)>, Error> {
        let mut out: Vec<(String, String)> = self
            .values
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        out.sort();
        Ok(out)
    }
}
