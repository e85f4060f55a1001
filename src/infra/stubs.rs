//! In-memory adapters used by unit tests.

use anyhow::Result;
use async_trait::async_trait;

use crate::{
    infra::{config::AppConfig, contracts::ConfigAdapter},
    usecases::contracts::{SecretKey, SecretStore, SecretStoreError},
};

#[derive(Debug, Clone, Default)]
pub struct StubConfigAdapter;

impl ConfigAdapter for StubConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        Ok(AppConfig::default())
    }
}

/// Secret store that keeps everything in memory and journals every call.
#[derive(Debug, Default)]
pub struct InMemorySecretStore {
    entries: std::sync::Mutex<std::collections::BTreeMap<SecretKey, String>>,
    journal: std::sync::Mutex<Vec<String>>,
}

impl InMemorySecretStore {
    pub fn with_credentials(token: &str, username: &str) -> Self {
        let store = Self::default();
        {
            let mut entries = store.entries.lock().expect("entries lock");
            entries.insert(SecretKey::Token, token.to_owned());
            entries.insert(SecretKey::Username, username.to_owned());
        }
        store
    }

    pub fn value(&self, key: SecretKey) -> Option<String> {
        self.entries.lock().expect("entries lock").get(&key).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().expect("entries lock").is_empty()
    }

    pub fn journal(&self) -> Vec<String> {
        self.journal.lock().expect("journal lock").clone()
    }

    fn record(&self, entry: String) {
        self.journal.lock().expect("journal lock").push(entry);
    }
}

#[async_trait]
impl SecretStore for InMemorySecretStore {
    async fn get(&self, key: SecretKey) -> Result<Option<String>, SecretStoreError> {
        self.record(format!("get:{}", key.as_str()));
        Ok(self.value(key))
    }

    async fn set(&self, key: SecretKey, value: &str) -> Result<(), SecretStoreError> {
        self.record(format!("set:{}", key.as_str()));
        self.entries
            .lock()
            .expect("entries lock")
            .insert(key, value.to_owned());
        Ok(())
    }

    async fn delete(&self, key: SecretKey) -> Result<(), SecretStoreError> {
        self.record(format!("delete:{}", key.as_str()));
        self.entries.lock().expect("entries lock").remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_config_returns_defaults() {
        let adapter = StubConfigAdapter;
        let config = adapter.load().expect("stub config must load");

        assert_eq!(config, AppConfig::default());
    }

    #[tokio::test]
    async fn in_memory_store_journals_calls_in_order() {
        let store = InMemorySecretStore::default();

        store.set(SecretKey::Token, "t").await.expect("set");
        store.delete(SecretKey::Token).await.expect("delete");

        assert_eq!(store.journal(), vec!["set:token", "delete:token"]);
        assert!(store.is_empty());
    }
}
