//! File-backed [`SecretStore`].

use std::{
    collections::BTreeMap,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::{fs, sync::Mutex};

use crate::usecases::contracts::{SecretKey, SecretStore, SecretStoreError};

const SECRETS_FILE_MODE: u32 = 0o600;

/// Keeps secrets as a flat TOML table in a single owner-only file.
#[derive(Debug)]
pub struct FileSecretStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSecretStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_table(&self) -> Result<BTreeMap<String, String>, SecretStoreError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(source) if source.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => return Err(self.io_error(source)),
        };

        toml::from_str(&raw).map_err(|error| SecretStoreError::Corrupt {
            path: self.path.clone(),
            details: error.to_string(),
        })
    }

    async fn write_table(&self, table: &BTreeMap<String, String>) -> Result<(), SecretStoreError> {
        if table.is_empty() {
            return match fs::remove_file(&self.path).await {
                Ok(()) => Ok(()),
                Err(source) if source.kind() == ErrorKind::NotFound => Ok(()),
                Err(source) => Err(self.io_error(source)),
            };
        }

        let raw = toml::to_string(table).map_err(|error| SecretStoreError::Corrupt {
            path: self.path.clone(),
            details: error.to_string(),
        })?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, raw)
            .await
            .map_err(|source| self.io_error(source))?;
        restrict_permissions(&tmp_path)
            .await
            .map_err(|source| self.io_error(source))?;
        fs::rename(&tmp_path, &self.path)
            .await
            .map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> SecretStoreError {
        SecretStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl SecretStore for FileSecretStore {
    async fn get(&self, key: SecretKey) -> Result<Option<String>, SecretStoreError> {
        let mut table = self.read_table().await?;
        Ok(table.remove(key.as_str()))
    }

    async fn set(&self, key: SecretKey, value: &str) -> Result<(), SecretStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut table = self.read_table().await?;
        table.insert(key.as_str().to_owned(), value.to_owned());
        self.write_table(&table).await
    }

    async fn delete(&self, key: SecretKey) -> Result<(), SecretStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut table = self.read_table().await?;
        if table.remove(key.as_str()).is_none() {
            return Ok(());
        }
        self.write_table(&table).await
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, std::fs::Permissions::from_mode(SECRETS_FILE_MODE)).await
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    let _ = SECRETS_FILE_MODE;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_in(dir: &tempfile::TempDir) -> FileSecretStore {
        FileSecretStore::new(dir.path().join("secrets.toml"))
    }

    #[tokio::test]
    async fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        assert_eq!(store.get(SecretKey::Token).await.expect("get"), None);
    }

    #[tokio::test]
    async fn set_then_get_round_trips_each_key() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);

        store.set(SecretKey::Token, "tok-1").await.expect("set token");
        store.set(SecretKey::Username, "bucky").await.expect("set username");

        assert_eq!(
            store.get(SecretKey::Token).await.expect("get"),
            Some("tok-1".to_owned())
        );
        assert_eq!(
            store.get(SecretKey::Username).await.expect("get"),
            Some("bucky".to_owned())
        );
    }

    #[tokio::test]
    async fn deleting_last_key_removes_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store.set(SecretKey::Token, "tok-1").await.expect("set");

        store.delete(SecretKey::Token).await.expect("delete");
        store.delete(SecretKey::Token).await.expect("second delete is a no-op");

        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        std::fs::write(store.path(), "token = [").expect("write fixture");

        let err = store.get(SecretKey::Token).await.expect_err("must fail");

        assert!(matches!(err, SecretStoreError::Corrupt { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn secrets_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let store = store_in(&dir);
        store.set(SecretKey::Token, "tok-1").await.expect("set");

        let mode = std::fs::metadata(store.path())
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, SECRETS_FILE_MODE);
    }
}
