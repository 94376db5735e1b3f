//! Key-value stores backing the address cache

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use crate::error::Error;

/// String-keyed persistent storage
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    async fn set(&self, key: &str, value: &str) -> Result<(), Error>;

    async fn remove(&self, key: &str) -> Result<(), Error>;

    async fn clear(&self) -> Result<(), Error>;
}

/// In-process store; contents are lost on drop
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        Ok(self.entries.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        self.entries
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), Error> {
        self.entries.lock().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> Result<(), Error> {
        self.entries.lock().await.clear();
        Ok(())
    }
}

/// All entries in one JSON object file, rewritten on every change
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, Error> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| Error::storage(format!("{}: {}", self.path.display(), e))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Current entries for a write; a corrupt file is replaced rather than kept
    async fn load_for_write(&self) -> Result<BTreeMap<String, String>, Error> {
        match self.load().await {
            Err(Error::Storage(message)) => {
                log::warn!("discarding unreadable store {}", message);
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    async fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), Error> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec_pretty(entries)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load_for_write().await?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<(), Error> {
        let _guard = self.lock.lock().await;
        let mut entries = self.load_for_write().await?;
        entries.remove(key);
        self.save(&entries).await
    }

    async fn clear(&self) -> Result<(), Error> {
        let _guard = self.lock.lock().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = FileStore::new(&path);
        assert_eq!(store.get("userAddress").await.unwrap(), None);
        store.set("userAddress", r#"{"label":"Home"}"#).await.unwrap();
        store.set("other", "1").await.unwrap();
        drop(store);

        let reopened = FileStore::new(&path);
        assert_eq!(
            reopened.get("userAddress").await.unwrap(),
            Some(r#"{"label":"Home"}"#.to_string())
        );

        reopened.remove("other").await.unwrap();
        assert_eq!(reopened.get("other").await.unwrap(), None);

        reopened.clear().await.unwrap();
        assert!(!path.exists());
        assert_eq!(reopened.get("userAddress").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        tokio::fs::write(&path, b"garbage").await.unwrap();

        let store = FileStore::new(&path);
        assert!(matches!(store.get("userAddress").await, Err(Error::Storage(_))));
    }

    #[tokio::test]
    async fn test_file_store_write_replaces_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        tokio::fs::write(&path, b"{corrupt").await.unwrap();

        let store = FileStore::new(&path);
        store.set("userAddress", r#"{"label":"Home"}"#).await.unwrap();
        assert_eq!(
            store.get("userAddress").await.unwrap(),
            Some(r#"{"label":"Home"}"#.to_string())
        );

        tokio::fs::write(&path, b"{corrupt").await.unwrap();
        store.remove("userAddress").await.unwrap();
        assert_eq!(store.get("userAddress").await.unwrap(), None);
    }

    #[test]
    fn test_memory_store() {
        tokio_test::block_on(async {
            let store = MemoryStore::new();
            store.set("a", "1").await.unwrap();
            assert_eq!(store.get("a").await.unwrap(), Some("1".to_string()));
            store.remove("a").await.unwrap();
            assert_eq!(store.get("a").await.unwrap(), None);

            store.set("b", "2").await.unwrap();
            store.clear().await.unwrap();
            assert_eq!(store.get("b").await.unwrap(), None);
        });
    }
}
