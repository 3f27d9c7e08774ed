use super::KvStore;
use crate::Result;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Key-value store backed by one JSON file per key under a root directory.
pub struct FileKvStore {
    root: PathBuf,
}

impl FileKvStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }
}

#[async_trait]
impl KvStore for FileKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKvStore::new(dir.path()).unwrap();

        assert!(store.get("bot_config").await.unwrap().is_none());

        store.set("bot_config", "[{\"type\":\"outreach\"}]").await.unwrap();
        assert_eq!(
            store.get("bot_config").await.unwrap().as_deref(),
            Some("[{\"type\":\"outreach\"}]")
        );
        assert!(dir.path().join("bot_config.json").exists());

        store.remove("bot_config").await.unwrap();
        assert!(store.get("bot_config").await.unwrap().is_none());

        // Removing a missing key is not an error.
        store.remove("bot_config").await.unwrap();
    }

    #[tokio::test]
    async fn test_values_survive_a_new_store_on_the_same_root() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileKvStore::new(dir.path()).unwrap();
            store.set("history", "[]").await.unwrap();
        }

        let reopened = FileKvStore::new(dir.path()).unwrap();
        assert_eq!(reopened.get("history").await.unwrap().as_deref(), Some("[]"));
    }
}
