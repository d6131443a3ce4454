//! Key-value backends holding whole JSON documents under string keys.

use super::utils::ensure_dir;
use crate::api::StoreError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;

/// Minimal get/put/delete surface of an edge key-value namespace.
#[async_trait]
pub trait KvBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn put(&self, key: &str, value: String) -> Result<(), StoreError>;
    async fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local backend. Contents vanish with the process.
#[derive(Default)]
pub struct MemoryKv {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvBackend for MemoryKv {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside a data directory.
pub struct FileKv {
    dir: PathBuf,
}

impl FileKv {
    /// Opens (and creates when missing) the data directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        ensure_dir(&dir).map_err(StoreError::Backend)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::Backend(format!("Invalid key '{}'", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl KvBackend for FileKv {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        let dir = self.dir.clone();
        // Temp file in the same directory so the rename stays atomic.
        tokio::task::spawn_blocking(move || -> Result<(), StoreError> {
            let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
            tmp.write_all(value.as_bytes())?;
            tmp.as_file().sync_all()?;
            tmp.persist(&path).map_err(|e| StoreError::Io(e.error))?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600)).ok();
            }
            Ok(())
        })
        .await
        .map_err(|e| StoreError::Backend(format!("Write task failed: {}", e)))?
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
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
    async fn memory_kv_round_trip() {
        let kv = MemoryKv::new();
        assert_eq!(kv.get("prompts").await.unwrap(), None);
        kv.put("prompts", "[]".into()).await.unwrap();
        assert_eq!(kv.get("prompts").await.unwrap().as_deref(), Some("[]"));
        kv.delete("prompts").await.unwrap();
        assert_eq!(kv.get("prompts").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_kv_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::open(dir.path().join("data")).unwrap();
        kv.put("categories", r#"[{"id":"1"}]"#.into()).await.unwrap();
        kv.put("categories", r#"[{"id":"2"}]"#.into()).await.unwrap();

        let reopened = FileKv::open(dir.path().join("data")).unwrap();
        assert_eq!(
            reopened.get("categories").await.unwrap().as_deref(),
            Some(r#"[{"id":"2"}]"#)
        );
        reopened.delete("categories").await.unwrap();
        reopened.delete("categories").await.unwrap();
        assert_eq!(reopened.get("categories").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_kv_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let kv = FileKv::open(dir.path()).unwrap();
        assert!(kv.get("../etc/passwd").await.is_err());
        assert!(kv.put("", "x".into()).await.is_err());
    }
}
