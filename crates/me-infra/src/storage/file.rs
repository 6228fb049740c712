use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use me_core::ports::{KeyValueStorePort, StorageError};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::check_quota;

/// Durable store kept as a single JSON object file, standing in for local
/// storage.
///
/// The file is read lazily on first access and cached; every write goes
/// through a temp file and a rename, so the file on disk always holds either
/// the previous or the new contents. An unreadable file is moved aside to
/// `<file>.corrupt` and the store starts empty.
pub struct FileKeyValueStore {
    path: PathBuf,
    quota_bytes: Option<u64>,
    cache: Mutex<Option<BTreeMap<String, String>>>,
}

impl FileKeyValueStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            quota_bytes: None,
            cache: Mutex::new(None),
        }
    }

    pub fn with_quota(mut self, quota_bytes: Option<u64>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn sibling(&self, suffix: &str) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(suffix);
        PathBuf::from(name)
    }

    async fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Storage file not found, starting empty");
                return Ok(BTreeMap::new());
            }
            Err(e) => {
                return Err(StorageError::Io(format!(
                    "read {} failed: {e}",
                    self.path.display()
                )))
            }
        };

        match serde_json::from_str(&content) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                let aside = self.sibling(".corrupt");
                warn!(
                    path = %self.path.display(),
                    moved_to = %aside.display(),
                    error = %e,
                    "Storage file is corrupt, starting empty"
                );
                if let Err(e) = fs::rename(&self.path, &aside).await {
                    warn!(error = %e, "Failed to move corrupt storage file aside");
                }
                Ok(BTreeMap::new())
            }
        }
    }

    async fn atomic_write(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir).await.map_err(|e| {
                StorageError::Io(format!("create storage dir {} failed: {e}", dir.display()))
            })?;
        }

        let content = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;

        let tmp_path = self.sibling(".tmp");
        fs::write(&tmp_path, content).await.map_err(|e| {
            StorageError::Io(format!("write temp file {} failed: {e}", tmp_path.display()))
        })?;

        // TODO: rename over an existing file is not atomic on every Windows filesystem.
        fs::rename(&tmp_path, &self.path).await.map_err(|e| {
            StorageError::Io(format!(
                "rename {} -> {} failed: {e}",
                tmp_path.display(),
                self.path.display()
            ))
        })
    }

    /// Apply `change` to a copy of the entries, write it, then commit it to
    /// the cache. The cache is untouched when the write fails.
    async fn update<F>(&self, change: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> Result<bool, StorageError>,
    {
        let mut cache = self.cache.lock().await;
        let mut entries = match cache.take() {
            Some(entries) => entries,
            None => self.load().await?,
        };

        let mut next = entries.clone();
        let changed = match change(&mut next) {
            Ok(changed) => changed,
            Err(e) => {
                *cache = Some(entries);
                return Err(e);
            }
        };

        if changed {
            match self.atomic_write(&next).await {
                Ok(()) => entries = next,
                Err(e) => {
                    *cache = Some(entries);
                    return Err(e);
                }
            }
        }

        *cache = Some(entries);
        Ok(())
    }
}

#[async_trait]
impl KeyValueStorePort for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            *cache = Some(self.load().await?);
        }
        Ok(cache.as_ref().and_then(|entries| entries.get(key).cloned()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let quota_bytes = self.quota_bytes;
        self.update(|entries| {
            check_quota(entries, key, value, quota_bytes)?;
            entries.insert(key.to_string(), value.to_string());
            Ok(true)
        })
        .await
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| Ok(entries.remove(key).is_some())).await
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.update(|entries| {
            let changed = !entries.is_empty();
            entries.clear();
            Ok(changed)
        })
        .await
    }

    async fn keys(&self) -> Result<Vec<String>, StorageError> {
        let mut cache = self.cache.lock().await;
        if cache.is_none() {
            *cache = Some(self.load().await?);
        }
        Ok(cache
            .as_ref()
            .map(|entries| entries.keys().cloned().collect())
            .unwrap_or_default())
    }
}
