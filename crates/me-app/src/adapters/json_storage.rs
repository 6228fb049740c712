//! JSON storage adapter - typed values over a raw key-value store
//!
//! 在字符串键值存储之上提供 JSON 编解码。读取失败只记录日志并返回 `None`，
//! 写入失败则返回 `StorageError` 交由调用方处理。

use std::sync::Arc;

use me_core::ports::{KeyValueStorePort, StorageError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

#[derive(Clone)]
pub struct JsonStorage {
    store: Arc<dyn KeyValueStorePort>,
}

impl JsonStorage {
    pub fn new(store: Arc<dyn KeyValueStorePort>) -> Self {
        Self { store }
    }

    /// Read and decode a value. Missing, unreadable and malformed entries all
    /// come back as `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get_raw(key).await?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "Discarding malformed stored value");
                None
            }
        }
    }

    /// Read the undecoded string.
    pub async fn get_raw(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Failed to read from storage");
                None
            }
        }
    }

    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let encoded =
            serde_json::to_string(value).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.set_raw(key, &encoded).await
    }

    pub async fn set_raw(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.store.set(key, value).await
    }

    pub async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.store.remove(key).await
    }

    pub async fn clear(&self) -> Result<(), StorageError> {
        self.store.clear().await
    }
}
