//! Key-value storage port
//!
//! This port abstracts the string-to-string stores the onboarding engine
//! persists into. It plays the role of the browser's `localStorage` (durable)
//! and `sessionStorage` (process lifetime); the JSON layer lives above it in
//! the application crate.

use async_trait::async_trait;

use crate::ports::errors::StorageError;

/// Raw key-value store.
///
/// Values are opaque strings. Implementations decide durability; a failed
/// `set` must leave the previous value in place.
#[async_trait]
pub trait KeyValueStorePort: Send + Sync {
    /// Read a value, `None` when the key is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write a value, replacing any previous one.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove a key. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Remove every key of this store.
    async fn clear(&self) -> Result<(), StorageError>;

    /// List the keys currently stored, in ascending order.
    async fn keys(&self) -> Result<Vec<String>, StorageError>;
}

#[cfg(test)]
mockall::mock! {
    pub KeyValueStore {}

    #[async_trait]
    impl KeyValueStorePort for KeyValueStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
        async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
        async fn remove(&self, key: &str) -> Result<(), StorageError>;
        async fn clear(&self) -> Result<(), StorageError>;
        async fn keys(&self) -> Result<Vec<String>, StorageError>;
    }
}
