use thiserror::Error;

/// Key-value storage errors.
///
/// 键值存储错误类型。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Writing the value would exceed the store's byte quota.
    ///
    /// 写入会超出存储配额。
    #[error("storage quota exceeded while writing '{key}' (limit {limit_bytes} bytes)")]
    QuotaExceeded { key: String, limit_bytes: u64 },

    /// Storage is disabled or cannot be reached.
    ///
    /// 存储不可用。
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Underlying I/O failed.
    #[error("storage io error: {0}")]
    Io(String),

    /// Stored data is corrupt or invalid.
    ///
    /// 存储数据损坏或无效。
    #[error("storage data corrupt: {0}")]
    Corrupt(String),

    /// Value could not be encoded for storage.
    #[error("storage serialization failed: {0}")]
    Serialization(String),
}

#[derive(Debug, Error)]
pub enum AppDirsError {
    #[error("system data-local directory unavailable")]
    DataLocalDirUnavailable,
}
