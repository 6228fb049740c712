//! Key-value store adapters.
//!
//! - `InMemoryKeyValueStore`: process lifetime (session storage)
//! - `FileKeyValueStore`: one JSON object file on disk (local storage)

mod file;
mod memory;

use std::collections::BTreeMap;

use me_core::ports::StorageError;

pub use file::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;

/// Bytes used by every key and value of a store.
fn usage_bytes(entries: &BTreeMap<String, String>) -> u64 {
    entries
        .iter()
        .map(|(key, value)| (key.len() + value.len()) as u64)
        .sum()
}

/// Fails when replacing `key` with `value` would push usage past `quota_bytes`.
fn check_quota(
    entries: &BTreeMap<String, String>,
    key: &str,
    value: &str,
    quota_bytes: Option<u64>,
) -> Result<(), StorageError> {
    let Some(limit_bytes) = quota_bytes else {
        return Ok(());
    };

    let replaced = entries
        .get(key)
        .map_or(0, |old| (key.len() + old.len()) as u64);
    let projected = usage_bytes(entries) - replaced + (key.len() + value.len()) as u64;
    if projected > limit_bytes {
        return Err(StorageError::QuotaExceeded {
            key: key.to_string(),
            limit_bytes,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_accounts_for_replaced_value() {
        let mut entries = BTreeMap::new();
        entries.insert("k".to_string(), "12345".to_string());

        // 1 + 5 bytes used; replacing with 9 bytes of value needs 10.
        assert!(check_quota(&entries, "k", "123456789", Some(10)).is_ok());
        assert!(check_quota(&entries, "other", "123", Some(10)).is_err());
        assert!(check_quota(&entries, "other", "123", None).is_ok());
    }
}
