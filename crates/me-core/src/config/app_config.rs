//! Application configuration domain model

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::onboarding::UiVersion;

/// Application configuration
///
/// Every section is optional in the TOML file; missing values fall back to
/// the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root directory for local storage and logs. Empty means the platform default.
    pub data_dir: PathBuf,

    /// Key-value storage settings
    pub storage: StorageConfig,

    /// Event bus settings
    pub events: EventsConfig,

    /// Onboarding settings
    pub onboarding: OnboardingSettings,

    /// Sample recommendation settings
    pub recommendations: RecommendationConfig,
}

/// Which backend plays the role of durable local storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,

    /// File name of the local store inside `data_dir`
    pub file_name: String,

    /// Optional byte quota, mimicking the browser storage limit
    pub quota_bytes: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventsConfig {
    /// Number of events kept in the bus history
    pub history_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnboardingSettings {
    pub default_ui_version: UiVersion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    pub default_limit: usize,
}

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;
pub const DEFAULT_STORE_FILE_NAME: &str = "local_storage.json";

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::new(),
            storage: StorageConfig::default(),
            events: EventsConfig::default(),
            onboarding: OnboardingSettings::default(),
            recommendations: RecommendationConfig::default(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            file_name: DEFAULT_STORE_FILE_NAME.to_string(),
            quota_bytes: None,
        }
    }
}

impl Default for EventsConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl Default for OnboardingSettings {
    fn default() -> Self {
        Self {
            default_ui_version: UiVersion::V2,
        }
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self { default_limit: 5 }
    }
}

impl AppConfig {
    /// Parse a TOML document into a config. No validation is performed.
    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_yields_defaults() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            [storage]
            backend = "memory"

            [onboarding]
            default_ui_version = "images-mvp"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert_eq!(config.storage.file_name, DEFAULT_STORE_FILE_NAME);
        assert_eq!(config.onboarding.default_ui_version, UiVersion::ImagesMvp);
        assert_eq!(config.events.history_capacity, DEFAULT_HISTORY_CAPACITY);
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let result = AppConfig::from_toml_str(
            r#"
            [storage]
            backend = "indexeddb"
            "#,
        );
        assert!(result.is_err());
    }
}
