//! # Dependency Injection / 依赖注入模块
//!
//! Builds the concrete stores, clock and event bus from [`AppConfig`] and
//! hands them to the use cases. Assembly only, no decisions.
//!
//! > This is the only place allowed to depend on me-infra and me-app together.

use std::path::PathBuf;
use std::sync::Arc;

use me_app::{EventBus, OnboardingEngine, OnboardingEngineDeps, RecommendSamples};
use me_core::app_dirs::AppDirs;
use me_core::config::{AppConfig, StorageBackend};
use me_core::ids::UserId;
use me_core::onboarding::UiVersion;
use me_core::ports::{AppDirsPort, ClockPort, KeyValueStorePort};
use me_infra::{DirsAppDirsAdapter, FileKeyValueStore, InMemoryKeyValueStore, SystemClock};
use tracing::debug;

/// Result type for wiring operations
pub type WiringResult<T> = Result<T, WiringError>;

/// Errors during dependency injection
/// 依赖注入错误
#[derive(Debug, thiserror::Error)]
pub enum WiringError {
    #[error("Data directory resolution failed: {0}")]
    DataDir(String),
}

/// Resolve the data directory: the configured one, or the platform
/// local-data directory when the config leaves it empty.
pub fn resolve_data_dir(config: &AppConfig) -> WiringResult<PathBuf> {
    if !config.data_dir.as_os_str().is_empty() {
        return Ok(config.data_dir.clone());
    }
    DirsAppDirsAdapter::new()
        .get_app_dirs()
        .map(|dirs| dirs.app_data_root)
        .map_err(|e| WiringError::DataDir(e.to_string()))
}

/// Everything a command needs, wired once per process.
pub struct AppRuntime {
    pub config: AppConfig,
    pub data_dir: PathBuf,
    pub local: Arc<dyn KeyValueStorePort>,
    pub session: Arc<dyn KeyValueStorePort>,
    pub clock: Arc<dyn ClockPort>,
    pub events: EventBus,
}

pub fn wire_dependencies(config: AppConfig) -> WiringResult<AppRuntime> {
    let data_dir = resolve_data_dir(&config)?;

    let local: Arc<dyn KeyValueStorePort> = match config.storage.backend {
        StorageBackend::File => {
            let path = data_dir.join(&config.storage.file_name);
            debug!(path = %path.display(), "Using file-backed local storage");
            Arc::new(FileKeyValueStore::new(path).with_quota(config.storage.quota_bytes))
        }
        StorageBackend::Memory => {
            debug!("Using in-memory local storage");
            Arc::new(InMemoryKeyValueStore::with_quota(config.storage.quota_bytes))
        }
    };

    let events = EventBus::with_history_capacity(config.events.history_capacity);

    Ok(AppRuntime {
        data_dir,
        local,
        session: Arc::new(InMemoryKeyValueStore::new()),
        clock: Arc::new(SystemClock),
        events,
        config,
    })
}

impl AppRuntime {
    pub fn logs_dir(&self) -> PathBuf {
        AppDirs {
            app_data_root: self.data_dir.clone(),
        }
        .logs_dir()
    }

    pub async fn onboarding_engine(&self, user_id: UserId, ui_version: UiVersion) -> OnboardingEngine {
        OnboardingEngine::load(
            user_id,
            ui_version,
            OnboardingEngineDeps {
                local: self.local.clone(),
                session: self.session.clone(),
                clock: self.clock.clone(),
                events: self.events.clone(),
            },
        )
        .await
    }

    pub fn recommend_samples(&self) -> RecommendSamples {
        RecommendSamples::new(self.local.clone())
    }
}
