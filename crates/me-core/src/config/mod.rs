pub mod app_config;

pub use app_config::{
    AppConfig, EventsConfig, OnboardingSettings, RecommendationConfig, StorageBackend,
    StorageConfig,
};
