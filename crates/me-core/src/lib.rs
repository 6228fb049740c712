//! # me-core
//!
//! Core domain models and business logic for MetaExtract onboarding.
//!
//! This crate contains pure business logic without any infrastructure dependencies.

pub mod app_dirs;
pub mod config;
pub mod ids;
pub mod onboarding;
pub mod ports;
pub mod samples;

// Re-export commonly used types at the crate root
pub use config::AppConfig;
pub use ids::{FeatureId, SampleId, StepId, TutorialId, UserId};
pub use onboarding::{
    OnboardingEvent, OnboardingEventKind, OnboardingProgress, TutorialDefinition, TutorialState,
    TutorialStatus, UiVersion,
};
pub use samples::{SampleFile, UserProfile};
