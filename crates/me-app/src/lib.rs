//! MetaExtract Onboarding Orchestration Layer
//!
//! This crate contains the event bus, the JSON storage adapter and the
//! onboarding use cases built on the core ports.

pub mod adapters;
pub mod event_bus;
pub mod usecases;

pub use event_bus::{EventBus, EventBusError, ListenerId, Subscription};
pub use usecases::{
    OnboardingEngine, OnboardingEngineDeps, OnboardingPreferences, PersistOutcome,
    RecommendSamples, SkipStepError, SkipStepWithPolicy,
};
