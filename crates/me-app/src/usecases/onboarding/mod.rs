//! Onboarding use cases
//!
//! The engine owns tutorial state; the other use cases sit on top of it or
//! beside it on the same stores.

pub mod engine;
pub mod guarded_skip;
pub mod preferences;

pub use engine::{OnboardingEngine, OnboardingEngineDeps, PersistOutcome};
pub use guarded_skip::{SkipStepError, SkipStepWithPolicy};
pub use preferences::OnboardingPreferences;
