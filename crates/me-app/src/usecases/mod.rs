//! Business logic use cases
//!
//! onboarding: tutorial engine + preferences + policy-guarded skip
//! samples:    sample file recommendations

pub mod onboarding;
pub mod samples;

#[cfg(test)]
pub(crate) mod test_support;

pub use onboarding::{
    OnboardingEngine, OnboardingEngineDeps, OnboardingPreferences, PersistOutcome, SkipStepError,
    SkipStepWithPolicy,
};
pub use samples::RecommendSamples;
