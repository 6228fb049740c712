//! Onboarding domain models
//!
//! Tutorials, per-user progress, lifecycle events and the static per-UI-version
//! configuration that drives the onboarding engine.

pub mod catalog;
pub mod event;
pub mod keys;
pub mod progress;
pub mod skip_policy;
pub mod state;
pub mod tutorial;
mod ui_version;

pub use catalog::{get_config, get_tutorial_by_id, UiOnboardingConfig};
pub use event::{OnboardingEvent, OnboardingEventKind};
pub use progress::{OnboardingProgress, PersistedProgress, PersistedTutorialState};
pub use skip_policy::{SkipDecision, SkipPolicy};
pub use state::{TutorialState, TutorialStatus};
pub use tutorial::{RequiredAction, StepDefinition, StepPosition, TutorialDefinition};
pub use ui_version::{UiVersion, UnknownUiVersion};
