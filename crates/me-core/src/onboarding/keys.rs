//! Storage key layout shared by the engine, preferences and samples.

use crate::ids::{TutorialId, UserId};
use crate::onboarding::UiVersion;

/// Session-scoped mirror of the active tutorial.
pub const ACTIVE_TUTORIAL_KEY: &str = "active_tutorial";

/// Anonymized per-sample usage counters.
pub const SAMPLE_USAGE_KEY: &str = "sample_usage_counts";

pub fn progress_key(user_id: &UserId, ui_version: UiVersion) -> String {
    format!("onboarding_{}_{}", user_id, ui_version)
}

pub fn preference_key(user_id: &UserId, key: &str) -> String {
    format!("onboarding_prefs_{}_{}", user_id, key)
}

pub fn skip_flag_key(user_id: &UserId, tutorial_id: &TutorialId) -> String {
    format!("onboarding_skip_{}_{}", user_id, tutorial_id)
}
