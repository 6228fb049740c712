//! Durable onboarding progress and its storage encoding.
//!
//! `OnboardingProgress` / `TutorialState` are the in-memory model.
//! `PersistedProgress` / `PersistedTutorialState` are the storage-edge
//! representation: step sets become sorted arrays, and decoding is lenient so
//! a damaged array degrades to an empty set instead of failing the whole load.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::ids::{FeatureId, StepId, TutorialId, UserId};
use crate::onboarding::{TutorialState, TutorialStatus, UiVersion};

/// Per user + UI version onboarding record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OnboardingProgress {
    pub user_id: UserId,
    pub ui_version: UiVersion,
    pub completed_tutorials: Vec<TutorialId>,
    pub active_tutorial: Option<TutorialState>,
    pub unlocked_features: Vec<FeatureId>,
    pub total_steps_completed: u32,
    pub total_steps_skipped: u32,
    pub last_updated_ms: i64,
}

impl OnboardingProgress {
    pub fn new(user_id: UserId, ui_version: UiVersion, now_ms: i64) -> Self {
        Self {
            user_id,
            ui_version,
            completed_tutorials: Vec::new(),
            active_tutorial: None,
            unlocked_features: Vec::new(),
            total_steps_completed: 0,
            total_steps_skipped: 0,
            last_updated_ms: now_ms,
        }
    }

    pub fn is_tutorial_completed(&self, tutorial_id: &str) -> bool {
        self.completed_tutorials.iter().any(|id| id == tutorial_id)
    }

    pub fn is_feature_unlocked(&self, feature_id: &str) -> bool {
        self.unlocked_features.iter().any(|id| id == feature_id)
    }

    /// Percentage of handled steps that were completed rather than skipped.
    pub fn completion_rate(&self) -> f64 {
        let completed = f64::from(self.total_steps_completed);
        let handled = completed + f64::from(self.total_steps_skipped);
        if handled == 0.0 {
            0.0
        } else {
            completed / handled * 100.0
        }
    }

    pub fn touch(&mut self, now_ms: i64) {
        self.last_updated_ms = now_ms;
    }
}

/// Storage representation of [`TutorialState`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedTutorialState {
    #[serde(default)]
    pub tutorial_id: Option<TutorialId>,
    #[serde(default)]
    pub current_step: usize,
    #[serde(default)]
    pub status: TutorialStatus,
    #[serde(default)]
    pub started_at: Option<i64>,
    #[serde(default, deserialize_with = "lenient_step_list")]
    pub completed_steps: Vec<StepId>,
    #[serde(default, deserialize_with = "lenient_step_list")]
    pub skipped_steps: Vec<StepId>,
    #[serde(default)]
    pub total_steps: usize,
}

/// Storage representation of [`OnboardingProgress`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedProgress {
    pub user_id: UserId,
    pub ui_version: UiVersion,
    #[serde(default)]
    pub completed_tutorials: Vec<TutorialId>,
    #[serde(default, deserialize_with = "lenient_tutorial_state")]
    pub active_tutorial: Option<PersistedTutorialState>,
    #[serde(default)]
    pub unlocked_features: Vec<FeatureId>,
    #[serde(default)]
    pub total_steps_completed: u32,
    #[serde(default)]
    pub total_steps_skipped: u32,
    #[serde(default)]
    pub last_updated: i64,
}

impl From<&TutorialState> for PersistedTutorialState {
    fn from(state: &TutorialState) -> Self {
        Self {
            tutorial_id: state.tutorial_id.clone(),
            current_step: state.current_step,
            status: state.status,
            started_at: state.started_at_ms,
            completed_steps: state.completed_steps.iter().cloned().collect(),
            skipped_steps: state.skipped_steps.iter().cloned().collect(),
            total_steps: state.total_steps,
        }
    }
}

impl From<PersistedTutorialState> for TutorialState {
    fn from(persisted: PersistedTutorialState) -> Self {
        Self {
            tutorial_id: persisted.tutorial_id,
            current_step: persisted.current_step,
            status: persisted.status,
            started_at_ms: persisted.started_at,
            completed_steps: persisted.completed_steps.into_iter().collect::<BTreeSet<_>>(),
            skipped_steps: persisted.skipped_steps.into_iter().collect::<BTreeSet<_>>(),
            total_steps: persisted.total_steps,
        }
    }
}

impl From<&OnboardingProgress> for PersistedProgress {
    fn from(progress: &OnboardingProgress) -> Self {
        Self {
            user_id: progress.user_id.clone(),
            ui_version: progress.ui_version,
            completed_tutorials: progress.completed_tutorials.clone(),
            active_tutorial: progress
                .active_tutorial
                .as_ref()
                .map(PersistedTutorialState::from),
            unlocked_features: progress.unlocked_features.clone(),
            total_steps_completed: progress.total_steps_completed,
            total_steps_skipped: progress.total_steps_skipped,
            last_updated: progress.last_updated_ms,
        }
    }
}

impl From<PersistedProgress> for OnboardingProgress {
    fn from(persisted: PersistedProgress) -> Self {
        Self {
            user_id: persisted.user_id,
            ui_version: persisted.ui_version,
            completed_tutorials: persisted.completed_tutorials,
            active_tutorial: persisted.active_tutorial.map(TutorialState::from),
            unlocked_features: persisted.unlocked_features,
            total_steps_completed: persisted.total_steps_completed,
            total_steps_skipped: persisted.total_steps_skipped,
            last_updated_ms: persisted.last_updated,
        }
    }
}

// Non-array values and non-string members are dropped rather than rejected.
fn lenient_step_list<'de, D>(deserializer: D) -> Result<Vec<StepId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let steps = match value {
        serde_json::Value::Array(items) => items
            .into_iter()
            .filter_map(|item| item.as_str().map(StepId::from))
            .collect(),
        _ => Vec::new(),
    };
    Ok(steps)
}

fn lenient_tutorial_state<'de, D>(
    deserializer: D,
) -> Result<Option<PersistedTutorialState>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress_with_active_tutorial() -> OnboardingProgress {
        let mut state = TutorialState::started(TutorialId::from("t1"), 3, 1_000);
        state.completed_steps.insert(StepId::from("s2"));
        state.completed_steps.insert(StepId::from("s1"));
        state.skipped_steps.insert(StepId::from("s3"));
        state.current_step = 3;

        let mut progress = OnboardingProgress::new(UserId::from("u1"), UiVersion::V2, 1_000);
        progress.active_tutorial = Some(state);
        progress.total_steps_completed = 2;
        progress.total_steps_skipped = 1;
        progress
    }

    #[test]
    fn test_completion_rate_is_zero_without_handled_steps() {
        let progress = OnboardingProgress::new(UserId::from("u1"), UiVersion::V2, 0);
        assert_eq!(progress.completion_rate(), 0.0);
    }

    #[test]
    fn test_completion_rate_formula() {
        let mut progress = OnboardingProgress::new(UserId::from("u1"), UiVersion::V2, 0);
        progress.total_steps_completed = 3;
        progress.total_steps_skipped = 1;
        assert_eq!(progress.completion_rate(), 75.0);

        progress.total_steps_completed = 0;
        assert_eq!(progress.completion_rate(), 0.0);
    }

    #[test]
    fn test_step_sets_survive_storage_round_trip() {
        let progress = progress_with_active_tutorial();

        let json = serde_json::to_string(&PersistedProgress::from(&progress)).unwrap();
        let decoded: PersistedProgress = serde_json::from_str(&json).unwrap();
        let restored = OnboardingProgress::from(decoded);

        let original = progress.active_tutorial.unwrap();
        let restored_state = restored.active_tutorial.unwrap();
        assert_eq!(restored_state.completed_steps, original.completed_steps);
        assert_eq!(restored_state.skipped_steps, original.skipped_steps);
        assert_eq!(restored.total_steps_completed, 2);
    }

    #[test]
    fn test_step_sets_are_stored_as_arrays() {
        let progress = progress_with_active_tutorial();
        let value = serde_json::to_value(PersistedProgress::from(&progress)).unwrap();

        assert_eq!(
            value["activeTutorial"]["completedSteps"],
            serde_json::json!(["s1", "s2"])
        );
        assert_eq!(value["uiVersion"], "v2");
        assert_eq!(value["activeTutorial"]["status"], "active");
    }

    #[test]
    fn test_malformed_step_sets_decode_as_empty() {
        let json = r#"{
            "userId": "u1",
            "uiVersion": "original",
            "activeTutorial": {
                "tutorialId": "t1",
                "status": "paused",
                "completedSteps": {"s1": true},
                "skippedSteps": ["s3", 7, null],
                "totalSteps": 3
            },
            "totalStepsCompleted": 4
        }"#;

        let decoded: PersistedProgress = serde_json::from_str(json).unwrap();
        let progress = OnboardingProgress::from(decoded);
        let state = progress.active_tutorial.unwrap();

        assert!(state.completed_steps.is_empty());
        assert_eq!(state.skipped_steps.len(), 1);
        assert_eq!(state.status, TutorialStatus::Paused);
        assert_eq!(progress.total_steps_completed, 4);
    }

    #[test]
    fn test_malformed_active_tutorial_decodes_as_none() {
        let json = r#"{
            "userId": "u1",
            "uiVersion": "v2",
            "activeTutorial": "not-a-state",
            "completedTutorials": ["t0"]
        }"#;

        let decoded: PersistedProgress = serde_json::from_str(json).unwrap();
        assert!(decoded.active_tutorial.is_none());
        assert_eq!(decoded.completed_tutorials, vec![TutorialId::from("t0")]);
    }
}
