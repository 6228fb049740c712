//! In-memory tutorial state.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::{StepId, TutorialId};

/// Lifecycle of the tutorial currently tracked by the engine.
///
/// 教程状态。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TutorialStatus {
    #[default]
    Idle,
    Active,
    Paused,
    Completed,
    Dismissed,
}

impl TutorialStatus {
    /// Active and paused tutorials both occupy the single tutorial slot.
    pub fn is_running(&self) -> bool {
        matches!(self, TutorialStatus::Active | TutorialStatus::Paused)
    }
}

/// State of one tutorial run.
///
/// Step sets keep genuine set semantics in memory; conversion to ordered
/// arrays happens only at the storage edge (see [`crate::onboarding::progress`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TutorialState {
    pub tutorial_id: Option<TutorialId>,
    pub current_step: usize,
    pub status: TutorialStatus,
    pub started_at_ms: Option<i64>,
    pub completed_steps: BTreeSet<StepId>,
    pub skipped_steps: BTreeSet<StepId>,
    pub total_steps: usize,
}

impl TutorialState {
    /// Fresh run of a tutorial, positioned at step 0.
    pub fn started(tutorial_id: TutorialId, total_steps: usize, now_ms: i64) -> Self {
        Self {
            tutorial_id: Some(tutorial_id),
            current_step: 0,
            status: TutorialStatus::Active,
            started_at_ms: Some(now_ms),
            completed_steps: BTreeSet::new(),
            skipped_steps: BTreeSet::new(),
            total_steps,
        }
    }

    pub fn is_for(&self, tutorial_id: &str) -> bool {
        self.tutorial_id.as_ref().is_some_and(|id| id == tutorial_id)
    }

    pub fn all_steps_completed(&self) -> bool {
        self.completed_steps.len() >= self.total_steps
    }

    /// Whole seconds elapsed since the run started, 0 without a start time.
    pub fn elapsed_secs(&self, now_ms: i64) -> u64 {
        self.started_at_ms
            .map(|started| (now_ms - started).max(0) as u64 / 1000)
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_started_state_is_active_at_step_zero() {
        let state = TutorialState::started(TutorialId::from("t1"), 3, 1_000);
        assert_eq!(state.status, TutorialStatus::Active);
        assert_eq!(state.current_step, 0);
        assert_eq!(state.started_at_ms, Some(1_000));
        assert!(state.is_for("t1"));
        assert!(!state.is_for("t2"));
    }

    #[test]
    fn test_elapsed_secs_handles_missing_and_backwards_clock() {
        let mut state = TutorialState::started(TutorialId::from("t1"), 3, 10_000);
        assert_eq!(state.elapsed_secs(12_500), 2);
        assert_eq!(state.elapsed_secs(9_000), 0);

        state.started_at_ms = None;
        assert_eq!(state.elapsed_secs(12_500), 0);
    }

    #[test]
    fn test_running_statuses() {
        assert!(TutorialStatus::Active.is_running());
        assert!(TutorialStatus::Paused.is_running());
        assert!(!TutorialStatus::Dismissed.is_running());
        assert!(!TutorialStatus::Idle.is_running());
    }
}
