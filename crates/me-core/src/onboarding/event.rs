//! Onboarding lifecycle events.

use serde::{Deserialize, Serialize};

use crate::ids::{FeatureId, StepId, TutorialId};
use crate::onboarding::PersistedProgress;

/// Event emitted by the onboarding engine.
///
/// 引导流程事件。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum OnboardingEvent {
    #[serde(rename = "tutorial:started")]
    TutorialStarted { tutorial_id: TutorialId },

    #[serde(rename = "step:completed")]
    StepCompleted {
        tutorial_id: TutorialId,
        step_id: StepId,
    },

    #[serde(rename = "step:skipped")]
    StepSkipped {
        tutorial_id: TutorialId,
        step_id: StepId,
    },

    /// `duration` is in whole seconds.
    #[serde(rename = "tutorial:completed")]
    TutorialCompleted {
        tutorial_id: TutorialId,
        duration: u64,
    },

    #[serde(rename = "tutorial:dismissed")]
    TutorialDismissed { tutorial_id: TutorialId },

    #[serde(rename = "feature:unlocked")]
    FeatureUnlocked { feature_id: FeatureId },

    #[serde(rename = "progress:updated")]
    ProgressUpdated { progress: Box<PersistedProgress> },
}

/// Discriminant of [`OnboardingEvent`], used for subscriptions and history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OnboardingEventKind {
    TutorialStarted,
    StepCompleted,
    StepSkipped,
    TutorialCompleted,
    TutorialDismissed,
    FeatureUnlocked,
    ProgressUpdated,
}

impl OnboardingEvent {
    pub fn kind(&self) -> OnboardingEventKind {
        match self {
            OnboardingEvent::TutorialStarted { .. } => OnboardingEventKind::TutorialStarted,
            OnboardingEvent::StepCompleted { .. } => OnboardingEventKind::StepCompleted,
            OnboardingEvent::StepSkipped { .. } => OnboardingEventKind::StepSkipped,
            OnboardingEvent::TutorialCompleted { .. } => OnboardingEventKind::TutorialCompleted,
            OnboardingEvent::TutorialDismissed { .. } => OnboardingEventKind::TutorialDismissed,
            OnboardingEvent::FeatureUnlocked { .. } => OnboardingEventKind::FeatureUnlocked,
            OnboardingEvent::ProgressUpdated { .. } => OnboardingEventKind::ProgressUpdated,
        }
    }

    pub fn tutorial_id(&self) -> Option<&TutorialId> {
        match self {
            OnboardingEvent::TutorialStarted { tutorial_id }
            | OnboardingEvent::StepCompleted { tutorial_id, .. }
            | OnboardingEvent::StepSkipped { tutorial_id, .. }
            | OnboardingEvent::TutorialCompleted { tutorial_id, .. }
            | OnboardingEvent::TutorialDismissed { tutorial_id } => Some(tutorial_id),
            OnboardingEvent::FeatureUnlocked { .. } | OnboardingEvent::ProgressUpdated { .. } => {
                None
            }
        }
    }
}

impl OnboardingEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OnboardingEventKind::TutorialStarted => "tutorial:started",
            OnboardingEventKind::StepCompleted => "step:completed",
            OnboardingEventKind::StepSkipped => "step:skipped",
            OnboardingEventKind::TutorialCompleted => "tutorial:completed",
            OnboardingEventKind::TutorialDismissed => "tutorial:dismissed",
            OnboardingEventKind::FeatureUnlocked => "feature:unlocked",
            OnboardingEventKind::ProgressUpdated => "progress:updated",
        }
    }
}

impl std::fmt::Display for OnboardingEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
