//! Static tutorial definitions.

use serde::{Deserialize, Serialize};

use crate::ids::{StepId, TutorialId};
use crate::onboarding::UiVersion;

/// Where the overlay for a step is anchored relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepPosition {
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

/// Interaction the user has to perform before a step counts as done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequiredAction {
    Click,
    Upload,
    Input,
    Navigate,
    Hover,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinition {
    pub id: StepId,
    pub title: String,
    pub description: String,
    /// Selector-like reference to the UI element the step points at.
    pub target: Option<String>,
    pub position: StepPosition,
    pub action: Option<RequiredAction>,
    pub skippable: bool,
    /// Soft hint, never enforced.
    pub duration_hint_secs: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TutorialDefinition {
    pub id: TutorialId,
    pub name: String,
    pub description: String,
    pub ui_version: UiVersion,
    pub steps: Vec<StepDefinition>,
}

impl TutorialDefinition {
    pub fn total_steps(&self) -> usize {
        self.steps.len()
    }

    pub fn step(&self, id: &str) -> Option<&StepDefinition> {
        self.steps.iter().find(|step| step.id == id)
    }

    /// Sum of the per-step duration hints.
    pub fn estimated_duration_secs(&self) -> u32 {
        self.steps
            .iter()
            .filter_map(|step| step.duration_hint_secs)
            .sum()
    }
}

impl StepDefinition {
    pub(crate) fn new(
        id: &str,
        title: &str,
        description: &str,
        target: Option<&str>,
        position: StepPosition,
    ) -> Self {
        Self {
            id: StepId::from(id),
            title: title.to_string(),
            description: description.to_string(),
            target: target.map(str::to_string),
            position,
            action: None,
            skippable: true,
            duration_hint_secs: None,
        }
    }

    pub(crate) fn requires(mut self, action: RequiredAction) -> Self {
        self.action = Some(action);
        self
    }

    pub(crate) fn mandatory(mut self) -> Self {
        self.skippable = false;
        self
    }

    pub(crate) fn lasting(mut self, secs: u32) -> Self {
        self.duration_hint_secs = Some(secs);
        self
    }
}
