//! Skip a step only when the UI version's skip policy allows it.

use std::sync::Arc;

use me_core::onboarding::SkipDecision;
use tracing::info;

use super::engine::{OnboardingEngine, PersistOutcome};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipStepError {
    #[error("skipping is disabled for this experience")]
    Disabled,

    #[error("skip limit of {max_skip_count} reached")]
    LimitReached { max_skip_count: u32 },
}

/// Use case wrapping [`OnboardingEngine::skip_step`] with policy enforcement.
///
/// 按跳过策略决定是否允许跳过步骤。
pub struct SkipStepWithPolicy {
    engine: Arc<OnboardingEngine>,
}

impl SkipStepWithPolicy {
    pub fn new(engine: Arc<OnboardingEngine>) -> Self {
        Self { engine }
    }

    pub async fn execute(
        &self,
        tutorial_id: &str,
        step_id: &str,
    ) -> Result<PersistOutcome, SkipStepError> {
        let policy = self.engine.skip_policy();
        let mut remaining_after = 0;
        let outcome = self
            .engine
            .skip_step_if(tutorial_id, step_id, |skips_used| {
                match policy.evaluate(skips_used) {
                    SkipDecision::Allowed { remaining } => {
                        remaining_after = remaining.saturating_sub(1);
                        Ok(())
                    }
                    SkipDecision::Disabled => Err(SkipStepError::Disabled),
                    SkipDecision::LimitReached { max_skip_count } => {
                        Err(SkipStepError::LimitReached { max_skip_count })
                    }
                }
            })
            .await?;

        if outcome.is_changed() {
            info!(tutorial_id, step_id, remaining = remaining_after, "Step skipped under policy");
        }
        Ok(outcome)
    }
}
