//! Onboarding engine
//!
//! Tutorial state machine for one user on one UI version. Every mutation is
//! applied in memory, persisted through the local store (with the active
//! tutorial mirrored into the session store), and then announced on the
//! event bus.
//!
//! 引导引擎：先改内存，再持久化，最后发事件。持久化失败不会回滚内存状态。

use std::convert::Infallible;
use std::sync::Arc;

use me_core::ids::{FeatureId, StepId, TutorialId, UserId};
use me_core::onboarding::keys::{progress_key, ACTIVE_TUTORIAL_KEY};
use me_core::onboarding::{
    get_config, OnboardingEvent, OnboardingProgress, PersistedProgress, PersistedTutorialState,
    SkipPolicy, TutorialDefinition, TutorialState, TutorialStatus, UiOnboardingConfig, UiVersion,
};
use me_core::ports::{ClockPort, KeyValueStorePort};
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, info_span, warn, Instrument, Span};

use super::preferences::OnboardingPreferences;
use crate::adapters::JsonStorage;
use crate::event_bus::EventBus;

/// Result of a state-changing engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PersistOutcome {
    /// State changed and was written to the local store.
    Saved,
    /// State changed and the event went out, but the write failed.
    MemoryOnly,
    /// Nothing to do.
    Unchanged,
}

impl PersistOutcome {
    pub fn is_changed(&self) -> bool {
        !matches!(self, PersistOutcome::Unchanged)
    }
}

/// Engine dependency grouping. No defaults, no hidden logic.
///
/// 引擎依赖分组（仅参数打包）。
pub struct OnboardingEngineDeps {
    /// Durable store (`localStorage` role).
    pub local: Arc<dyn KeyValueStorePort>,
    /// Process-lifetime store (`sessionStorage` role).
    pub session: Arc<dyn KeyValueStorePort>,
    pub clock: Arc<dyn ClockPort>,
    pub events: EventBus,
}

pub struct OnboardingEngine {
    user_id: UserId,
    ui_version: UiVersion,
    config: &'static UiOnboardingConfig,
    local: JsonStorage,
    session: JsonStorage,
    preferences: OnboardingPreferences,
    clock: Arc<dyn ClockPort>,
    events: EventBus,
    progress: Mutex<Option<OnboardingProgress>>,
}

impl OnboardingEngine {
    /// Build an engine and load the persisted record for `user_id` on
    /// `ui_version`. A missing record is created and persisted; a malformed
    /// one is replaced by defaults in memory.
    pub async fn load(user_id: UserId, ui_version: UiVersion, deps: OnboardingEngineDeps) -> Self {
        let engine = Self {
            preferences: OnboardingPreferences::new(user_id.clone(), deps.local.clone()),
            user_id,
            ui_version,
            config: get_config(ui_version),
            local: JsonStorage::new(deps.local),
            session: JsonStorage::new(deps.session),
            clock: deps.clock,
            events: deps.events,
            progress: Mutex::new(None),
        };

        let span = engine.span("load");
        let progress = async {
            let key = engine.progress_key();
            if let Some(stored) = engine.local.get::<PersistedProgress>(&key).await {
                debug!("Loaded persisted onboarding progress");
                return OnboardingProgress::from(stored);
            }

            let fresh = engine.fresh_progress();
            if engine.local.get_raw(&key).await.is_none() {
                if let Err(e) = engine.local.set(&key, &PersistedProgress::from(&fresh)).await {
                    warn!(error = %e, "Failed to persist initial onboarding progress");
                }
            }
            info!("Initialized onboarding progress");
            fresh
        }
        .instrument(span)
        .await;

        *engine.progress.lock().await = Some(progress);
        engine
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn ui_version(&self) -> UiVersion {
        self.ui_version
    }

    pub fn config(&self) -> &'static UiOnboardingConfig {
        self.config
    }

    /// Skip policy of this UI version. Not enforced by the engine.
    pub fn skip_policy(&self) -> SkipPolicy {
        self.config.skip_policy()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn preferences(&self) -> &OnboardingPreferences {
        &self.preferences
    }

    /// Replace any running tutorial with a fresh run of `tutorial`.
    pub async fn start_tutorial(&self, tutorial: &TutorialDefinition) -> PersistOutcome {
        let span = self.span("start_tutorial");
        async {
            let (outcome, event) = {
                let mut guard = self.progress.lock().await;
                let now_ms = self.clock.now_ms();
                let progress = guard.get_or_insert_with(|| self.fresh_progress());

                if let Some(previous) = progress.active_tutorial.as_ref() {
                    debug!(previous = ?previous.tutorial_id, "Replacing running tutorial");
                }
                progress.active_tutorial = Some(TutorialState::started(
                    tutorial.id.clone(),
                    tutorial.total_steps(),
                    now_ms,
                ));
                progress.touch(now_ms);

                let outcome = self.persist(progress).await;
                (
                    outcome,
                    OnboardingEvent::TutorialStarted {
                        tutorial_id: tutorial.id.clone(),
                    },
                )
            };

            info!(tutorial_id = %tutorial.id, "Tutorial started");
            self.events.emit(event);
            outcome
        }
        .instrument(span)
        .await
    }

    /// Mark a step of the active tutorial completed. Completing the last
    /// outstanding step completes the tutorial, which emits only
    /// `tutorial:completed`.
    pub async fn complete_step(&self, tutorial_id: &str, step_id: &str) -> PersistOutcome {
        let span = self.span("complete_step");
        async {
            let (outcome, event) = {
                let mut guard = self.progress.lock().await;
                let now_ms = self.clock.now_ms();
                let Some(progress) = guard.as_mut() else {
                    return PersistOutcome::Unchanged;
                };
                let Some(state) = Self::running_state(progress, tutorial_id) else {
                    return PersistOutcome::Unchanged;
                };

                if !state.completed_steps.insert(StepId::from(step_id)) {
                    debug!(step_id, "Step already completed");
                    return PersistOutcome::Unchanged;
                }
                state.current_step += 1;
                let finished = state.all_steps_completed();
                progress.total_steps_completed += 1;
                progress.touch(now_ms);

                let event = if finished {
                    match Self::finish_tutorial(progress, now_ms) {
                        Some(event) => event,
                        None => return PersistOutcome::Unchanged,
                    }
                } else {
                    OnboardingEvent::StepCompleted {
                        tutorial_id: TutorialId::from(tutorial_id),
                        step_id: StepId::from(step_id),
                    }
                };

                (self.persist(progress).await, event)
            };

            debug!(tutorial_id, step_id, event = %event.kind(), "Step completed");
            self.events.emit(event);
            outcome
        }
        .instrument(span)
        .await
    }

    pub async fn skip_step(&self, tutorial_id: &str, step_id: &str) -> PersistOutcome {
        match self
            .skip_step_if(tutorial_id, step_id, |_| Ok::<(), Infallible>(()))
            .await
        {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        }
    }

    /// Skip a step after `allow` accepts the number of steps already skipped
    /// in the running tutorial. The check and the skip happen under one lock.
    pub async fn skip_step_if<E, F>(
        &self,
        tutorial_id: &str,
        step_id: &str,
        allow: F,
    ) -> Result<PersistOutcome, E>
    where
        F: FnOnce(u32) -> Result<(), E>,
    {
        let span = self.span("skip_step");
        async move {
            let (outcome, event) = {
                let mut guard = self.progress.lock().await;
                let now_ms = self.clock.now_ms();
                let skips_used = guard
                    .as_ref()
                    .and_then(|progress| progress.active_tutorial.as_ref())
                    .map_or(0, |state| state.skipped_steps.len() as u32);
                if let Err(e) = allow(skips_used) {
                    return Err(e);
                }

                let Some(progress) = guard.as_mut() else {
                    return Ok(PersistOutcome::Unchanged);
                };
                let Some(state) = Self::running_state(progress, tutorial_id) else {
                    return Ok(PersistOutcome::Unchanged);
                };

                if !state.skipped_steps.insert(StepId::from(step_id)) {
                    debug!(step_id, "Step already skipped");
                    return Ok(PersistOutcome::Unchanged);
                }
                state.current_step += 1;
                progress.total_steps_skipped += 1;
                progress.touch(now_ms);

                (
                    self.persist(progress).await,
                    OnboardingEvent::StepSkipped {
                        tutorial_id: TutorialId::from(tutorial_id),
                        step_id: StepId::from(step_id),
                    },
                )
            };

            debug!(tutorial_id, step_id, "Step skipped");
            self.events.emit(event);
            Ok(outcome)
        }
        .instrument(span)
        .await
    }

    pub async fn complete_tutorial(&self, tutorial_id: &str) -> PersistOutcome {
        let span = self.span("complete_tutorial");
        async {
            let (outcome, event) = {
                let mut guard = self.progress.lock().await;
                let now_ms = self.clock.now_ms();
                let Some(progress) = guard.as_mut() else {
                    return PersistOutcome::Unchanged;
                };
                if Self::running_state(progress, tutorial_id).is_none() {
                    return PersistOutcome::Unchanged;
                }
                let Some(event) = Self::finish_tutorial(progress, now_ms) else {
                    return PersistOutcome::Unchanged;
                };
                progress.touch(now_ms);

                (self.persist(progress).await, event)
            };

            self.events.emit(event);
            outcome
        }
        .instrument(span)
        .await
    }

    pub async fn dismiss_tutorial(&self, tutorial_id: &str) -> PersistOutcome {
        let span = self.span("dismiss_tutorial");
        async {
            let (outcome, event) = {
                let mut guard = self.progress.lock().await;
                let now_ms = self.clock.now_ms();
                let Some(progress) = guard.as_mut() else {
                    return PersistOutcome::Unchanged;
                };
                let Some(state) = Self::running_state(progress, tutorial_id) else {
                    return PersistOutcome::Unchanged;
                };

                state.status = TutorialStatus::Dismissed;
                progress.active_tutorial = None;
                progress.touch(now_ms);

                (
                    self.persist(progress).await,
                    OnboardingEvent::TutorialDismissed {
                        tutorial_id: TutorialId::from(tutorial_id),
                    },
                )
            };

            let tutorial_id = TutorialId::from(tutorial_id);
            if let Err(e) = self.preferences.set_tutorial_skipped(&tutorial_id, true).await {
                warn!(error = %e, "Failed to record dismissed tutorial");
            }

            info!(%tutorial_id, "Tutorial dismissed");
            self.events.emit(event);
            outcome
        }
        .instrument(span)
        .await
    }

    /// Active -> paused. Emits nothing.
    pub async fn pause_tutorial(&self) -> PersistOutcome {
        self.transition(TutorialStatus::Active, TutorialStatus::Paused)
            .instrument(self.span("pause_tutorial"))
            .await
    }

    /// Paused -> active. Emits nothing.
    pub async fn resume_tutorial(&self) -> PersistOutcome {
        self.transition(TutorialStatus::Paused, TutorialStatus::Active)
            .instrument(self.span("resume_tutorial"))
            .await
    }

    async fn transition(&self, from: TutorialStatus, to: TutorialStatus) -> PersistOutcome {
        let mut guard = self.progress.lock().await;
        let now_ms = self.clock.now_ms();
        let Some(progress) = guard.as_mut() else {
            return PersistOutcome::Unchanged;
        };
        let Some(state) = progress.active_tutorial.as_mut() else {
            debug!("No active tutorial");
            return PersistOutcome::Unchanged;
        };
        if state.status != from {
            debug!(status = ?state.status, "Tutorial not in expected status");
            return PersistOutcome::Unchanged;
        }

        state.status = to;
        progress.touch(now_ms);
        self.persist(progress).await
    }

    /// Unlock a feature. Repeated unlocks are no-ops.
    pub async fn unlock_feature(&self, feature_id: &str) -> PersistOutcome {
        let span = self.span("unlock_feature");
        async {
            let (outcome, event) = {
                let mut guard = self.progress.lock().await;
                let now_ms = self.clock.now_ms();
                let Some(progress) = guard.as_mut() else {
                    return PersistOutcome::Unchanged;
                };
                if progress.is_feature_unlocked(feature_id) {
                    return PersistOutcome::Unchanged;
                }

                progress.unlocked_features.push(FeatureId::from(feature_id));
                progress.touch(now_ms);

                (
                    self.persist(progress).await,
                    OnboardingEvent::FeatureUnlocked {
                        feature_id: FeatureId::from(feature_id),
                    },
                )
            };

            info!(feature_id, "Feature unlocked");
            self.events.emit(event);
            outcome
        }
        .instrument(span)
        .await
    }

    /// Reinitialize progress to defaults.
    pub async fn reset_progress(&self) -> PersistOutcome {
        let span = self.span("reset_progress");
        async {
            let (outcome, event) = {
                let mut guard = self.progress.lock().await;
                let progress = guard.insert(self.fresh_progress());
                (self.persist(progress).await, Self::progress_updated(progress))
            };

            info!("Onboarding progress reset");
            self.events.emit(event);
            outcome
        }
        .instrument(span)
        .await
    }

    /// Forget that `tutorial_id` was completed so it can be taken again.
    pub async fn reset_tutorial(&self, tutorial_id: &str) -> PersistOutcome {
        let span = self.span("reset_tutorial");
        async {
            let (outcome, event) = {
                let mut guard = self.progress.lock().await;
                let now_ms = self.clock.now_ms();
                let Some(progress) = guard.as_mut() else {
                    return PersistOutcome::Unchanged;
                };

                progress.completed_tutorials.retain(|id| id != tutorial_id);
                progress.touch(now_ms);
                (self.persist(progress).await, Self::progress_updated(progress))
            };

            if let Err(e) = self
                .preferences
                .set_tutorial_skipped(&TutorialId::from(tutorial_id), false)
                .await
            {
                warn!(error = %e, "Failed to clear dismissed flag");
            }

            self.events.emit(event);
            outcome
        }
        .instrument(span)
        .await
    }

    /// Start the first tutorial of this UI version when the configuration
    /// asks for it and nothing is running. A tutorial the user completed or
    /// dismissed is not started again.
    pub async fn auto_start(&self) -> PersistOutcome {
        if !self.config.auto_start {
            return PersistOutcome::Unchanged;
        }
        let Some(first) = self.config.first_tutorial() else {
            return PersistOutcome::Unchanged;
        };

        {
            let guard = self.progress.lock().await;
            if let Some(progress) = guard.as_ref() {
                if progress.active_tutorial.is_some()
                    || progress.is_tutorial_completed(first.id.as_str())
                {
                    return PersistOutcome::Unchanged;
                }
            }
        }
        if self.preferences.is_tutorial_skipped(&first.id).await {
            debug!(tutorial_id = %first.id, "First tutorial was dismissed, not auto-starting");
            return PersistOutcome::Unchanged;
        }

        self.start_tutorial(first).await
    }

    /// Drop every listener on this engine's bus and forget in-memory state.
    /// Persisted data is left alone.
    pub async fn destroy(&self) {
        self.events.clear_all();
        *self.progress.lock().await = None;
        debug!(user_id = %self.user_id, ui_version = %self.ui_version, "Onboarding engine destroyed");
    }

    // === Queries ===

    pub async fn progress(&self) -> Option<OnboardingProgress> {
        self.progress.lock().await.clone()
    }

    pub async fn active_tutorial(&self) -> Option<TutorialState> {
        self.progress
            .lock()
            .await
            .as_ref()
            .and_then(|progress| progress.active_tutorial.clone())
    }

    pub async fn is_active_tutorial(&self, tutorial_id: &str) -> bool {
        self.progress
            .lock()
            .await
            .as_ref()
            .and_then(|progress| progress.active_tutorial.as_ref())
            .is_some_and(|state| state.is_for(tutorial_id))
    }

    pub async fn is_tutorial_completed(&self, tutorial_id: &str) -> bool {
        self.progress
            .lock()
            .await
            .as_ref()
            .is_some_and(|progress| progress.is_tutorial_completed(tutorial_id))
    }

    pub async fn is_feature_unlocked(&self, feature_id: &str) -> bool {
        self.progress
            .lock()
            .await
            .as_ref()
            .is_some_and(|progress| progress.is_feature_unlocked(feature_id))
    }

    /// Percentage of handled steps that were completed, 0 when none were handled.
    pub async fn completion_rate(&self) -> f64 {
        self.progress
            .lock()
            .await
            .as_ref()
            .map_or(0.0, OnboardingProgress::completion_rate)
    }

    /// Steps skipped in the running tutorial.
    pub async fn skips_used(&self) -> u32 {
        self.active_tutorial()
            .await
            .map_or(0, |state| state.skipped_steps.len() as u32)
    }

    // === Internals ===

    fn span(&self, op: &'static str) -> Span {
        info_span!(
            "onboarding.engine",
            op,
            user_id = %self.user_id,
            ui_version = %self.ui_version
        )
    }

    fn progress_key(&self) -> String {
        progress_key(&self.user_id, self.ui_version)
    }

    fn fresh_progress(&self) -> OnboardingProgress {
        OnboardingProgress::new(self.user_id.clone(), self.ui_version, self.clock.now_ms())
    }

    fn running_state<'p>(
        progress: &'p mut OnboardingProgress,
        tutorial_id: &str,
    ) -> Option<&'p mut TutorialState> {
        let Some(state) = progress.active_tutorial.as_mut() else {
            debug!(tutorial_id, "No active tutorial");
            return None;
        };
        if !state.is_for(tutorial_id) {
            warn!(
                tutorial_id,
                active = ?state.tutorial_id,
                "Operation targets a tutorial that is not active"
            );
            return None;
        }
        Some(state)
    }

    /// Record the active tutorial as completed and clear it.
    fn finish_tutorial(progress: &mut OnboardingProgress, now_ms: i64) -> Option<OnboardingEvent> {
        let mut state = progress.active_tutorial.take()?;
        let tutorial_id = state.tutorial_id.clone()?;
        state.status = TutorialStatus::Completed;
        let duration = state.elapsed_secs(now_ms);

        progress.completed_tutorials.push(tutorial_id.clone());
        info!(tutorial_id = %tutorial_id, duration, "Tutorial completed");

        Some(OnboardingEvent::TutorialCompleted {
            tutorial_id,
            duration,
        })
    }

    fn progress_updated(progress: &OnboardingProgress) -> OnboardingEvent {
        OnboardingEvent::ProgressUpdated {
            progress: Box::new(PersistedProgress::from(progress)),
        }
    }

    async fn persist(&self, progress: &OnboardingProgress) -> PersistOutcome {
        let mirrored = match &progress.active_tutorial {
            Some(state) => {
                self.session
                    .set(ACTIVE_TUTORIAL_KEY, &PersistedTutorialState::from(state))
                    .await
            }
            None => self.session.remove(ACTIVE_TUTORIAL_KEY).await,
        };
        if let Err(e) = mirrored {
            warn!(error = %e, "Failed to mirror active tutorial into session storage");
        }

        match self
            .local
            .set(&self.progress_key(), &PersistedProgress::from(progress))
            .await
        {
            Ok(()) => PersistOutcome::Saved,
            Err(e) => {
                warn!(error = %e, "Failed to persist onboarding progress, keeping in-memory state");
                PersistOutcome::MemoryOnly
            }
        }
    }
}
