//! Command handlers for the `metaextract` binary.
//!
//! Each handler wires the use case it needs, runs it, and returns a JSON
//! document for stdout.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Context;
use clap::Subcommand;
use me_app::{OnboardingEngine, PersistOutcome, SkipStepWithPolicy};
use me_core::ids::{SampleId, UserId};
use me_core::onboarding::{get_config, PersistedProgress, UiVersion};
use me_core::samples::{score, UserProfile};
use serde_json::{json, Value};
use tracing::{info_span, Instrument};

use crate::bootstrap::AppRuntime;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the tutorials and skip policy of the UI version
    Tutorials,
    /// Start a tutorial, replacing any running one
    Start { tutorial_id: String },
    /// Start the first tutorial when the UI version auto-starts and it was never completed
    AutoStart,
    /// Mark a step of the running tutorial completed
    CompleteStep { tutorial_id: String, step_id: String },
    /// Skip a step of the running tutorial, subject to the skip policy
    SkipStep { tutorial_id: String, step_id: String },
    /// Complete the running tutorial
    Complete { tutorial_id: String },
    /// Dismiss the running tutorial
    Dismiss { tutorial_id: String },
    /// Pause the running tutorial
    Pause,
    /// Resume a paused tutorial
    Resume,
    /// Unlock a feature
    Unlock { feature_id: String },
    /// Show onboarding progress
    Progress,
    /// Reset onboarding progress to defaults
    Reset,
    /// Allow a completed tutorial to be taken again
    ResetTutorial { tutorial_id: String },
    /// Recommend sample files for a user profile
    Recommend {
        /// Desired use case, e.g. "forensics"
        #[arg(long)]
        use_case: String,
        /// beginner | intermediate | advanced
        #[arg(long, default_value = "beginner")]
        level: String,
        #[arg(long = "file-type")]
        file_types: Vec<String>,
        #[arg(long = "goal")]
        goals: Vec<String>,
        #[arg(long)]
        industry: Option<String>,
        /// Defaults to `recommendations.default_limit`
        #[arg(long)]
        limit: Option<usize>,
        /// Sample ids to treat as processed, on top of the recorded ones
        #[arg(long = "processed")]
        processed: Vec<String>,
    },
    /// Record that a sample file was processed
    RecordSample { sample_id: String },
}

/// Who the command acts for.
#[derive(Debug, Clone)]
pub struct Target {
    pub user_id: UserId,
    pub ui_version: UiVersion,
}

pub async fn execute(command: Command, target: &Target, runtime: &AppRuntime) -> anyhow::Result<Value> {
    let span = info_span!(
        "command.execute",
        user_id = %target.user_id,
        ui_version = %target.ui_version
    );

    dispatch(command, target, runtime).instrument(span).await
}

async fn dispatch(command: Command, target: &Target, runtime: &AppRuntime) -> anyhow::Result<Value> {
    match command {
        Command::Tutorials => {
            let config = get_config(target.ui_version);
            Ok(serde_json::to_value(config)?)
        }
        Command::Recommend {
            use_case,
            level,
            file_types,
            goals,
            industry,
            limit,
            processed,
        } => {
            let profile = UserProfile {
                use_case,
                technical_level: level,
                file_types,
                goals,
                industry,
            };
            recommend(runtime, &profile, processed, limit).await
        }
        Command::RecordSample { sample_id } => {
            let sample_id = SampleId::from(sample_id);
            let count = runtime
                .recommend_samples()
                .record_processed(&sample_id)
                .await
                .with_context(|| format!("Failed to record usage of '{sample_id}'"))?;
            Ok(json!({ "sampleId": sample_id, "count": count }))
        }
        command => {
            let engine = runtime
                .onboarding_engine(target.user_id.clone(), target.ui_version)
                .await;
            run_engine_command(command, engine, runtime).await
        }
    }
}

async fn run_engine_command(
    command: Command,
    engine: OnboardingEngine,
    runtime: &AppRuntime,
) -> anyhow::Result<Value> {
    let outcome = match command {
        Command::Start { tutorial_id } => {
            let tutorial = engine
                .config()
                .tutorial(&tutorial_id)
                .with_context(|| {
                    format!(
                        "Unknown tutorial '{tutorial_id}' for UI version {}",
                        engine.ui_version()
                    )
                })?;
            engine.start_tutorial(tutorial).await
        }
        Command::AutoStart => engine.auto_start().await,
        Command::CompleteStep {
            tutorial_id,
            step_id,
        } => engine.complete_step(&tutorial_id, &step_id).await,
        Command::SkipStep {
            tutorial_id,
            step_id,
        } => {
            let engine = Arc::new(engine);
            let outcome = SkipStepWithPolicy::new(engine.clone())
                .execute(&tutorial_id, &step_id)
                .await
                .with_context(|| format!("Cannot skip step '{step_id}'"))?;
            return Ok(mutation_report(&engine, runtime, outcome).await);
        }
        Command::Complete { tutorial_id } => engine.complete_tutorial(&tutorial_id).await,
        Command::Dismiss { tutorial_id } => engine.dismiss_tutorial(&tutorial_id).await,
        Command::Pause => engine.pause_tutorial().await,
        Command::Resume => engine.resume_tutorial().await,
        Command::Unlock { feature_id } => engine.unlock_feature(&feature_id).await,
        Command::Reset => engine.reset_progress().await,
        Command::ResetTutorial { tutorial_id } => engine.reset_tutorial(&tutorial_id).await,
        Command::Progress => return Ok(progress_view(&engine).await),
        Command::Tutorials | Command::Recommend { .. } | Command::RecordSample { .. } => {
            anyhow::bail!("command does not operate on the onboarding engine")
        }
    };

    Ok(mutation_report(&engine, runtime, outcome).await)
}

async fn mutation_report(engine: &OnboardingEngine, runtime: &AppRuntime, outcome: PersistOutcome) -> Value {
    json!({
        "outcome": outcome,
        "events": runtime.events.history(None),
        "state": progress_view(engine).await,
    })
}

async fn progress_view(engine: &OnboardingEngine) -> Value {
    let progress = engine
        .progress()
        .await
        .map(|progress| PersistedProgress::from(&progress));
    let last_updated_at = progress
        .as_ref()
        .and_then(|progress| chrono::DateTime::from_timestamp_millis(progress.last_updated))
        .map(|at| at.to_rfc3339());

    json!({
        "progress": progress,
        "completionRate": engine.completion_rate().await,
        "lastUpdatedAt": last_updated_at,
        "skipPolicy": engine.skip_policy(),
    })
}

async fn recommend(
    runtime: &AppRuntime,
    profile: &UserProfile,
    processed: Vec<String>,
    limit: Option<usize>,
) -> anyhow::Result<Value> {
    let use_case = runtime.recommend_samples();
    let mut processed_ids: HashSet<SampleId> = use_case.processed_samples().await;
    processed_ids.extend(processed.into_iter().map(SampleId::from));

    let limit = limit.unwrap_or(runtime.config.recommendations.default_limit);
    let samples: Vec<Value> = use_case
        .execute(profile, &processed_ids, limit)
        .into_iter()
        .map(|sample| {
            json!({
                "id": sample.id,
                "name": sample.name,
                "fileType": sample.file_type,
                "difficulty": sample.difficulty,
                "score": score(sample, profile, &processed_ids),
            })
        })
        .collect();

    Ok(json!({ "samples": samples }))
}
