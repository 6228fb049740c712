use me_core::config::AppConfig;
use me_core::ids::UserId;
use me_core::onboarding::UiVersion;
use metaextract_lib::{execute, wire_dependencies, Command, Target};
use serde_json::Value;
use tempfile::TempDir;

fn target() -> Target {
    Target {
        user_id: UserId::from("u1"),
        ui_version: UiVersion::V2,
    }
}

/// Each call wires a fresh runtime, like a separate CLI invocation.
async fn run(dir: &TempDir, command: Command) -> anyhow::Result<Value> {
    let config = AppConfig {
        data_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    let runtime = wire_dependencies(config)?;
    execute(command, &target(), &runtime).await
}

#[tokio::test]
async fn tutorial_flow_persists_between_invocations() -> anyhow::Result<()> {
    let dir = TempDir::new()?;

    let started = run(
        &dir,
        Command::Start {
            tutorial_id: "v2-batch-processing".to_string(),
        },
    )
    .await?;
    assert_eq!(started["outcome"], "saved");
    assert_eq!(started["events"][0]["type"], "tutorial:started");

    let step = run(
        &dir,
        Command::CompleteStep {
            tutorial_id: "v2-batch-processing".to_string(),
            step_id: "anything".to_string(),
        },
    )
    .await?;
    assert_eq!(step["outcome"], "saved");

    let progress = run(&dir, Command::Progress).await?;
    assert_eq!(progress["progress"]["totalStepsCompleted"], 1);
    assert_eq!(
        progress["progress"]["activeTutorial"]["tutorialId"],
        "v2-batch-processing"
    );
    assert_eq!(progress["completionRate"], 100.0);
    assert!(dir.path().join("local_storage.json").exists());
    Ok(())
}

#[tokio::test]
async fn unknown_tutorial_is_an_error() -> anyhow::Result<()> {
    let dir = TempDir::new()?;

    let err = run(
        &dir,
        Command::Start {
            tutorial_id: "no-such-tutorial".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("no-such-tutorial"));
    Ok(())
}

#[tokio::test]
async fn skip_policy_is_enforced_for_images_mvp() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let config = AppConfig {
        data_dir: dir.path().to_path_buf(),
        ..Default::default()
    };
    let runtime = wire_dependencies(config)?;
    let images = Target {
        user_id: UserId::from("u1"),
        ui_version: UiVersion::ImagesMvp,
    };

    execute(Command::AutoStart, &images, &runtime).await?;
    let err = execute(
        Command::SkipStep {
            tutorial_id: "images-mvp-first-upload".to_string(),
            step_id: "gps-map".to_string(),
        },
        &images,
        &runtime,
    )
    .await
    .unwrap_err();

    assert!(format!("{err:#}").contains("disabled"));
    Ok(())
}

#[tokio::test]
async fn recorded_samples_are_penalised_in_recommendations() -> anyhow::Result<()> {
    let dir = TempDir::new()?;
    let recommend = || Command::Recommend {
        use_case: "personal".to_string(),
        level: "beginner".to_string(),
        file_types: Vec::new(),
        goals: Vec::new(),
        industry: None,
        limit: Some(3),
        processed: Vec::new(),
    };

    let before = run(&dir, recommend()).await?;
    assert_eq!(before["samples"][0]["id"], "smartphone-photo");

    let recorded = run(
        &dir,
        Command::RecordSample {
            sample_id: "smartphone-photo".to_string(),
        },
    )
    .await?;
    assert_eq!(recorded["count"], 1);

    let after = run(&dir, recommend()).await?;
    let first_score = |doc: &Value, id: &str| {
        doc["samples"]
            .as_array()
            .and_then(|samples| samples.iter().find(|s| s["id"] == id))
            .and_then(|s| s["score"].as_i64())
    };
    assert_eq!(
        first_score(&after, "smartphone-photo").unwrap(),
        first_score(&before, "smartphone-photo").unwrap() - 15
    );
    Ok(())
}

#[tokio::test]
async fn tutorials_lists_the_configured_ui_version() -> anyhow::Result<()> {
    let dir = TempDir::new()?;

    let listing = run(&dir, Command::Tutorials).await?;

    assert_eq!(listing["uiVersion"], "v2");
    assert_eq!(listing["tutorials"][0]["id"], "v2-getting-started");
    assert_eq!(listing["maxSkipCount"], 5);
    Ok(())
}

#[tokio::test]
async fn tutorials_of_another_ui_version_cannot_be_started() -> anyhow::Result<()> {
    let dir = TempDir::new()?;

    let err = run(
        &dir,
        Command::Start {
            tutorial_id: "images-mvp-first-upload".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert!(err.to_string().contains("images-mvp-first-upload"));
    let progress = run(&dir, Command::Progress).await?;
    assert!(progress["progress"]["activeTutorial"].is_null());
    Ok(())
}

#[tokio::test]
async fn dismissed_tutorial_is_not_auto_started_again() -> anyhow::Result<()> {
    let dir = TempDir::new()?;

    let first = run(&dir, Command::AutoStart).await?;
    assert_eq!(first["outcome"], "saved");
    run(
        &dir,
        Command::Dismiss {
            tutorial_id: "v2-getting-started".to_string(),
        },
    )
    .await?;

    let again = run(&dir, Command::AutoStart).await?;
    assert_eq!(again["outcome"], "unchanged");
    assert!(again["state"]["progress"]["activeTutorial"].is_null());
    Ok(())
}
