use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use me_core::app_dirs::AppDirs;
use me_core::ids::UserId;
use me_core::onboarding::UiVersion;
use metaextract_lib::bootstrap::{init_tracing_subscriber, resolve_config, resolve_data_dir, wire_dependencies};
use metaextract_lib::commands::{execute, Command, Target};
use tracing::error;

#[derive(Parser)]
#[command(name = "metaextract")]
#[command(about = "MetaExtract onboarding engine", long_about = None)]
struct Cli {
    /// Path to the TOML config file; defaults apply when it does not exist
    #[arg(long, global = true, default_value = "metaextract.toml")]
    config: PathBuf,

    /// Override `data_dir` from the config
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// User the onboarding state belongs to
    #[arg(long, global = true, default_value = "anonymous")]
    user: String,

    /// UI version: original | v2 | images-mvp (defaults to the configured one)
    #[arg(long, global = true)]
    ui: Option<UiVersion>,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{e:#}"), "Command failed");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(Some(cli.config.as_path()), cli.data_dir)?;

    let app_dirs = AppDirs {
        app_data_root: resolve_data_dir(&config)?,
    };
    if let Err(e) = init_tracing_subscriber(&app_dirs.logs_dir()) {
        eprintln!("Failed to initialize tracing: {e}");
    }

    let target = Target {
        user_id: UserId::from(cli.user),
        ui_version: cli.ui.unwrap_or(config.onboarding.default_ui_version),
    };
    let runtime = wire_dependencies(config).context("Failed to wire dependencies")?;

    let output = execute(cli.command, &target, &runtime).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
