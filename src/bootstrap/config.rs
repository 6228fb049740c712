//! # Configuration Loader / 配置加载器
//!
//! Pure data loading: read the TOML file and map it onto [`AppConfig`].
//! No validation happens here.
//!
//! 仅纯数据加载，不做校验。

use std::path::{Path, PathBuf};

use anyhow::Context;
use me_core::config::AppConfig;

/// Load configuration from a TOML file.
///
/// # Errors / 错误
///
/// - File cannot be read (I/O error)
/// - Content is not valid TOML or does not map onto `AppConfig`
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    AppConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))
}

/// Resolve the configuration the binary runs with.
///
/// A missing file (or no path at all) yields defaults; `data_dir_override`
/// replaces whatever `data_dir` the file carries.
pub fn resolve_config(
    config_path: Option<&Path>,
    data_dir_override: Option<PathBuf>,
) -> anyhow::Result<AppConfig> {
    let mut config = match config_path {
        Some(path) if path.exists() => load_config(path)?,
        _ => AppConfig::default(),
    };

    if let Some(data_dir) = data_dir_override {
        config.data_dir = data_dir;
    }
    Ok(config)
}
