use std::path::PathBuf;

use me_core::{
    app_dirs::AppDirs,
    ports::{AppDirsError, AppDirsPort},
};

const APP_DIR_NAME: &str = "metaextract";

/// `ME_PROFILE=dev` resolves to `metaextract-dev`, keeping profiles apart.
fn resolved_app_dir_name() -> String {
    match std::env::var("ME_PROFILE") {
        Ok(profile) if !profile.is_empty() => format!("{APP_DIR_NAME}-{profile}"),
        _ => APP_DIR_NAME.to_string(),
    }
}

pub struct DirsAppDirsAdapter {
    base_data_local_dir_override: Option<PathBuf>,
}

impl Default for DirsAppDirsAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl DirsAppDirsAdapter {
    pub fn new() -> Self {
        Self {
            base_data_local_dir_override: None,
        }
    }

    /// Resolve under `base` instead of the system data-local directory.
    pub fn with_base_data_local_dir(base: PathBuf) -> Self {
        Self {
            base_data_local_dir_override: Some(base),
        }
    }

    pub fn base_data_local_dir(&self) -> Option<PathBuf> {
        if let Some(base) = &self.base_data_local_dir_override {
            return Some(base.clone());
        }
        dirs::data_local_dir()
    }
}

impl AppDirsPort for DirsAppDirsAdapter {
    fn get_app_dirs(&self) -> Result<AppDirs, AppDirsError> {
        let base = self
            .base_data_local_dir()
            .ok_or(AppDirsError::DataLocalDirUnavailable)?;
        Ok(AppDirs {
            app_data_root: base.join(resolved_app_dir_name()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_data_root_is_under_base_dir() {
        let adapter = DirsAppDirsAdapter::with_base_data_local_dir(PathBuf::from("/tmp/base"));
        let dirs = adapter.get_app_dirs().unwrap();

        assert!(dirs.app_data_root.starts_with("/tmp/base"));
        assert!(dirs
            .app_data_root
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(APP_DIR_NAME)));
        assert_eq!(dirs.logs_dir(), dirs.app_data_root.join("logs"));
    }
}
