use std::{
    env, fs,
    path::{Path, PathBuf},
};

use dirs::home_dir;

use crate::errors::Result;

/// Environment variable overriding the application data directory.
pub const HOME_ENV: &str = "COST_SIMULATOR_HOME";

const DEFAULT_DIR_NAME: &str = ".cost_simulator";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const CONTENT_DIR: &str = "content";
const BACKUP_DIR: &str = "backups";

/// Resolves where configuration and content live under the data directory.
pub struct PathResolver;

impl PathResolver {
    /// `$COST_SIMULATOR_HOME`, defaulting to `~/.cost_simulator`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(custom: Option<PathBuf>) -> PathBuf {
        custom.unwrap_or_else(Self::base_dir)
    }

    pub fn config_dir_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_FILE)
    }

    pub fn config_backup_dir_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(BACKUP_DIR)
    }

    pub fn content_dir_in(base: &Path) -> PathBuf {
        base.join(CONTENT_DIR)
    }

    pub fn content_backup_dir_in(base: &Path) -> PathBuf {
        Self::content_dir_in(base).join(BACKUP_DIR)
    }
}

/// Creates the directory and its parents when missing.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
