//! Runtime configuration.
//!
//! Resolution order, later wins:
//! 1. built-in defaults,
//! 2. optional JSON file,
//! 3. `FYYUR_DB_PATH`, `FYYUR_LOG_LEVEL`, `FYYUR_LOG_DIR` environment
//!    variables (blank values are ignored).

use crate::logging::{default_log_level, normalize_level};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const DB_PATH_ENV: &str = "FYYUR_DB_PATH";
pub const LOG_LEVEL_ENV: &str = "FYYUR_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "FYYUR_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "fyyur.sqlite3";

/// Settings shared by every entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite database file.
    pub database_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files. `None` disables logging.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Loads defaults, then `path` if given, then process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, String> {
        let env: HashMap<String, String> = std::env::vars()
            .filter(|(key, _)| key.starts_with("FYYUR_"))
            .collect();
        Self::load_with_env(path, &env)
    }

    /// Same as [`AppConfig::load`] with an explicit environment map.
    pub fn load_with_env(
        path: Option<&Path>,
        env: &HashMap<String, String>,
    ) -> Result<Self, String> {
        let mut config = match path {
            Some(path) => read_config_file(path)?,
            None => Self::default(),
        };
        config.apply_env(env);
        normalize_level(&config.log_level)?;
        Ok(config)
    }

    fn apply_env(&mut self, env: &HashMap<String, String>) {
        let lookup = |key: &str| {
            env.get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        if let Some(path) = lookup(DB_PATH_ENV) {
            self.database_path = PathBuf::from(path);
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            self.log_level = level;
        }
        if let Some(dir) = lookup(LOG_DIR_ENV) {
            self.log_dir = Some(PathBuf::from(dir));
        }
    }
}

fn read_config_file(path: &Path) -> Result<AppConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config `{}`: {err}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|err| format!("invalid config `{}`: {err}", path.display()))
}
