use std::{
    env, fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    api::{DEFAULT_API_BASE, MAX_PAGE_SIZE},
    error::SyncError,
    select::SelectionPolicy,
};

pub const API_KEY_VAR: &str = "CURSEFORGE_API_KEY";
/// All the Mons - ATMons
pub const DEFAULT_PROJECT_ID: u64 = 1356598;

/// Everything a run needs apart from the API key
///
/// Can be loaded from a JSON5 file, missing fields fall back to the defaults
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub project_id: u64,
    pub api_base: String,
    pub page_size: u32,
    pub launch_file: PathBuf,
    pub policy: SelectionPolicy,
    #[serde(skip)]
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_id: DEFAULT_PROJECT_ID,
            api_base: DEFAULT_API_BASE.to_string(),
            page_size: MAX_PAGE_SIZE,
            launch_file: PathBuf::from("launch.sh"),
            policy: SelectionPolicy::default(),
            dry_run: false,
        }
    }
}

impl Config {
    /// # Errors
    /// * IO errors
    /// * The file isn't valid JSON5 or has fields of the wrong type
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SyncError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let config: Self = json5::from_str(&raw).map_err(|source| SyncError::ConfigError {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SyncError> {
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(SyncError::InvalidConfig(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}, got {}",
                self.page_size
            )));
        }
        if self.api_base.trim().is_empty() {
            return Err(SyncError::InvalidConfig("api_base must not be empty".into()));
        }

        Ok(())
    }
}

/// Read the API key from `CURSEFORGE_API_KEY`
///
/// # Errors
/// * The variable is unset, empty, or not unicode
pub fn api_key_from_env() -> Result<String, SyncError> {
    api_key_from(env::var(API_KEY_VAR).ok())
}

fn api_key_from(value: Option<String>) -> Result<String, SyncError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or(SyncError::MissingEnv(API_KEY_VAR))
}
