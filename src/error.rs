use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Missing required env var: {0}")]
    MissingEnv(&'static str),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Error parsing config file {path:?}: {source}")]
    ConfigError {
        path: PathBuf,
        #[source]
        source: json5::Error,
    },
    #[error("CurseForge API error {status}: {body}")]
    ApiError { status: u16, body: String },
    #[error("Error sending request: {0}")]
    TransportError(#[from] ureq::Transport),
    #[error(transparent)]
    IoError(#[from] io::Error),
    #[error("Error parsing JSON: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("No ServerFiles-*.zip (or isServerPack=true) found for this project")]
    NoServerFiles,
    #[error("Could not parse a server version from file name {0:?}")]
    NoVersion(String),
    #[error("Pattern not found in launch file: {0}")]
    PatternNotFound(String),
}

impl SyncError {
    /// Whether the run failed before contacting the API
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Self::MissingEnv(_) | Self::InvalidConfig(_) | Self::ConfigError { .. }
        )
    }
}
