use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use fraudscope_engine::{AnimatorSettings, BackendSettings, EngineSettings};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::logging::LogDestination;

pub const CONFIG_FILENAME: &str = "fraudscope.ron";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: ron::error::SpannedError,
    },
}

/// Dashboard settings. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub backend_url: String,
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub max_response_bytes: u64,
    pub export_dir: PathBuf,
    pub log_destination: LogDestination,
    pub animator: AnimatorConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimatorConfig {
    pub cadence_ms: u64,
    pub max_increment: u64,
    pub fraud_probability: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let backend = BackendSettings::default();
        Self {
            backend_url: backend.base_url,
            connect_timeout_ms: None,
            request_timeout_ms: None,
            max_response_bytes: backend.max_response_bytes,
            export_dir: PathBuf::from("exports"),
            log_destination: LogDestination::default(),
            animator: AnimatorConfig::default(),
        }
    }
}

impl Default for AnimatorConfig {
    fn default() -> Self {
        let animator = AnimatorSettings::default();
        Self {
            cadence_ms: animator.cadence.as_millis() as u64,
            max_increment: animator.max_increment,
            fraud_probability: animator.fraud_probability,
        }
    }
}

impl DashboardConfig {
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            backend: BackendSettings {
                base_url: self.backend_url.clone(),
                connect_timeout: self.connect_timeout_ms.map(Duration::from_millis),
                request_timeout: self.request_timeout_ms.map(Duration::from_millis),
                max_response_bytes: self.max_response_bytes,
            },
            animator: AnimatorSettings {
                cadence: Duration::from_millis(self.animator.cadence_ms),
                max_increment: self.animator.max_increment,
                fraud_probability: self.animator.fraud_probability,
            },
        }
    }
}

/// Reads the config file. A missing file is not an error and yields `None`.
pub fn load(path: &Path) -> Result<Option<DashboardConfig>, ConfigError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    ron::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}
