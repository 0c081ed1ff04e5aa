//! Daemon configuration.
//!
//! Loaded from a TOML file; every section falls back to its defaults, so an
//! empty file is a valid configuration. Command-line flags and environment
//! variables override the file (see `main.rs`).

use std::path::{Path, PathBuf};

use pass_checkin::CheckInConfig;
use pass_ledger::PointsConfig;
use pass_profile::ProfileConfig;
use pass_utils::LogFormat;
use pass_verification::VerifierConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Directory holding the LMDB environment.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Largest positive amount one credit or grant may assign.
    #[serde(default = "default_max_grant")]
    pub max_grant: i64,

    #[serde(default)]
    pub points: PointsConfig,

    #[serde(default)]
    pub check_in: CheckInConfig,

    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub verifier: VerifierConfig,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./pass_data")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_grant() -> i64 {
    1_000
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            max_grant: default_max_grant(),
            points: PointsConfig::default(),
            check_in: CheckInConfig::default(),
            profile: ProfileConfig::default(),
            verifier: VerifierConfig::default(),
        }
    }
}

impl DaemonConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
