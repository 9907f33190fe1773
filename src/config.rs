//! TOML configuration.
//!
//! ```toml
//! data_path = "users_access.csv"
//! report_path = "report.txt"
//! threshold_days = 90
//! missing_login = "inactive"   # or "reject"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::Deserialize;

use crate::error::ConfigError;
use crate::inactivity::{DEFAULT_THRESHOLD_DAYS, InactivityThreshold};
use crate::loader::MissingLoginPolicy;

/// Config file picked up from the working directory when `--config` is absent
pub const DEFAULT_CONFIG_FILE: &str = "user_access_audit.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuditConfig {
    /// CSV loaded when no input is given on the command line
    pub data_path: PathBuf,
    /// Destination of the generated report
    pub report_path: PathBuf,
    pub threshold_days: i64,
    pub missing_login: MissingLoginPolicy,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("users_access.csv"),
            report_path: PathBuf::from("report.txt"),
            threshold_days: DEFAULT_THRESHOLD_DAYS,
            missing_login: MissingLoginPolicy::default(),
        }
    }
}

impl AuditConfig {
    pub fn threshold(&self) -> InactivityThreshold {
        InactivityThreshold::days(self.threshold_days)
    }

    pub fn from_toml_str(text: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads an explicit config file; it must exist
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Reads `explicit` if given, else [`DEFAULT_CONFIG_FILE`] if it exists,
    /// else returns defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        let fallback = Path::new(DEFAULT_CONFIG_FILE);
        if fallback.is_file() {
            debug!("Using config file {}", fallback.display());
            Self::from_file(fallback)
        } else {
            Ok(Self::default())
        }
    }
}
