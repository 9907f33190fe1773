//! Error types for loading user-access data and writing reports.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning a CSV file into a [`crate::record::UserTable`].
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// The file could not be opened or read
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The CSV itself is broken: inconsistent column count, invalid UTF-8, ...
    #[error("Malformed CSV in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// One or more required header columns are absent
    #[error("Missing required column(s) in {path}: {}", .columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    /// A LastLogin value could not be parsed and the strict policy is active
    #[error("Invalid LastLogin value {value:?} on row {row} of {path}")]
    InvalidLastLogin {
        path: PathBuf,
        row: usize,
        value: String,
    },
}

/// The report text could not be written to its destination.
#[derive(Debug, Error)]
#[error("Cannot write report to {path}: {source}")]
pub struct ReportWriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Errors raised while reading the TOML configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Umbrella error for the command-line front end
#[derive(Debug, Error)]
pub enum AuditError {
    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error(transparent)]
    ReportWrite(#[from] ReportWriteError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Terminal I/O failed (stdout closed, stdin unreadable)
    #[error("Terminal I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type alias for the command-line front end
pub type Result<T> = std::result::Result<T, AuditError>;
