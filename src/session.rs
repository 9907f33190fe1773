//! Holder for the currently loaded table.
//!
//! Lifecycle is none -> loaded -> reloaded -> ... A reload only replaces the
//! table once the new file has loaded completely; a failed reload leaves the
//! previous table in place.

use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::DataLoadError;
use crate::loader::{self, MissingLoginPolicy};
use crate::record::UserTable;

/// A table together with the file it came from
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub source: PathBuf,
    pub table: UserTable,
}

#[derive(Debug, Default)]
pub struct Session {
    policy: MissingLoginPolicy,
    current: Option<LoadedTable>,
}

impl Session {
    pub fn new(policy: MissingLoginPolicy) -> Self {
        Self {
            policy,
            current: None,
        }
    }

    /// Loads `path` and, on success, makes it the current table.
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<&LoadedTable, DataLoadError> {
        let path = path.as_ref();
        match loader::load(path, self.policy) {
            Ok(table) => {
                if let Some(previous) = &self.current {
                    info!(
                        "Replacing {} ({} rows) with {}",
                        previous.source.display(),
                        previous.table.len(),
                        path.display()
                    );
                }
                let loaded: &LoadedTable = self.current.insert(LoadedTable {
                    source: path.to_path_buf(),
                    table,
                });
                Ok(loaded)
            }
            Err(e) => {
                if self.current.is_some() {
                    warn!("Load of {} failed, keeping previous data", path.display());
                }
                Err(e)
            }
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&LoadedTable> {
        self.current.as_ref()
    }

    pub fn table(&self) -> Option<&UserTable> {
        self.current.as_ref().map(|loaded| &loaded.table)
    }
}
