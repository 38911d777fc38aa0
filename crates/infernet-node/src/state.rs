//! Persisted registration record.

use infernet_core::{NodeError, RegistrationRecord, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File-backed store for the node's [`RegistrationRecord`].
///
/// Writes land in a sibling temp file that is renamed over the record, so a
/// crash mid-write never leaves a truncated record behind.
#[derive(Debug, Clone)]
pub struct RegistrationStore {
    path: PathBuf,
}

impl RegistrationStore {
    /// Create a store backed by `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the record
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the record, `None` if the node never registered from here
    pub fn load(&self) -> Result<Option<RegistrationRecord>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(NodeError::State(format!(
                    "cannot read {}: {e}",
                    self.path.display()
                )))
            }
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| NodeError::State(format!("corrupt record {}: {e}", self.path.display())))
    }

    /// Persist the record
    pub fn save(&self, record: &RegistrationRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.write_error(&e))?;
        }

        let content = serde_json::to_string_pretty(record)?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, content).map_err(|e| self.write_error(&e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.write_error(&e))?;

        debug!(path = %self.path.display(), address = %record.address, "Saved registration record");
        Ok(())
    }

    /// Remove the record; a missing record is not an error
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Removed registration record");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.write_error(&e)),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_error(&self, e: &std::io::Error) -> NodeError {
        NodeError::State(format!("cannot write {}: {e}", self.path.display()))
    }
}
