// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Durable role snapshot stored as a JSON file.
//!
//! Writes go to a sibling temporary file which is then renamed over the
//! snapshot, so a crash mid-write leaves the previous snapshot intact.

use staffdesk::{RoleSnapshotStore, SnapshotError};
use staffdesk_domain::Role;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Role snapshot persisted as pretty-printed JSON.
#[derive(Debug, Clone)]
pub struct JsonFileRoleSnapshot {
    path: PathBuf,
}

impl JsonFileRoleSnapshot {
    /// Creates a snapshot store at `path`. The file need not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl RoleSnapshotStore for JsonFileRoleSnapshot {
    fn read(&self) -> Result<Option<Vec<Role>>, SnapshotError> {
        let text: String = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(SnapshotError::Io(e)),
        };
        let roles: Vec<Role> =
            serde_json::from_str(&text).map_err(|e| SnapshotError::Corrupt(e.to_string()))?;
        debug!(path = %self.path.display(), roles = roles.len(), "Read role snapshot");
        Ok(Some(roles))
    }

    fn write(&self, roles: &[Role]) -> Result<(), SnapshotError> {
        let text: String =
            serde_json::to_string_pretty(roles).map_err(|e| SnapshotError::Corrupt(e.to_string()))?;
        let temp: PathBuf = self.temp_path();
        std::fs::write(&temp, text)?;
        std::fs::rename(&temp, &self.path)?;
        debug!(path = %self.path.display(), roles = roles.len(), "Wrote role snapshot");
        Ok(())
    }
}
