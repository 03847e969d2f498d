//! Resolved target binary types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// The executable of the audited service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetBinary {
    /// Absolute path on disk
    path: PathBuf,
    /// Whether the binary is taken to be present: a default path is checked
    /// on disk, an explicit path is trusted without a check
    exists: bool,
    /// Whether the path was supplied by the caller rather than defaulted
    explicit: bool,
}

impl TargetBinary {
    /// A binary path supplied by the caller. Trusted without an existence check.
    pub fn explicit(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            exists: true,
            explicit: true,
        }
    }

    /// A platform default path that was found on disk.
    pub fn resolved_default(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            exists: true,
            explicit: false,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True for a default path found on disk and for any explicit path.
    ///
    /// An explicit path is not checked here; a wrong one surfaces as a
    /// probe failure instead.
    #[must_use]
    pub const fn exists(&self) -> bool {
        self.exists
    }

    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        self.explicit
    }

    /// File name of the binary, or the full path if it has none.
    #[must_use]
    pub fn name(&self) -> String {
        self.path.file_name().map_or_else(
            || self.path.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        )
    }
}

/// Files of a target keyed by logical name (e.g. `sshd`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSystemMap(BTreeMap<String, TargetBinary>);

impl FileSystemMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binary under a logical key, replacing any previous entry.
    pub fn register(&mut self, key: impl Into<String>, binary: TargetBinary) {
        self.0.insert(key.into(), binary);
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&TargetBinary> {
        self.0.get(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
