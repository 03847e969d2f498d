//! Host collaborators: process execution, filesystem access, status output.
//!
//! The probe never touches the host directly. Everything goes through an
//! [`AuditEnvironment`], which bundles one implementation of each trait.
//! Production code uses [`LocalExecutor`], [`LocalFileSystem`] and
//! [`TracingSink`]; tests swap in doubles.

pub mod fs;
pub mod process;
pub mod status;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub use fs::{FileHandle, FileSystem, LocalFileSystem};
pub use process::{LocalExecutor, ProcessExecutor};
pub use status::{StatusSink, TracingSink};

/// Operating system family of the audited host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Unix,
    MacOs,
    Windows,
}

impl Platform {
    /// Platform this process is running on.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(windows) {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Unix
        }
    }

    #[must_use]
    pub const fn is_unix_like(self) -> bool {
        matches!(self, Self::Unix | Self::MacOs)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix => write!(f, "unix"),
            Self::MacOs => write!(f, "macos"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

/// The collaborators one audit target runs against.
#[derive(Clone)]
pub struct AuditEnvironment {
    platform: Platform,
    executor: Arc<dyn ProcessExecutor>,
    fs: Arc<dyn FileSystem>,
    sink: Arc<dyn StatusSink>,
}

impl AuditEnvironment {
    pub fn new(
        platform: Platform,
        executor: Arc<dyn ProcessExecutor>,
        fs: Arc<dyn FileSystem>,
        sink: Arc<dyn StatusSink>,
    ) -> Self {
        Self {
            platform,
            executor,
            fs,
            sink,
        }
    }

    /// Environment backed by the local host.
    #[must_use]
    pub fn local(platform: Platform, fs: LocalFileSystem, executor: LocalExecutor) -> Self {
        Self::new(
            platform,
            Arc::new(executor),
            Arc::new(fs),
            Arc::new(TracingSink),
        )
    }

    #[must_use]
    pub const fn platform(&self) -> Platform {
        self.platform
    }

    #[must_use]
    pub fn executor(&self) -> &dyn ProcessExecutor {
        self.executor.as_ref()
    }

    #[must_use]
    pub fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }

    #[must_use]
    pub fn sink(&self) -> &dyn StatusSink {
        self.sink.as_ref()
    }
}

impl fmt::Debug for AuditEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditEnvironment")
            .field("platform", &self.platform)
            .finish_non_exhaustive()
    }
}
