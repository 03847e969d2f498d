//! Filesystem access relative to the audited host's root.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

/// A file on the audited host, addressed by its host path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    path: PathBuf,
}

impl FileHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn name(&self) -> String {
        self.path.file_name().map_or_else(
            || self.path.display().to_string(),
            |n| n.to_string_lossy().into_owned(),
        )
    }
}

/// Filesystem of the audited host.
///
/// Paths passed in are host-absolute (`/usr/sbin/sshd`); implementations
/// decide where that lives, e.g. under a mounted image root.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// True if `path` exists and is a regular file.
    async fn file_exists(&self, path: &Path) -> bool;

    /// Build a handle for `path` without touching the disk.
    fn construct_file(&self, path: &Path) -> FileHandle;

    async fn read_to_string(&self, file: &FileHandle) -> std::io::Result<String>;
}

/// Local disk, optionally rooted somewhere other than `/`.
#[derive(Debug, Clone)]
pub struct LocalFileSystem {
    root: PathBuf,
}

impl Default for LocalFileSystem {
    fn default() -> Self {
        Self::new("/")
    }
}

impl LocalFileSystem {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a host-absolute path under the root.
    ///
    /// `..` is resolved lexically and stops at the root, so the result never
    /// leaves it.
    #[must_use]
    pub fn combine(&self, path: &Path) -> PathBuf {
        let mut relative = PathBuf::new();
        for component in path.components() {
            match component {
                Component::Normal(part) => relative.push(part),
                Component::ParentDir => {
                    relative.pop();
                }
                Component::RootDir | Component::Prefix(_) | Component::CurDir => {}
            }
        }
        self.root.join(relative)
    }
}

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn file_exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(self.combine(path))
            .await
            .is_ok_and(|m| m.is_file())
    }

    fn construct_file(&self, path: &Path) -> FileHandle {
        FileHandle::new(self.combine(path))
    }

    async fn read_to_string(&self, file: &FileHandle) -> std::io::Result<String> {
        tokio::fs::read_to_string(file.path()).await
    }
}
