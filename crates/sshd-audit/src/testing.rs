//! In-memory collaborators for unit tests.

use async_trait::async_trait;
use sshd_audit_core::{ProcessOutput, ProcessStatus};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::environment::{AuditEnvironment, FileHandle, FileSystem, Platform, ProcessExecutor, StatusSink};

/// Returns the same output for every execution and records the calls.
pub struct ScriptedExecutor {
    output: ProcessOutput,
    pub calls: Mutex<Vec<(PathBuf, Vec<String>)>>,
}

impl ScriptedExecutor {
    pub fn new(status: ProcessStatus, stdout: &str, stderr: &str) -> Self {
        Self {
            output: ProcessOutput::new(status, stdout, stderr),
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl ProcessExecutor for ScriptedExecutor {
    async fn execute(&self, path: &Path, args: &[&str]) -> ProcessOutput {
        self.calls.lock().unwrap().push((
            path.to_path_buf(),
            args.iter().map(ToString::to_string).collect(),
        ));
        self.output.clone()
    }
}

/// Files held in a map. Paths missing from the map do not exist.
#[derive(Default)]
pub struct MemoryFileSystem {
    files: HashMap<PathBuf, std::result::Result<String, std::io::ErrorKind>>,
}

impl MemoryFileSystem {
    pub fn with_file(mut self, path: &str, contents: &str) -> Self {
        self.files.insert(PathBuf::from(path), Ok(contents.to_string()));
        self
    }

    /// A file that exists but fails to read with `kind`.
    pub fn with_unreadable(mut self, path: &str, kind: std::io::ErrorKind) -> Self {
        self.files.insert(PathBuf::from(path), Err(kind));
        self
    }
}

#[async_trait]
impl FileSystem for MemoryFileSystem {
    async fn file_exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn construct_file(&self, path: &Path) -> FileHandle {
        FileHandle::new(path)
    }

    async fn read_to_string(&self, file: &FileHandle) -> std::io::Result<String> {
        match self.files.get(file.path()) {
            Some(Ok(s)) => Ok(s.clone()),
            Some(Err(kind)) => Err(std::io::Error::new(*kind, "scripted read failure")),
            None => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such file",
            )),
        }
    }
}

/// Records every message with its kind.
#[derive(Default)]
pub struct RecordingSink {
    pub messages: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingSink {
    pub fn count(&self, kind: &str) -> usize {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }

    pub fn contains(&self, kind: &str, needle: &str) -> bool {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .any(|(k, m)| *k == kind && m.contains(needle))
    }
}

impl StatusSink for RecordingSink {
    fn status(&self, message: &str) {
        self.messages.lock().unwrap().push(("status", message.to_string()));
    }

    fn success(&self, message: &str) {
        self.messages.lock().unwrap().push(("success", message.to_string()));
    }

    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push(("error", message.to_string()));
    }
}

/// Environment wired to the given doubles, plus handles to inspect them.
pub fn environment(
    platform: Platform,
    executor: ScriptedExecutor,
    fs: MemoryFileSystem,
) -> (AuditEnvironment, Arc<ScriptedExecutor>, Arc<RecordingSink>) {
    let executor = Arc::new(executor);
    let sink = Arc::new(RecordingSink::default());
    let env = AuditEnvironment::new(platform, executor.clone(), Arc::new(fs), sink.clone());
    (env, executor, sink)
}
