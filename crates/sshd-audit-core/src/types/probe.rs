//! Process output and version probe results.

use serde::{Deserialize, Serialize};

/// How a child process finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    /// Ran to completion with a success exit code
    Completed,
    /// Failed to spawn, was killed, or exited non-zero
    Error,
    /// Killed by the executor after its timeout elapsed
    TimedOut,
}

/// Captured output of one process execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessOutput {
    pub status: ProcessStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn new(status: ProcessStatus, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            status,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// Which accepted outcome a version probe was classified as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeMode {
    /// Process completed; version read from stdout, or stderr when stdout was empty
    Completed,
    /// Process rejected the flag but printed its banner to stderr
    UnknownOption,
}

/// Outcome of one version probe invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionProbeResult {
    pub raw_stdout: String,
    pub raw_stderr: String,
    pub exit_status: ProcessStatus,
    /// Accepted mode, `None` when the output was not recognized
    pub mode: Option<ProbeMode>,
    /// Version token, `None` when extraction failed
    pub extracted_version: Option<String>,
}

impl VersionProbeResult {
    /// Start a result from raw process output with nothing classified yet.
    #[must_use]
    pub fn from_output(output: &ProcessOutput) -> Self {
        Self {
            raw_stdout: output.stdout.clone(),
            raw_stderr: output.stderr.clone(),
            exit_status: output.status,
            mode: None,
            extracted_version: None,
        }
    }

    /// True when the probe was accepted and yielded a non-empty version.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.mode.is_some() && self.extracted_version.as_deref().is_some_and(|v| !v.is_empty())
    }
}
