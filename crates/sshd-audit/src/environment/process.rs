//! Process execution via `tokio::process`.

use async_trait::async_trait;
use sshd_audit_core::{ProcessOutput, ProcessStatus};
use std::path::Path;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Runs a program and captures its output.
///
/// Implementations never return an error: spawn failures are reported as
/// [`ProcessStatus::Error`] with the reason in `stderr`, and an elapsed
/// timeout as [`ProcessStatus::TimedOut`] carrying whatever the program
/// wrote before it was killed.
#[async_trait]
pub trait ProcessExecutor: Send + Sync {
    async fn execute(&self, path: &Path, args: &[&str]) -> ProcessOutput;
}

/// Executes programs on the local host.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalExecutor {
    timeout: Option<Duration>,
}

impl LocalExecutor {
    #[must_use]
    pub const fn new() -> Self {
        Self { timeout: None }
    }

    /// Kill the child and report `TimedOut` once `timeout` elapses.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Grace period for the readers to collect what a killed child already wrote.
const DRAIN_GRACE: Duration = Duration::from_millis(100);

type Captured = Arc<Mutex<Vec<u8>>>;

/// Copy `reader` into a shared buffer chunk by chunk, so a partial capture
/// survives the task being aborted.
fn drain<R>(reader: Option<R>) -> (Captured, JoinHandle<()>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let captured = Captured::default();
    let sink = Arc::clone(&captured);
    let task = tokio::spawn(async move {
        let Some(mut reader) = reader else { return };
        let mut buf = [0u8; 4096];
        loop {
            match reader.read(&mut buf).await {
                Ok(0) | Err(_) => break,
                Ok(n) => {
                    if let Ok(mut out) = sink.lock() {
                        out.extend_from_slice(&buf[..n]);
                    }
                }
            }
        }
    });
    (captured, task)
}

fn collected(captured: &Captured) -> String {
    captured
        .lock()
        .map(|b| String::from_utf8_lossy(&b).into_owned())
        .unwrap_or_default()
}

#[async_trait]
impl ProcessExecutor for LocalExecutor {
    async fn execute(&self, path: &Path, args: &[&str]) -> ProcessOutput {
        debug!(path = %path.display(), ?args, "executing process");

        let mut child = match Command::new(path)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to spawn process");
                return ProcessOutput::new(ProcessStatus::Error, "", e.to_string());
            }
        };

        let (stdout, mut stdout_task) = drain(child.stdout.take());
        let (stderr, mut stderr_task) = drain(child.stderr.take());

        let waited = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait()).await.ok(),
            None => Some(child.wait().await),
        };

        let status = match waited {
            Some(Ok(exit)) => {
                // Readers end at EOF once every writer has closed its end
                let _ = tokio::join!(stdout_task, stderr_task);
                if exit.success() {
                    ProcessStatus::Completed
                } else {
                    ProcessStatus::Error
                }
            }
            Some(Err(e)) => {
                stdout_task.abort();
                stderr_task.abort();
                return ProcessOutput::new(ProcessStatus::Error, collected(&stdout), e.to_string());
            }
            None => {
                warn!(path = %path.display(), limit = ?self.timeout, "process timed out");
                if let Err(e) = child.kill().await {
                    warn!(path = %path.display(), error = %e, "failed to kill timed out process");
                }
                // Descendants may still hold the pipes open; keep what arrived
                let _ = tokio::time::timeout(DRAIN_GRACE, async {
                    let _ = tokio::join!(&mut stdout_task, &mut stderr_task);
                })
                .await;
                stdout_task.abort();
                stderr_task.abort();
                ProcessStatus::TimedOut
            }
        };

        ProcessOutput::new(status, collected(&stdout), collected(&stderr))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::probe::{classify, ProbePolicy};
    use sshd_audit_core::ProbeMode;

    #[tokio::test]
    async fn completed_captures_stdout() {
        let out = LocalExecutor::new()
            .execute(Path::new("/bin/sh"), &["-c", "printf 'a\\nb\\n'"])
            .await;
        assert_eq!(out.status, ProcessStatus::Completed);
        assert_eq!(out.stdout, "a\nb\n");
        assert!(out.stderr.is_empty());
    }

    #[tokio::test]
    async fn nonzero_exit_is_error() {
        let out = LocalExecutor::new()
            .execute(Path::new("/bin/sh"), &["-c", "echo oops >&2; exit 3"])
            .await;
        assert_eq!(out.status, ProcessStatus::Error);
        assert_eq!(out.stderr, "oops\n");
    }

    #[tokio::test]
    async fn missing_program_is_error_not_panic() {
        let out = LocalExecutor::new()
            .execute(Path::new("/nonexistent/definitely-not-here"), &["-?"])
            .await;
        assert_eq!(out.status, ProcessStatus::Error);
        assert!(!out.stderr.is_empty());
    }

    #[tokio::test]
    async fn timeout_is_reported_as_status() {
        let out = LocalExecutor::new()
            .with_timeout(Duration::from_millis(100))
            .execute(Path::new("/bin/sh"), &["-c", "sleep 5"])
            .await;
        assert_eq!(out.status, ProcessStatus::TimedOut);
    }

    #[tokio::test]
    async fn timeout_keeps_partial_output() {
        let out = LocalExecutor::new()
            .with_timeout(Duration::from_millis(500))
            .execute(
                Path::new("/bin/sh"),
                &[
                    "-c",
                    "echo 'unknown option -- ?' >&2; echo 'OpenSSH_9.6p1' >&2; sleep 5",
                ],
            )
            .await;
        assert_eq!(out.status, ProcessStatus::TimedOut);
        assert!(out.stdout.is_empty());
        assert_eq!(out.stderr, "unknown option -- ?\nOpenSSH_9.6p1\n");

        // A slow sshd that already rejected the flag still yields its version
        let result = classify(&ProbePolicy::sshd(), "sshd", &out).unwrap();
        assert_eq!(result.mode, Some(ProbeMode::UnknownOption));
        assert_eq!(result.extracted_version.as_deref(), Some("OpenSSH_9.6p1"));
    }
}
