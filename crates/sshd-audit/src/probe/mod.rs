//! Version probing -- run the binary, classify the outcome, extract a version.
//!
//! sshd has no real version flag. Invoking it with `-?` makes it reject
//! the option and print `unknown option -- ?`, then the version banner,
//! then usage. Depending on the build that lands on stdout or stderr and
//! the process exits either cleanly or with an error. The classification
//! below accepts exactly two shapes:
//!
//! 1. the process completed: read stdout, or stderr when stdout is empty
//! 2. the process failed, stdout is empty and stderr contains
//!    `unknown option`: read stderr
//!
//! Everything else is a [`AuditError::ProbeExecution`].

pub mod extract;

use sshd_audit_core::{
    AuditError, ProbeMode, ProcessOutput, ProcessStatus, Result, TargetBinary, VersionProbeResult,
};
use std::time::Instant;
use tracing::debug;

use crate::environment::AuditEnvironment;

pub use extract::{NthNonEmptyLine, TooFewLines, VersionExtractor};

/// How a service is asked for its version and how the answer is read.
pub struct ProbePolicy {
    /// The single argument passed to the binary
    pub flag: &'static str,
    /// stderr substring that marks an accepted flag rejection
    pub unknown_option_marker: &'static str,
    pub extractor: Box<dyn VersionExtractor>,
}

impl ProbePolicy {
    /// OpenSSH sshd: `-?`, second non-empty line.
    #[must_use]
    pub fn sshd() -> Self {
        Self {
            flag: "-?",
            unknown_option_marker: "unknown option",
            extractor: Box::new(NthNonEmptyLine(1)),
        }
    }
}

impl std::fmt::Debug for ProbePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbePolicy")
            .field("flag", &self.flag)
            .field("unknown_option_marker", &self.unknown_option_marker)
            .finish_non_exhaustive()
    }
}

/// Classify raw process output and extract the version.
///
/// # Errors
///
/// `ProbeExecution` when the output matches neither accepted shape,
/// `VersionExtraction` when it does but has fewer lines than needed.
pub fn classify(
    policy: &ProbePolicy,
    binary_name: &str,
    output: &ProcessOutput,
) -> Result<VersionProbeResult> {
    let mut result = VersionProbeResult::from_output(output);

    let (mode, effective) = if output.status == ProcessStatus::Completed {
        let effective = if !output.stderr.is_empty() && output.stdout.is_empty() {
            &output.stderr
        } else {
            &output.stdout
        };
        (ProbeMode::Completed, effective)
    } else if !output.stderr.is_empty()
        && output.stdout.is_empty()
        && output.stderr.contains(policy.unknown_option_marker)
    {
        (ProbeMode::UnknownOption, &output.stderr)
    } else {
        return Err(AuditError::ProbeExecution {
            binary: binary_name.to_string(),
            stderr: output.stderr.clone(),
        });
    };

    let version = policy
        .extractor
        .extract(effective)
        .map_err(|short| AuditError::VersionExtraction {
            binary: binary_name.to_string(),
            lines: short.found,
        })?;

    result.mode = Some(mode);
    result.extracted_version = Some(version);
    Ok(result)
}

/// Run the version probe against `binary`.
///
/// Reports progress and the outcome through the environment's status sink.
pub async fn probe_version(
    env: &AuditEnvironment,
    binary: &TargetBinary,
    policy: &ProbePolicy,
    label: &str,
) -> Result<VersionProbeResult> {
    let started = Instant::now();
    env.sink().status(&format!("Scanning {label} version."));

    let output = env.executor().execute(binary.path(), &[policy.flag]).await;
    debug!(
        status = ?output.status,
        stdout_len = output.stdout.len(),
        stderr_len = output.stderr.len(),
        "version probe finished"
    );

    match classify(policy, &binary.name(), &output) {
        Ok(result) => {
            env.sink().success(&format!(
                "Got {label} version {} in {} ms.",
                result.extracted_version.as_deref().unwrap_or_default(),
                started.elapsed().as_millis()
            ));
            Ok(result)
        }
        Err(e) => {
            env.sink().error_source(&e);
            Err(e)
        }
    }
}
