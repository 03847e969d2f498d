//! Audit report -- the result of one run against one target.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sshd_audit_core::{ModuleIdentity, ProbeMode, Result, TargetBinary};
use std::path::PathBuf;

use crate::rules::{RuleFinding, Severity};
use crate::server::{AuditTarget, SshdServer};

/// Complete result of auditing one sshd instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    /// Unique node identifier (machine-id or hostname)
    pub node_id: String,
    pub collected_at: DateTime<Utc>,
    pub server_id: String,
    pub server_label: String,
    pub binary: TargetBinary,
    /// SHA-256 of the binary, `None` if it could not be read
    pub binary_sha256: Option<String>,
    pub version: String,
    pub probe_mode: Option<ProbeMode>,
    pub packages: Vec<ModuleIdentity>,
    pub configuration_file: PathBuf,
    pub configuration_parsed: bool,
    /// Parse or IO diagnostics when the configuration did not parse
    pub configuration_errors: Vec<String>,
    pub findings: Vec<RuleFinding>,
    pub summary: FindingSummary,
}

/// Counts over rule findings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingSummary {
    pub evaluated: usize,
    pub passed: usize,
    pub failed: usize,
    /// Failed findings of high or critical severity
    pub failed_high: usize,
}

impl FindingSummary {
    #[must_use]
    pub fn from_findings(findings: &[RuleFinding]) -> Self {
        let failed: Vec<_> = findings.iter().filter(|f| !f.passed).collect();
        Self {
            evaluated: findings.len(),
            passed: findings.len() - failed.len(),
            failed: failed.len(),
            failed_high: failed.iter().filter(|f| f.severity >= Severity::High).count(),
        }
    }
}

impl AuditReport {
    /// Build a report from a probed server.
    ///
    /// # Errors
    ///
    /// `NotInitialized` if the server has not been probed or its modules
    /// have not been built.
    pub fn from_server(
        server: &SshdServer,
        node_id: String,
        binary_sha256: Option<String>,
        findings: Vec<RuleFinding>,
    ) -> Result<Self> {
        let version = server.get_version()?.to_string();
        let packages = server.get_packages(&[])?;

        let record = server.configuration_record();
        let configuration_errors: Vec<String> = record
            .map(|r| {
                r.parse_error()
                    .map(ToString::to_string)
                    .into_iter()
                    .chain(r.io_error().map(ToString::to_string))
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            node_id,
            collected_at: Utc::now(),
            server_id: server.server_id().to_string(),
            server_label: server.server_label().to_string(),
            binary: server.binary().clone(),
            binary_sha256,
            version,
            probe_mode: server.last_probe().and_then(|p| p.mode),
            packages,
            configuration_file: server.configuration_file().to_path_buf(),
            configuration_parsed: record.is_some_and(|r| r.is_parsed()),
            configuration_errors,
            summary: FindingSummary::from_findings(&findings),
            findings,
        })
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
