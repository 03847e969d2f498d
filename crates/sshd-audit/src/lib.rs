//! # sshd-audit
//!
//! Version probe and configuration audit for the OpenSSH `sshd` server.
//!
//! Produces the package identity (`sshd` + version) a vulnerability lookup
//! needs, and evaluates configuration rules against `sshd_config`.
//!
//! ## Data Flow
//!
//! ```text
//! locate_binary()            explicit path, or /usr/sbin/sshd[.exe]
//!   -> probe_version()       sshd -?  -> classify -> 2nd non-empty line
//!   -> list_modules()        { "sshd": [ModuleIdentity] }
//!
//! load_configuration()       sshd_config -> ConfigurationRecord (never fails)
//!   -> evaluate()            rules whose version matches the probed one
//!
//! both -> AuditReport
//! ```
//!
//! The probe and the configuration load are independent; [`run_audit`]
//! runs them concurrently.

pub mod config;
pub mod discovery;
pub mod environment;
pub mod hash;
pub mod identity;
pub mod matcher;
pub mod probe;
pub mod report;
pub mod rules;
pub mod server;
pub mod settings;

#[cfg(test)]
mod testing;

pub use sshd_audit_core::{AuditError, Result};

pub use config::{SshdConfig, SshdConfigParser};
pub use environment::{AuditEnvironment, Platform};
pub use matcher::{
    is_configuration_rule_version_in_server_version_range,
    is_vulnerability_version_in_package_version_range,
};
pub use report::AuditReport;
pub use rules::RuleSet;
pub use server::{AuditServer, AuditTarget, ServerKind, ServerOptions, SshdServer};
pub use settings::AuditSettings;

use tracing::warn;

/// Run a full audit of one sshd instance.
///
/// Resolves the binary, probes the version while loading the
/// configuration, builds the module map, evaluates `rules` and
/// fingerprints the binary.
///
/// # Errors
///
/// Returns `AuditError` if the binary cannot be resolved or the version
/// probe fails. Configuration problems are reported inside the
/// [`AuditReport`] instead.
pub async fn run_audit(
    env: AuditEnvironment,
    options: ServerOptions,
    rules: &RuleSet,
) -> Result<AuditReport> {
    let mut server = SshdServer::resolve(env, options).await?;
    server.probe_and_load().await?;
    server.list_modules()?;
    let findings = server.evaluate_rules(rules)?;

    let binary_sha256 = match hash::sha256_file(server.binary().path()).await {
        Ok(digest) => Some(digest),
        Err(e) => {
            warn!(error = %e, "could not fingerprint sshd binary");
            None
        }
    };

    AuditReport::from_server(&server, get_node_id(), binary_sha256, findings)
}

/// Get a stable node identifier.
///
/// Tries `/etc/machine-id` first, then hostname.
fn get_node_id() -> String {
    if let Ok(id) = std::fs::read_to_string("/etc/machine-id") {
        let trimmed = id.trim().to_string();
        if !trimmed.is_empty() {
            return trimmed;
        }
    }

    hostname::get().map_or_else(
        |_| "unknown".to_string(),
        |h| h.to_string_lossy().into_owned(),
    )
}
