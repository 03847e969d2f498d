//! Command implementations.

pub mod audit;
pub mod config;
pub mod matching;
pub mod packages;
pub mod version;

use anyhow::Result;
use sshd_audit::{AuditSettings, SshdServer};

use crate::output::OutputFormat;

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Settings with command-line overrides applied
    pub settings: AuditSettings,

    /// Output format
    pub output_format: OutputFormat,
}

impl Context {
    /// Locate the sshd binary and build the target.
    pub async fn server(&self) -> Result<SshdServer> {
        let env = self.settings.environment();
        Ok(SshdServer::resolve(env, self.settings.server_options()).await?)
    }

    /// Print `value` as pretty JSON on stdout.
    pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    }
}
