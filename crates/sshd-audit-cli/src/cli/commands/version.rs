//! `sshd-audit version` - Probe the sshd version.

use anyhow::Result;
use colored::Colorize;
use sshd_audit::AuditTarget;

use super::Context;
use crate::output::OutputFormat;

pub async fn execute(ctx: Context) -> Result<()> {
    let mut server = ctx.server().await?;
    let version = server.probe_version().await?;

    match ctx.output_format {
        OutputFormat::Json => {
            Context::print_json(&serde_json::json!({
                "server_id": server.server_id(),
                "binary": server.binary(),
                "version": version,
                "probe_mode": server.last_probe().and_then(|p| p.mode),
            }))?;
        }
        OutputFormat::Pretty => {
            println!(
                "{} {}",
                server.binary().path().display().to_string().dimmed(),
                version.cyan().bold()
            );
        }
    }

    Ok(())
}
