//! `sshd-audit packages` - List module identities for vulnerability lookup.

use anyhow::Result;
use colored::Colorize;
use sshd_audit::AuditTarget;

use super::Context;
use crate::cli::args::PackagesArgs;
use crate::output::OutputFormat;

pub async fn execute(ctx: Context, args: PackagesArgs) -> Result<()> {
    let mut server = ctx.server().await?;
    server.probe_version().await?;
    server.list_modules()?;

    let filter: Vec<&str> = args.filter.iter().map(String::as_str).collect();
    let packages = server.get_packages(&filter)?;

    match ctx.output_format {
        OutputFormat::Json => Context::print_json(&packages)?,
        OutputFormat::Pretty => {
            for p in &packages {
                println!(
                    "{}  {}  {}",
                    p.package_manager_id.dimmed(),
                    p.module_name.bold(),
                    p.version.cyan()
                );
            }
        }
    }

    Ok(())
}
