//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use sshd_audit::AuditError;

use crate::output::OutputFormat;

/// Run the CLI application.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    crate::logging::init(cli.verbose);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let settings = crate::config::load(&cli)?;

    let ctx = commands::Context {
        settings,
        output_format: cli.output.unwrap_or(OutputFormat::Pretty),
    };

    match cli.command {
        Commands::Version => commands::version::execute(ctx).await,
        Commands::Config => commands::config::execute(ctx).await,
        Commands::Packages(args) => commands::packages::execute(ctx, args).await,
        Commands::Audit(args) => commands::audit::execute(ctx, args).await,
        Commands::MatchRule(args) => commands::matching::rule(&ctx, &args),
        Commands::MatchVuln(args) => commands::matching::vulnerability(&ctx, &args),
    }
}

/// Process exit code for an error returned by [`run`].
///
/// 2 for a fatal target error (no binary, probe or extraction failure),
/// 70 for a probe-then-use ordering bug, 1 for everything else.
#[must_use]
pub fn exit_code(err: &anyhow::Error) -> u8 {
    match err.downcast_ref::<AuditError>() {
        Some(e) if e.is_sequencing_error() => 70,
        Some(e) if e.is_fatal() => 2,
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn exit_codes_by_error_kind() {
        let missing = anyhow::Error::new(AuditError::MissingBinary {
            path: PathBuf::from("/usr/sbin/sshd"),
        });
        assert_eq!(exit_code(&missing), 2);

        let probe = anyhow::Error::new(AuditError::ProbeExecution {
            binary: "sshd".into(),
            stderr: "Permission denied".into(),
        })
        .context("probing sshd");
        assert_eq!(exit_code(&probe), 2);

        let order = anyhow::Error::new(AuditError::NotInitialized("modules"));
        assert_eq!(exit_code(&order), 70);

        let rules = anyhow::Error::new(AuditError::Rules("bad yaml".into()));
        assert_eq!(exit_code(&rules), 1);
        assert_eq!(exit_code(&anyhow::anyhow!("no config directory")), 1);
    }
}
