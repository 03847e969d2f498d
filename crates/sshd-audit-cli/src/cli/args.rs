//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// Probe the OpenSSH server version and audit its configuration.
///
/// Settings are read from the platform config directory unless
/// `--settings` points elsewhere. Flags override settings.
#[derive(Parser, Debug)]
#[command(name = "sshd-audit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Settings file (TOML)
    #[arg(long, env = "SSHD_AUDIT_SETTINGS", global = true)]
    pub settings: Option<PathBuf>,

    /// Root of the audited filesystem
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    /// Explicit sshd binary, used without an existence check
    #[arg(long, global = true)]
    pub binary: Option<PathBuf>,

    /// sshd_config path, absolute on the audited host
    #[arg(long, global = true)]
    pub config_file: Option<PathBuf>,

    /// Kill the version probe after this many seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe the sshd version
    Version,

    /// Parse sshd_config and show its directives
    Config,

    /// List module identities for vulnerability lookup
    Packages(PackagesArgs),

    /// Probe, parse and evaluate configuration rules
    Audit(AuditArgs),

    /// Does a configuration rule version apply to a server version?
    MatchRule(MatchArgs),

    /// Does a vulnerability version apply to a package version?
    MatchVuln(MatchArgs),
}

#[derive(Args, Debug)]
pub struct PackagesArgs {
    /// Only list these module names
    #[arg(short, long)]
    pub filter: Vec<String>,
}

#[derive(Args, Debug)]
pub struct AuditArgs {
    /// YAML rule file (default: settings, then built-in rules)
    #[arg(short, long)]
    pub rules: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct MatchArgs {
    /// Rule or vulnerability version expression
    pub expression: String,

    /// Server or package version
    #[arg(id = "target_version", value_name = "VERSION")]
    pub version: String,
}
