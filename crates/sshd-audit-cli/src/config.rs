//! Settings file location and CLI overrides.

use anyhow::Result;
use directories::ProjectDirs;
use sshd_audit::AuditSettings;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::args::Cli;

/// Default settings file path.
pub fn default_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("is", "i1", "sshd-audit")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

    Ok(dirs.config_dir().join("settings.toml"))
}

/// Load settings from `--settings` or the default path, then apply flag overrides.
pub fn load(cli: &Cli) -> Result<AuditSettings> {
    let path = match &cli.settings {
        Some(p) => p.clone(),
        None => default_path()?,
    };
    debug!(path = %path.display(), exists = path.exists(), "loading settings");
    let mut settings = AuditSettings::load(&path)?;
    apply_overrides(&mut settings, cli);
    Ok(settings)
}

fn apply_overrides(settings: &mut AuditSettings, cli: &Cli) {
    if let Some(root) = &cli.root {
        settings.root.clone_from(root);
    }
    if let Some(binary) = &cli.binary {
        settings.binary = Some(binary.clone());
    }
    if let Some(file) = &cli.config_file {
        settings.config_file = Some(file.clone());
    }
    if let Some(secs) = cli.timeout {
        settings.probe_timeout_secs = Some(secs);
    }
}

/// Rules file from the command line, else from settings.
pub fn rules_path<'a>(flag: Option<&'a Path>, settings: &'a AuditSettings) -> Option<&'a Path> {
    flag.or(settings.rules.as_deref())
}
