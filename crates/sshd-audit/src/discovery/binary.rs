//! Binary resolution -- explicit path or platform default.

use sshd_audit_core::{AuditError, Result, TargetBinary};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::environment::{AuditEnvironment, Platform};

/// Logical key the resolved binary is registered under.
pub const SSHD_BINARY_KEY: &str = "sshd";

/// Default configuration file, host-absolute, on every platform.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/ssh/sshd_config";

/// Default binary location for a platform, host-absolute.
#[must_use]
pub fn default_binary_path(platform: Platform) -> PathBuf {
    if platform.is_unix_like() {
        PathBuf::from("/usr/sbin/sshd")
    } else {
        PathBuf::from("/usr/sbin/sshd.exe")
    }
}

/// Resolve the sshd binary.
///
/// An explicit path is trusted as-is. Otherwise the platform default is
/// checked through the environment's filesystem.
///
/// # Errors
///
/// Returns `AuditError::MissingBinary` if no path was given and the default
/// does not exist.
pub async fn locate_binary(env: &AuditEnvironment, explicit: Option<&Path>) -> Result<TargetBinary> {
    if let Some(path) = explicit {
        debug!(path = %path.display(), "using explicit sshd binary");
        return Ok(TargetBinary::explicit(path));
    }

    let default = default_binary_path(env.platform());
    if !env.fs().file_exists(&default).await {
        let err = AuditError::MissingBinary { path: default };
        env.sink().error_source(&err);
        return Err(err);
    }

    let handle = env.fs().construct_file(&default);
    debug!(path = %handle.path().display(), "resolved default sshd binary");
    Ok(TargetBinary::resolved_default(handle.path()))
}
