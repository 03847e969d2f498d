//! Audit settings loaded from TOML.

use serde::{Deserialize, Serialize};
use sshd_audit_core::{AuditError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::environment::{AuditEnvironment, LocalExecutor, LocalFileSystem, Platform};
use crate::server::{ServerOptions, DEFAULT_PACKAGE_MANAGER_ID};

/// Settings for one audit run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSettings {
    /// Root of the audited host's filesystem (default: `/`).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Explicit sshd binary. Trusted without an existence check.
    #[serde(default)]
    pub binary: Option<PathBuf>,

    /// Host-absolute sshd_config path (default: `/etc/ssh/sshd_config`).
    #[serde(default)]
    pub config_file: Option<PathBuf>,

    /// YAML rule file evaluated instead of the built-in rules.
    #[serde(default)]
    pub rules: Option<PathBuf>,

    /// Package manager tag attached to module identities.
    #[serde(default = "default_package_manager_id")]
    pub package_manager_id: String,

    /// Kill the version probe after this many seconds. No limit when unset.
    #[serde(default)]
    pub probe_timeout_secs: Option<u64>,

    /// Platform override (default: the running platform).
    #[serde(default)]
    pub platform: Option<Platform>,
}

impl Default for AuditSettings {
    fn default() -> Self {
        Self {
            root: default_root(),
            binary: None,
            config_file: None,
            rules: None,
            package_manager_id: default_package_manager_id(),
            probe_timeout_secs: None,
            platform: None,
        }
    }
}

impl AuditSettings {
    /// Load settings from a TOML file, falling back to defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| AuditError::io(path, e))?;
            toml::from_str(&content).map_err(|e| AuditError::Settings(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::current)
    }

    #[must_use]
    pub fn server_options(&self) -> ServerOptions {
        ServerOptions {
            binary: self.binary.clone(),
            configuration_file: self.config_file.clone(),
            package_manager_id: self.package_manager_id.clone(),
        }
    }

    /// Local environment described by these settings.
    #[must_use]
    pub fn environment(&self) -> AuditEnvironment {
        let executor = match self.probe_timeout_secs {
            Some(secs) => LocalExecutor::new().with_timeout(Duration::from_secs(secs)),
            None => LocalExecutor::new(),
        };
        AuditEnvironment::local(self.platform(), LocalFileSystem::new(&self.root), executor)
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("/")
}

fn default_package_manager_id() -> String {
    String::from(DEFAULT_PACKAGE_MANAGER_ID)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_settings() {
        let settings = AuditSettings::default();
        assert_eq!(settings.root, PathBuf::from("/"));
        assert_eq!(settings.package_manager_id, "ossindex");
        assert!(settings.binary.is_none());
        assert!(settings.probe_timeout_secs.is_none());
        assert_eq!(settings.platform(), Platform::current());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let settings = AuditSettings::load(Path::new("/nonexistent/sshd-audit.toml")).unwrap();
        assert_eq!(settings, AuditSettings::default());
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(
            tmp,
            "binary = \"/opt/openssh/sbin/sshd\"\nprobe_timeout_secs = 5\nplatform = \"windows\"\n"
        )
        .unwrap();
        tmp.flush().unwrap();

        let settings = AuditSettings::load(tmp.path()).unwrap();
        assert_eq!(settings.binary, Some(PathBuf::from("/opt/openssh/sbin/sshd")));
        assert_eq!(settings.probe_timeout_secs, Some(5));
        assert_eq!(settings.platform(), Platform::Windows);
        assert_eq!(settings.root, PathBuf::from("/"));

        let options = settings.server_options();
        assert_eq!(options.binary, settings.binary);
        assert_eq!(options.package_manager_id, "ossindex");
    }

    #[test]
    fn invalid_toml_is_settings_error() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "probe_timeout_secs = \"soon\"").unwrap();
        tmp.flush().unwrap();

        let err = AuditSettings::load(tmp.path()).unwrap_err();
        assert_eq!(err.code(), "SETTINGS_ERROR");
    }
}
