//! Package identity handed to vulnerability lookups.

use serde::{Deserialize, Serialize};

/// Fixed module name of the OpenSSH server.
pub const SSHD_MODULE_NAME: &str = "sshd";

/// Normalized package record for one detected module.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleIdentity {
    /// Package manager tag expected by the vulnerability backend (opaque)
    pub package_manager_id: String,
    pub module_name: String,
    pub version: String,
}

impl ModuleIdentity {
    /// Identity of the sshd module at `version`.
    pub fn new(package_manager_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            package_manager_id: package_manager_id.into(),
            module_name: SSHD_MODULE_NAME.to_string(),
            version: version.into(),
        }
    }
}
