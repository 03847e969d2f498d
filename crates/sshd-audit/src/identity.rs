//! Module identity mapping.

use serde::{Deserialize, Serialize};
use sshd_audit_core::{AuditError, ModuleIdentity, Result, VersionProbeResult, SSHD_MODULE_NAME};
use std::collections::BTreeMap;

/// Build the sshd identity from an accepted probe.
///
/// # Errors
///
/// `NotInitialized` unless the probe was accepted with a non-empty version.
pub fn build_identity(probe: &VersionProbeResult, package_manager_id: &str) -> Result<ModuleIdentity> {
    match (&probe.mode, probe.extracted_version.as_deref()) {
        (Some(_), Some(version)) if !version.is_empty() => {
            Ok(ModuleIdentity::new(package_manager_id, version))
        }
        _ => Err(AuditError::NotInitialized("version")),
    }
}

/// Packages per module name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleMap(BTreeMap<String, Vec<ModuleIdentity>>);

impl ModuleMap {
    /// The single-entry map for an sshd identity.
    #[must_use]
    pub fn sshd(identity: ModuleIdentity) -> Self {
        let mut map = BTreeMap::new();
        map.insert(SSHD_MODULE_NAME.to_string(), vec![identity]);
        Self(map)
    }

    /// Packages of every module, or only of the named ones when `filter` is non-empty.
    #[must_use]
    pub fn packages(&self, filter: &[&str]) -> Vec<ModuleIdentity> {
        self.0
            .iter()
            .filter(|(name, _)| filter.is_empty() || filter.contains(&name.as_str()))
            .flat_map(|(_, pkgs)| pkgs.iter().cloned())
            .collect()
    }

    #[must_use]
    pub fn get(&self, module: &str) -> Option<&[ModuleIdentity]> {
        self.0.get(module).map(Vec::as_slice)
    }
}
