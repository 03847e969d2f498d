//! Audit targets -- the capability interface and the sshd implementation.

use async_trait::async_trait;
use sshd_audit_core::{
    AuditError, ConfigurationRecord, FileSystemMap, ModuleIdentity, Result, TargetBinary,
    VersionProbeResult,
};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::config::{load_configuration, SshdConfig, SshdConfigParser};
use crate::discovery::{locate_binary, DEFAULT_CONFIG_PATH, SSHD_BINARY_KEY};
use crate::environment::AuditEnvironment;
use crate::identity::{build_identity, ModuleMap};
use crate::matcher;
use crate::probe::{probe_version, ProbePolicy};
use crate::rules::{evaluate, RuleFinding, RuleSet};

/// Default package manager tag attached to module identities.
pub const DEFAULT_PACKAGE_MANAGER_ID: &str = "ossindex";

/// What the caller supplies when constructing a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerOptions {
    /// Explicit binary path; the platform default is used when `None`
    pub binary: Option<PathBuf>,
    /// Host-absolute configuration file; the service default when `None`
    pub configuration_file: Option<PathBuf>,
    pub package_manager_id: String,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            binary: None,
            configuration_file: None,
            package_manager_id: DEFAULT_PACKAGE_MANAGER_ID.to_string(),
        }
    }
}

/// Capabilities every audited service provides.
#[async_trait]
pub trait AuditTarget: Send {
    /// Short id, also the module name
    fn server_id(&self) -> &'static str;

    fn server_label(&self) -> &'static str;

    /// The binary resolved at construction.
    fn binary(&self) -> &TargetBinary;

    /// Run the version probe, replacing any previous result.
    async fn probe_version(&mut self) -> Result<String>;

    /// Load the configuration file, replacing any previous record.
    /// Returns whether it parsed.
    async fn load_configuration(&mut self) -> bool;

    /// Build the module map from the probed version.
    fn list_modules(&mut self) -> Result<&ModuleMap>;

    fn get_version(&self) -> Result<&str>;

    fn get_packages(&self, filter: &[&str]) -> Result<Vec<ModuleIdentity>>;

    fn is_configuration_rule_version_in_server_version_range(
        &self,
        rule_version: &str,
        server_version: &str,
    ) -> bool {
        matcher::is_configuration_rule_version_in_server_version_range(rule_version, server_version)
    }

    fn is_vulnerability_version_in_package_version_range(
        &self,
        vulnerability_version: &str,
        package_version: &str,
    ) -> bool {
        matcher::is_vulnerability_version_in_package_version_range(
            vulnerability_version,
            package_version,
        )
    }
}

/// Supported service kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServerKind {
    Sshd,
}

impl ServerKind {
    /// Resolve the binary for this kind and build the target.
    pub async fn resolve(self, env: AuditEnvironment, options: ServerOptions) -> Result<AuditServer> {
        match self {
            Self::Sshd => SshdServer::resolve(env, options).await.map(AuditServer::Sshd),
        }
    }
}

/// A resolved audit target of any supported kind.
#[derive(Debug)]
pub enum AuditServer {
    Sshd(SshdServer),
}

impl AuditServer {
    #[must_use]
    pub const fn kind(&self) -> ServerKind {
        match self {
            Self::Sshd(_) => ServerKind::Sshd,
        }
    }

    fn target(&self) -> &dyn AuditTarget {
        match self {
            Self::Sshd(s) => s,
        }
    }

    fn target_mut(&mut self) -> &mut dyn AuditTarget {
        match self {
            Self::Sshd(s) => s,
        }
    }
}

#[async_trait]
impl AuditTarget for AuditServer {
    fn server_id(&self) -> &'static str {
        self.target().server_id()
    }

    fn server_label(&self) -> &'static str {
        self.target().server_label()
    }

    fn binary(&self) -> &TargetBinary {
        self.target().binary()
    }

    async fn probe_version(&mut self) -> Result<String> {
        self.target_mut().probe_version().await
    }

    async fn load_configuration(&mut self) -> bool {
        self.target_mut().load_configuration().await
    }

    fn list_modules(&mut self) -> Result<&ModuleMap> {
        self.target_mut().list_modules()
    }

    fn get_version(&self) -> Result<&str> {
        self.target().get_version()
    }

    fn get_packages(&self, filter: &[&str]) -> Result<Vec<ModuleIdentity>> {
        self.target().get_packages(filter)
    }
}

/// The OpenSSH server on one host.
#[derive(Debug)]
pub struct SshdServer {
    env: AuditEnvironment,
    binary: TargetBinary,
    file_system_map: FileSystemMap,
    configuration_file: PathBuf,
    package_manager_id: String,
    policy: ProbePolicy,
    last_probe: Option<VersionProbeResult>,
    configuration: Option<ConfigurationRecord<SshdConfig>>,
    modules: Option<ModuleMap>,
}

impl SshdServer {
    pub const ID: &'static str = "sshd";
    pub const LABEL: &'static str = "OpenSSH sshd server";

    /// Locate the binary and build the target.
    ///
    /// # Errors
    ///
    /// `MissingBinary` if no binary was given and the default is absent.
    pub async fn resolve(env: AuditEnvironment, options: ServerOptions) -> Result<Self> {
        let binary = locate_binary(&env, options.binary.as_deref()).await?;
        let mut file_system_map = FileSystemMap::new();
        file_system_map.register(SSHD_BINARY_KEY, binary.clone());

        Ok(Self {
            env,
            binary,
            file_system_map,
            configuration_file: options
                .configuration_file
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH)),
            package_manager_id: options.package_manager_id,
            policy: ProbePolicy::sshd(),
            last_probe: None,
            configuration: None,
            modules: None,
        })
    }

    #[must_use]
    pub const fn file_system_map(&self) -> &FileSystemMap {
        &self.file_system_map
    }

    /// Host-absolute configuration file path.
    #[must_use]
    pub fn configuration_file(&self) -> &Path {
        &self.configuration_file
    }

    #[must_use]
    pub const fn last_probe(&self) -> Option<&VersionProbeResult> {
        self.last_probe.as_ref()
    }

    /// Parsed configuration, `None` before loading or when loading failed.
    #[must_use]
    pub fn get_configuration(&self) -> Option<&SshdConfig> {
        self.configuration
            .as_ref()
            .and_then(ConfigurationRecord::structured_data)
    }

    #[must_use]
    pub const fn configuration_record(&self) -> Option<&ConfigurationRecord<SshdConfig>> {
        self.configuration.as_ref()
    }

    /// Probe the version and load the configuration concurrently.
    ///
    /// The configuration is always loaded; the probe result is returned.
    pub async fn probe_and_load(&mut self) -> Result<String> {
        let file = self.env.fs().construct_file(&self.configuration_file);
        let (probed, record) = tokio::join!(
            probe_version(&self.env, &self.binary, &self.policy, Self::LABEL),
            load_configuration(&self.env, &SshdConfigParser, &file, Self::LABEL),
        );
        self.configuration = Some(record);
        self.record_probe(probed)
    }

    /// Evaluate `rules` against the loaded configuration for the probed version.
    ///
    /// # Errors
    ///
    /// `NotInitialized` if the version has not been probed. A missing or
    /// unparsed configuration yields no findings.
    pub fn evaluate_rules(&self, rules: &RuleSet) -> Result<Vec<RuleFinding>> {
        let version = self.get_version()?;
        let Some(config) = self.get_configuration() else {
            self.env.sink().error(&format!(
                "No parsed configuration for {}, skipping {} rule(s).",
                Self::LABEL,
                rules.len()
            ));
            return Ok(Vec::new());
        };
        Ok(evaluate(rules, config, version))
    }

    fn record_probe(&mut self, probed: Result<VersionProbeResult>) -> Result<String> {
        match probed {
            Ok(result) => {
                let version = result.extracted_version.clone().unwrap_or_default();
                let rebuild = self.modules.is_some();
                self.last_probe = Some(result);
                self.modules = None;
                if rebuild {
                    self.list_modules()?;
                }
                Ok(version)
            }
            Err(e) => {
                self.last_probe = None;
                self.modules = None;
                Err(e)
            }
        }
    }
}

#[async_trait]
impl AuditTarget for SshdServer {
    fn server_id(&self) -> &'static str {
        Self::ID
    }

    fn server_label(&self) -> &'static str {
        Self::LABEL
    }

    fn binary(&self) -> &TargetBinary {
        &self.binary
    }

    async fn probe_version(&mut self) -> Result<String> {
        let probed = probe_version(&self.env, &self.binary, &self.policy, Self::LABEL).await;
        self.record_probe(probed)
    }

    async fn load_configuration(&mut self) -> bool {
        let file = self.env.fs().construct_file(&self.configuration_file);
        let record = load_configuration(&self.env, &SshdConfigParser, &file, Self::LABEL).await;
        let parsed = record.is_parsed();
        self.configuration = Some(record);
        parsed
    }

    fn list_modules(&mut self) -> Result<&ModuleMap> {
        let probe = self
            .last_probe
            .as_ref()
            .ok_or(AuditError::NotInitialized("version"))?;
        let identity = build_identity(probe, &self.package_manager_id)?;
        debug!(version = %identity.version, "built sshd module map");
        Ok(&*self.modules.insert(ModuleMap::sshd(identity)))
    }

    fn get_version(&self) -> Result<&str> {
        self.last_probe
            .as_ref()
            .and_then(|p| p.extracted_version.as_deref())
            .ok_or(AuditError::NotInitialized("version"))
    }

    fn get_packages(&self, filter: &[&str]) -> Result<Vec<ModuleIdentity>> {
        self.modules
            .as_ref()
            .map(|m| m.packages(filter))
            .ok_or(AuditError::NotInitialized("modules"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::Platform;
    use crate::testing::{environment, MemoryFileSystem, ScriptedExecutor};
    use sshd_audit_core::ProcessStatus;

    const BANNER: &str = "unknown option -- ?\nOpenSSH_8.4p1 Debian-5, OpenSSL 1.1.1n\nusage: sshd [-46DdeiqTt]\n";

    fn fs() -> MemoryFileSystem {
        MemoryFileSystem::default()
            .with_file("/usr/sbin/sshd", "")
            .with_file("/etc/ssh/sshd_config", "PermitRootLogin yes\nX11Forwarding yes\n")
    }

    async fn server(exec: ScriptedExecutor, fs: MemoryFileSystem) -> SshdServer {
        let (env, _, _) = environment(Platform::Unix, exec, fs);
        SshdServer::resolve(env, ServerOptions::default()).await.unwrap()
    }

    fn unknown_option() -> ScriptedExecutor {
        ScriptedExecutor::new(ProcessStatus::Error, "", BANNER)
    }

    #[tokio::test]
    async fn resolve_registers_binary() {
        let server = server(unknown_option(), fs()).await;
        assert_eq!(server.binary().path(), Path::new("/usr/sbin/sshd"));
        assert_eq!(
            server.file_system_map().get(SSHD_BINARY_KEY),
            Some(server.binary())
        );
        assert_eq!(server.configuration_file(), Path::new("/etc/ssh/sshd_config"));
    }

    #[tokio::test]
    async fn resolve_without_binary_fails() {
        let (env, _, _) = environment(Platform::Unix, unknown_option(), MemoryFileSystem::default());
        let err = ServerKind::Sshd
            .resolve(env, ServerOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuditError::MissingBinary { .. }));
    }

    #[tokio::test]
    async fn getters_before_probe_fail() {
        let mut server = server(unknown_option(), fs()).await;
        assert!(matches!(
            server.get_packages(&[]),
            Err(AuditError::NotInitialized(_))
        ));
        assert!(matches!(server.get_version(), Err(AuditError::NotInitialized(_))));
        assert!(matches!(server.list_modules(), Err(AuditError::NotInitialized(_))));
        assert!(server.get_configuration().is_none());
    }

    #[tokio::test]
    async fn probe_then_packages() {
        let mut server = server(unknown_option(), fs()).await;
        let version = server.probe_version().await.unwrap();
        assert_eq!(version, "OpenSSH_8.4p1 Debian-5, OpenSSL 1.1.1n");

        // Probed but modules not built yet
        assert!(server.get_packages(&[]).is_err());

        server.list_modules().unwrap();
        let packages = server.get_packages(&[]).unwrap();
        assert_eq!(packages.len(), 1);
        assert_eq!(packages[0].module_name, "sshd");
        assert_eq!(packages[0].version, version);
        assert_eq!(packages[0].package_manager_id, DEFAULT_PACKAGE_MANAGER_ID);
    }

    #[tokio::test]
    async fn reprobe_overwrites() {
        let mut server = server(unknown_option(), fs()).await;
        server.probe_version().await.unwrap();
        server.list_modules().unwrap();
        let again = server.probe_version().await.unwrap();
        assert_eq!(server.get_version().unwrap(), again);
        assert_eq!(server.get_packages(&["sshd"]).unwrap()[0].version, again);
    }

    #[tokio::test]
    async fn failed_probe_clears_state() {
        let exec = ScriptedExecutor::new(ProcessStatus::Error, "", "Permission denied");
        let mut server = server(exec, fs()).await;
        let err = server.probe_version().await.unwrap_err();
        assert!(matches!(err, AuditError::ProbeExecution { .. }));
        assert!(server.get_version().is_err());
        assert!(server.list_modules().is_err());
    }

    #[tokio::test]
    async fn probe_and_load_runs_both() {
        let mut server = server(unknown_option(), fs()).await;
        server.probe_and_load().await.unwrap();
        assert_eq!(
            server.get_configuration().and_then(|c| c.value("PermitRootLogin")),
            Some("yes")
        );

        let findings = server.evaluate_rules(&RuleSet::builtin().unwrap()).unwrap();
        let root = findings.iter().find(|f| f.rule_id == "SSHD-001").unwrap();
        assert!(!root.passed);
    }

    #[tokio::test]
    async fn unreadable_configuration_is_not_fatal() {
        let fs = MemoryFileSystem::default()
            .with_file("/usr/sbin/sshd", "")
            .with_unreadable("/etc/ssh/sshd_config", std::io::ErrorKind::PermissionDenied);
        let mut server = server(unknown_option(), fs).await;
        server.probe_and_load().await.unwrap();

        assert!(server.get_configuration().is_none());
        let record = server.configuration_record().unwrap();
        assert!(!record.is_parsed());
        assert!(record.io_error().is_some());
        assert!(record.parse_error().is_none());
        assert!(server.evaluate_rules(&RuleSet::builtin().unwrap()).unwrap().is_empty());
    }

    #[tokio::test]
    async fn tagged_union_delegates() {
        let (env, _, _) = environment(Platform::Unix, unknown_option(), fs());
        let mut server = ServerKind::Sshd
            .resolve(env, ServerOptions::default())
            .await
            .unwrap();
        assert_eq!(server.kind(), ServerKind::Sshd);
        assert_eq!(server.server_id(), "sshd");
        assert!(server.load_configuration().await);
        server.probe_version().await.unwrap();
        assert_eq!(server.list_modules().unwrap().packages(&[]).len(), 1);
        assert!(server.is_configuration_rule_version_in_server_version_range(">0", "x"));
        assert!(!server.is_vulnerability_version_in_package_version_range(">0", "x"));
    }
}
