//! Data model for one audit run.

pub mod binary;
pub mod config;
pub mod identity;
pub mod probe;

pub use binary::{FileSystemMap, TargetBinary};
pub use config::{ConfigParseError, ConfigurationRecord};
pub use identity::{ModuleIdentity, SSHD_MODULE_NAME};
pub use probe::{ProbeMode, ProcessOutput, ProcessStatus, VersionProbeResult};
