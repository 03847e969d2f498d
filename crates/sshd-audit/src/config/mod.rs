//! Configuration loading through a grammar parser.
//!
//! A configuration that cannot be read or parsed is not an error for the
//! audit: the loader reports every diagnostic it gets and hands back a
//! [`ConfigurationRecord`] marked as unparsed.

pub mod sshd;

use async_trait::async_trait;
use sshd_audit_core::{ConfigParseError, ConfigurationRecord};
use std::path::PathBuf;
use std::time::Instant;
use tracing::debug;

use crate::environment::{AuditEnvironment, FileHandle, FileSystem};

pub use sshd::{Directive, MatchBlock, SshdConfig, SshdConfigParser};

/// What a parser reports after one attempt at a file.
#[derive(Debug)]
pub struct ParseOutcome<T> {
    pub full_file_path: PathBuf,
    pub structured_result: Option<T>,
    pub last_parse_error: Option<ConfigParseError>,
    pub last_io_error: Option<std::io::Error>,
}

impl<T> ParseOutcome<T> {
    pub fn succeeded(full_file_path: impl Into<PathBuf>, result: T) -> Self {
        Self {
            full_file_path: full_file_path.into(),
            structured_result: Some(result),
            last_parse_error: None,
            last_io_error: None,
        }
    }

    pub fn failed(
        full_file_path: impl Into<PathBuf>,
        parse_error: Option<ConfigParseError>,
        io_error: Option<std::io::Error>,
    ) -> Self {
        Self {
            full_file_path: full_file_path.into(),
            structured_result: None,
            last_parse_error: parse_error,
            last_io_error: io_error,
        }
    }

    #[must_use]
    pub const fn parse_succeeded(&self) -> bool {
        self.structured_result.is_some()
            && self.last_parse_error.is_none()
            && self.last_io_error.is_none()
    }
}

/// Grammar parser for a service's configuration file.
#[async_trait]
pub trait ConfigParser: Send + Sync {
    type Config: Send;

    async fn parse(&self, fs: &dyn FileSystem, file: &FileHandle) -> ParseOutcome<Self::Config>;
}

/// Parse `file` and wrap the outcome in a record.
///
/// Never fails. On failure the record carries the parser's errors (or a
/// synthesized one) and each error is reported through the status sink.
pub async fn load_configuration<P: ConfigParser>(
    env: &AuditEnvironment,
    parser: &P,
    file: &FileHandle,
    label: &str,
) -> ConfigurationRecord<P::Config> {
    env.sink().status(&format!("Scanning {label} configuration."));
    let started = Instant::now();
    let outcome = parser.parse(env.fs(), file).await;
    let elapsed = started.elapsed();
    debug!(path = %outcome.full_file_path.display(), ?elapsed, "configuration parse finished");

    let succeeded = outcome.parse_succeeded();
    let ParseOutcome {
        full_file_path,
        structured_result,
        last_parse_error,
        last_io_error,
    } = outcome;

    if let (true, Some(config)) = (succeeded, structured_result) {
        env.sink().success(&format!(
            "Read configuration from {} in {} ms.",
            file.name(),
            elapsed.as_millis()
        ));
        return ConfigurationRecord::parsed(full_file_path, config);
    }

    env.sink().error(&format!(
        "Could not parse configuration from {}.",
        full_file_path.display()
    ));
    if let Some(e) = &last_parse_error {
        env.sink().error_source(e);
    }
    if let Some(e) = &last_io_error {
        env.sink().error_source(e);
    }
    ConfigurationRecord::failed(full_file_path, last_parse_error, last_io_error)
}
