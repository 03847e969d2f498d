use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for audit operations
pub type Result<T> = std::result::Result<T, AuditError>;

/// Errors that abort the audit of a target.
///
/// Configuration parse and IO failures are not represented here; they are
/// carried as data on a [`crate::ConfigurationRecord`].
#[derive(Error, Debug)]
pub enum AuditError {
    /// No binary path was supplied and the platform default does not exist
    #[error(
        "the server binary for sshd was not specified and the default file path {} does not exist",
        path.display()
    )]
    MissingBinary {
        /// The default path that was tried
        path: PathBuf,
    },

    /// The version query did not complete in a recognized way
    #[error("did not execute process {binary} successfully, error: {stderr}")]
    ProbeExecution {
        /// File name of the probed binary
        binary: String,
        /// Raw stderr of the invocation
        stderr: String,
    },

    /// The version query completed but the output has no version line
    #[error("could not extract a version from {binary} output: {lines} non-empty line(s), need at least 2")]
    VersionExtraction {
        /// File name of the probed binary
        binary: String,
        /// Number of non-empty output lines found
        lines: usize,
    },

    /// A getter was called before the state it reads was initialised
    #[error("{0} must be initialised before use")]
    NotInitialized(&'static str),

    /// Filesystem error outside of configuration loading
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Settings file could not be read or decoded
    #[error("settings error: {0}")]
    Settings(String),

    /// Rule file could not be read or decoded
    #[error("rules error: {0}")]
    Rules(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AuditError {
    /// Build an [`AuditError::Io`] for a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true if the error must abort the audit of the current target
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingBinary { .. }
                | Self::ProbeExecution { .. }
                | Self::VersionExtraction { .. }
                | Self::NotInitialized(_)
        )
    }

    /// Returns true if the error comes from a probe-then-use ordering mistake
    #[must_use]
    pub const fn is_sequencing_error(&self) -> bool {
        matches!(self, Self::NotInitialized(_))
    }

    /// Stable error code for logs and reports
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingBinary { .. } => "MISSING_BINARY",
            Self::ProbeExecution { .. } => "PROBE_EXECUTION",
            Self::VersionExtraction { .. } => "VERSION_EXTRACTION",
            Self::NotInitialized(_) => "NOT_INITIALIZED",
            Self::Io { .. } => "IO_ERROR",
            Self::Settings(_) => "SETTINGS_ERROR",
            Self::Rules(_) => "RULES_ERROR",
            Self::Json(_) => "JSON_ERROR",
        }
    }
}
