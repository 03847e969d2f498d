//! Configuration load records.

use std::fmt;
use std::path::{Path, PathBuf};

/// A grammar error reported by a configuration parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigParseError {
    /// 1-based line number, when the error is tied to one
    pub line: Option<usize>,
    pub message: String,
}

impl ConfigParseError {
    pub fn new(line: Option<usize>, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {line}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ConfigParseError {}

/// Result of loading one configuration file.
///
/// Immutable once built. A record that failed to parse always carries at
/// least one of `parse_error` / `io_error`.
#[derive(Debug)]
pub struct ConfigurationRecord<T> {
    source_file: PathBuf,
    structured_data: Option<T>,
    parse_error: Option<ConfigParseError>,
    io_error: Option<std::io::Error>,
}

impl<T> ConfigurationRecord<T> {
    /// A successfully parsed configuration.
    pub fn parsed(source_file: impl Into<PathBuf>, data: T) -> Self {
        Self {
            source_file: source_file.into(),
            structured_data: Some(data),
            parse_error: None,
            io_error: None,
        }
    }

    /// A failed load. When the parser exposed no error at all a parse error
    /// is synthesized so the failure stays diagnosable.
    pub fn failed(
        source_file: impl Into<PathBuf>,
        parse_error: Option<ConfigParseError>,
        io_error: Option<std::io::Error>,
    ) -> Self {
        let parse_error = match (parse_error, &io_error) {
            (None, None) => Some(ConfigParseError::new(
                None,
                "parser reported failure without a diagnostic",
            )),
            (e, _) => e,
        };
        Self {
            source_file: source_file.into(),
            structured_data: None,
            parse_error,
            io_error,
        }
    }

    #[must_use]
    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    #[must_use]
    pub const fn is_parsed(&self) -> bool {
        self.structured_data.is_some()
    }

    #[must_use]
    pub const fn structured_data(&self) -> Option<&T> {
        self.structured_data.as_ref()
    }

    #[must_use]
    pub const fn parse_error(&self) -> Option<&ConfigParseError> {
        self.parse_error.as_ref()
    }

    #[must_use]
    pub const fn io_error(&self) -> Option<&std::io::Error> {
        self.io_error.as_ref()
    }
}
