//! YAML configuration rules.
//!
//! A rule names the server version it was written for (`>0` for all
//! versions) and one check against the parsed configuration.

pub mod evaluate;

use serde::{Deserialize, Serialize};
use sshd_audit_core::{AuditError, Result};
use std::fmt;
use std::path::Path;

use crate::matcher::{Versioned, ANY_VERSION};

pub use evaluate::{evaluate, RuleFinding};

const BUILTIN_RULES: &str = include_str!("../../rules/sshd.yaml");

/// Rule severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
            Self::Critical => write!(f, "critical"),
        }
    }
}

/// What a rule inspects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum RuleCheck {
    /// Effective value equals `value` (case-insensitive)
    DirectiveEquals {
        keyword: String,
        value: String,
        /// sshd's built-in value when the keyword is absent
        #[serde(default)]
        default: Option<String>,
    },
    /// Effective value differs from `value` (case-insensitive)
    DirectiveNotEquals {
        keyword: String,
        value: String,
        #[serde(default)]
        default: Option<String>,
    },
    DirectivePresent { keyword: String },
    DirectiveAbsent { keyword: String },
}

/// One configuration rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationRule {
    pub id: String,
    pub title: String,
    pub severity: Severity,
    /// Server version this rule applies to
    #[serde(default = "default_rule_version")]
    pub version: String,
    #[serde(default)]
    pub summary: Option<String>,
    pub check: RuleCheck,
}

fn default_rule_version() -> String {
    ANY_VERSION.to_string()
}

impl Versioned for ConfigurationRule {
    fn version_expression(&self) -> &str {
        &self.version
    }
}

/// A set of rules loaded from one YAML document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub rules: Vec<ConfigurationRule>,
}

impl RuleSet {
    /// Parse a YAML rule document.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| AuditError::Rules(e.to_string()))
    }

    /// Load a YAML rule file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| AuditError::io(path, e))?;
        Self::from_yaml(&content)
            .map_err(|e| AuditError::Rules(format!("{}: {e}", path.display())))
    }

    /// The rules shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml(BUILTIN_RULES)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
