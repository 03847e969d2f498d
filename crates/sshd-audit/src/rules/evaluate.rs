//! Rule evaluation against a parsed `sshd_config`.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ConfigurationRule, RuleCheck, RuleSet, Severity};
use crate::config::SshdConfig;
use crate::matcher::applicable_rules;

/// Outcome of one rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFinding {
    pub rule_id: String,
    pub title: String,
    pub severity: Severity,
    pub passed: bool,
    /// Effective value that was checked, `None` when the keyword is unset with no default
    pub actual: Option<String>,
    /// Human-readable expectation
    pub expected: String,
}

/// Evaluate the rules that apply to `server_version`.
#[must_use]
pub fn evaluate(rules: &RuleSet, config: &SshdConfig, server_version: &str) -> Vec<RuleFinding> {
    let applicable = applicable_rules(&rules.rules, server_version);
    debug!(
        total = rules.len(),
        applicable = applicable.len(),
        server_version,
        "evaluating configuration rules"
    );
    applicable.into_iter().map(|r| evaluate_rule(r, config)).collect()
}

fn effective<'a>(config: &'a SshdConfig, keyword: &str, default: Option<&'a str>) -> Option<&'a str> {
    config.value(keyword).or(default)
}

fn evaluate_rule(rule: &ConfigurationRule, config: &SshdConfig) -> RuleFinding {
    let (passed, actual, expected) = match &rule.check {
        RuleCheck::DirectiveEquals {
            keyword,
            value,
            default,
        } => {
            let actual = effective(config, keyword, default.as_deref());
            (
                actual.is_some_and(|a| a.eq_ignore_ascii_case(value)),
                actual,
                format!("{keyword} {value}"),
            )
        }
        RuleCheck::DirectiveNotEquals {
            keyword,
            value,
            default,
        } => {
            let actual = effective(config, keyword, default.as_deref());
            (
                !actual.is_some_and(|a| a.eq_ignore_ascii_case(value)),
                actual,
                format!("{keyword} not {value}"),
            )
        }
        RuleCheck::DirectivePresent { keyword } => {
            let actual = config.value(keyword);
            (actual.is_some(), actual, format!("{keyword} set"))
        }
        RuleCheck::DirectiveAbsent { keyword } => {
            let actual = config.value(keyword);
            (actual.is_none(), actual, format!("{keyword} unset"))
        }
    };

    RuleFinding {
        rule_id: rule.id.clone(),
        title: rule.title.clone(),
        severity: rule.severity,
        passed,
        actual: actual.map(str::to_string),
        expected,
    }
}
