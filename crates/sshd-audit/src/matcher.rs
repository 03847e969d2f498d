//! Version applicability policies.
//!
//! Both policies are plain string comparisons. Rule sets and vulnerability
//! records are authored against exact version strings as printed by the
//! probe, so no semantic-version parsing happens here.

/// Rule version that applies to every server version.
pub const ANY_VERSION: &str = ">0";

/// True if a configuration rule written for `rule_version` applies to `server_version`.
#[must_use]
pub fn is_configuration_rule_version_in_server_version_range(
    rule_version: &str,
    server_version: &str,
) -> bool {
    rule_version == server_version || rule_version == ANY_VERSION
}

/// True if a vulnerability recorded against `vulnerability_version` affects `package_version`.
#[must_use]
pub fn is_vulnerability_version_in_package_version_range(
    vulnerability_version: &str,
    package_version: &str,
) -> bool {
    vulnerability_version == package_version
}

/// Anything that names the version it applies to.
pub trait Versioned {
    fn version_expression(&self) -> &str;
}

/// Rules applicable to `server_version`, in input order.
pub fn applicable_rules<'a, R: Versioned>(rules: &'a [R], server_version: &str) -> Vec<&'a R> {
    rules
        .iter()
        .filter(|r| {
            is_configuration_rule_version_in_server_version_range(r.version_expression(), server_version)
        })
        .collect()
}
