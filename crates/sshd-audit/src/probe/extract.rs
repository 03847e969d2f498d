//! Version token extraction strategies.

/// Extraction found too few lines to pick a version from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooFewLines {
    /// Non-empty lines present in the output
    pub found: usize,
}

/// Picks the version token out of a probe's effective output.
pub trait VersionExtractor: Send + Sync {
    fn extract(&self, output: &str) -> Result<String, TooFewLines>;
}

/// The `n`th (0-based) line after splitting on `\n` and dropping empty
/// entries. Lines are returned untrimmed.
///
/// sshd prints a banner or complaint first and the version line second,
/// so the sshd policy uses `NthNonEmptyLine(1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NthNonEmptyLine(pub usize);

impl VersionExtractor for NthNonEmptyLine {
    fn extract(&self, output: &str) -> Result<String, TooFewLines> {
        let lines = output.split('\n').filter(|l| !l.is_empty());
        lines
            .clone()
            .nth(self.0)
            .map(str::to_string)
            .ok_or_else(move || TooFewLines {
                found: lines.count(),
            })
    }
}
