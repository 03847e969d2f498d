//! `sshd_config` parser.
//!
//! Covers the line grammar from sshd_config(5): `Keyword args...` with an
//! optional `=`, `#` comment lines, double-quoted arguments and `Match`
//! blocks. `Match` criteria are kept as written and never evaluated;
//! `Include` is recorded as an ordinary directive.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sshd_audit_core::ConfigParseError;

use super::{ConfigParser, ParseOutcome};
use crate::environment::{FileHandle, FileSystem};

/// One `Keyword args...` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directive {
    /// Keyword as written in the file
    pub keyword: String,
    pub args: Vec<String>,
    /// Arguments joined by single spaces
    pub value: String,
    /// 1-based line number
    pub line: usize,
}

impl Directive {
    #[must_use]
    pub fn is(&self, keyword: &str) -> bool {
        self.keyword.eq_ignore_ascii_case(keyword)
    }
}

/// A `Match` block and the directives under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchBlock {
    pub criteria: Vec<String>,
    pub line: usize,
    pub directives: Vec<Directive>,
}

/// Parsed `sshd_config`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SshdConfig {
    /// Directives before the first `Match`
    pub directives: Vec<Directive>,
    pub match_blocks: Vec<MatchBlock>,
}

impl SshdConfig {
    /// First global occurrence of `keyword`. sshd uses the first value it reads.
    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.is(keyword))
    }

    #[must_use]
    pub fn value(&self, keyword: &str) -> Option<&str> {
        self.get(keyword).map(|d| d.value.as_str())
    }

    /// Every global occurrence of `keyword`, for repeatable keywords like `Port`.
    pub fn all<'a>(&'a self, keyword: &'a str) -> impl Iterator<Item = &'a Directive> + 'a {
        self.directives.iter().filter(move |d| d.is(keyword))
    }

    /// Parse configuration text.
    ///
    /// # Errors
    ///
    /// The first grammar error, with its line number.
    pub fn parse_str(text: &str) -> Result<Self, ConfigParseError> {
        let mut config = Self::default();

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let key_end = trimmed
                .find(|c: char| c.is_whitespace() || c == '=')
                .unwrap_or(trimmed.len());
            let keyword = &trimmed[..key_end];
            let mut rest = trimmed[key_end..].trim_start();
            if let Some(stripped) = rest.strip_prefix('=') {
                rest = stripped.trim_start();
            }

            if keyword.is_empty() {
                return Err(ConfigParseError::new(Some(line), "missing keyword"));
            }
            let args = split_args(rest).map_err(|msg| ConfigParseError::new(Some(line), msg))?;
            if args.is_empty() {
                return Err(ConfigParseError::new(
                    Some(line),
                    format!("missing argument for {keyword}"),
                ));
            }

            if keyword.eq_ignore_ascii_case("match") {
                config.match_blocks.push(MatchBlock {
                    criteria: args,
                    line,
                    directives: Vec::new(),
                });
                continue;
            }

            let directive = Directive {
                keyword: keyword.to_string(),
                value: args.join(" "),
                args,
                line,
            };
            match config.match_blocks.last_mut() {
                Some(block) => block.directives.push(directive),
                None => config.directives.push(directive),
            }
        }

        Ok(config)
    }
}

/// Split on whitespace, keeping double-quoted runs together.
fn split_args(rest: &str) -> Result<Vec<String>, String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for c in rest.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }

    if in_quotes {
        return Err("unterminated quoted argument".to_string());
    }
    if has_token {
        args.push(current);
    }
    Ok(args)
}

/// [`ConfigParser`] for `sshd_config` files.
#[derive(Debug, Clone, Copy, Default)]
pub struct SshdConfigParser;

#[async_trait]
impl ConfigParser for SshdConfigParser {
    type Config = SshdConfig;

    async fn parse(&self, fs: &dyn FileSystem, file: &FileHandle) -> ParseOutcome<SshdConfig> {
        match fs.read_to_string(file).await {
            Ok(text) => match SshdConfig::parse_str(&text) {
                Ok(config) => ParseOutcome::succeeded(file.path(), config),
                Err(e) => ParseOutcome::failed(file.path(), Some(e), None),
            },
            Err(e) => ParseOutcome::failed(file.path(), None, Some(e)),
        }
    }
}
