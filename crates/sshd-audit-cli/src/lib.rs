//! # sshd-audit-cli
//!
//! Command-line interface for the sshd audit probe.
//!
//! - **version / packages**: probe the server binary for its version
//! - **config**: parse `sshd_config` and summarize it
//! - **audit**: full run with rule evaluation, pretty or JSON output
//! - **match-rule / match-vuln**: evaluate the version policies directly

pub mod cli;
pub mod config;
pub mod logging;
pub mod output;

pub use cli::{exit_code, run};
