//! `sshd-audit config` - Parse sshd_config and show its directives.
//!
//! Parse failures are printed, not raised. No sshd binary is needed.

use anyhow::Result;
use colored::Colorize;
use sshd_audit::config::load_configuration;
use sshd_audit::discovery::DEFAULT_CONFIG_PATH;
use sshd_audit::{SshdConfigParser, SshdServer};
use std::path::Path;

use super::Context;
use crate::output::OutputFormat;

pub async fn execute(ctx: Context) -> Result<()> {
    let env = ctx.settings.environment();
    let path = ctx
        .settings
        .config_file
        .as_deref()
        .unwrap_or_else(|| Path::new(DEFAULT_CONFIG_PATH));
    let file = env.fs().construct_file(path);
    let record = load_configuration(&env, &SshdConfigParser, &file, SshdServer::LABEL).await;

    let errors: Vec<String> = record
        .parse_error()
        .map(ToString::to_string)
        .into_iter()
        .chain(record.io_error().map(ToString::to_string))
        .collect();

    match ctx.output_format {
        OutputFormat::Json => {
            Context::print_json(&serde_json::json!({
                "source_file": record.source_file(),
                "parsed": record.is_parsed(),
                "configuration": record.structured_data(),
                "errors": errors,
            }))?;
        }
        OutputFormat::Pretty => {
            println!("{}", record.source_file().display().to_string().bold());
            let Some(config) = record.structured_data() else {
                println!("  {}", "not parsed".red());
                for e in &errors {
                    println!("  {e}");
                }
                return Ok(());
            };
            for d in &config.directives {
                println!("  {:>4}  {} {}", d.line, d.keyword.cyan(), d.value);
            }
            for block in &config.match_blocks {
                println!(
                    "  {:>4}  {} {}",
                    block.line,
                    "Match".yellow(),
                    block.criteria.join(" ")
                );
                for d in &block.directives {
                    println!("  {:>4}    {} {}", d.line, d.keyword.cyan(), d.value);
                }
            }
        }
    }

    Ok(())
}
