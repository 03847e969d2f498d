//! `sshd-audit match-rule` / `match-vuln` - Evaluate the version matchers.

use anyhow::Result;
use colored::Colorize;
use sshd_audit::{
    is_configuration_rule_version_in_server_version_range,
    is_vulnerability_version_in_package_version_range,
};

use super::Context;
use crate::cli::args::MatchArgs;
use crate::output::OutputFormat;

pub fn rule(ctx: &Context, args: &MatchArgs) -> Result<()> {
    let matched =
        is_configuration_rule_version_in_server_version_range(&args.expression, &args.version);
    print(ctx, args, matched)
}

pub fn vulnerability(ctx: &Context, args: &MatchArgs) -> Result<()> {
    let matched = is_vulnerability_version_in_package_version_range(&args.expression, &args.version);
    print(ctx, args, matched)
}

fn print(ctx: &Context, args: &MatchArgs, matched: bool) -> Result<()> {
    match ctx.output_format {
        OutputFormat::Json => Context::print_json(&serde_json::json!({
            "expression": args.expression,
            "version": args.version,
            "matched": matched,
        })),
        OutputFormat::Pretty => {
            if matched {
                println!("{}", "true".green());
            } else {
                println!("{}", "false".red());
            }
            Ok(())
        }
    }
}
