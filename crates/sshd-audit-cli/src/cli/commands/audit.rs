//! `sshd-audit audit` - Probe, parse and evaluate configuration rules.

use anyhow::{Context as _, Result};
use colored::Colorize;
use sshd_audit::rules::Severity;
use sshd_audit::{run_audit, AuditReport, RuleSet};

use super::Context;
use crate::cli::args::AuditArgs;
use crate::output::OutputFormat;

pub async fn execute(ctx: Context, args: AuditArgs) -> Result<()> {
    let rules = match crate::config::rules_path(args.rules.as_deref(), &ctx.settings) {
        Some(path) => RuleSet::load(path)
            .with_context(|| format!("loading rules from {}", path.display()))?,
        None => RuleSet::builtin()?,
    };

    let report = run_audit(
        ctx.settings.environment(),
        ctx.settings.server_options(),
        &rules,
    )
    .await?;

    match ctx.output_format {
        OutputFormat::Json => println!("{}", report.to_json()?),
        OutputFormat::Pretty => print_pretty(&report),
    }

    Ok(())
}

fn print_pretty(report: &AuditReport) {
    println!("{} on {}", report.server_label.bold(), report.node_id);
    println!("  binary   {}", report.binary.path().display());
    if let Some(sha) = &report.binary_sha256 {
        println!("  sha256   {}", sha.dimmed());
    }
    println!("  version  {}", report.version.cyan());
    println!("  config   {}", report.configuration_file.display());

    if !report.configuration_parsed {
        println!("  {}", "configuration not parsed, no rules evaluated".red());
        for e in &report.configuration_errors {
            println!("    {e}");
        }
        return;
    }

    println!();
    for f in &report.findings {
        let mark = if f.passed {
            "PASS".green()
        } else {
            match f.severity {
                Severity::Critical | Severity::High => "FAIL".red().bold(),
                _ => "FAIL".yellow(),
            }
        };
        println!(
            "  {mark}  {:<9} {:<8} {}",
            f.rule_id,
            f.severity.to_string(),
            f.title
        );
        if !f.passed {
            println!(
                "        expected {}, found {}",
                f.expected,
                f.actual.as_deref().unwrap_or("<unset>")
            );
        }
    }

    let s = report.summary;
    println!();
    println!(
        "{} evaluated, {} passed, {} failed ({} high or critical)",
        s.evaluated,
        s.passed.to_string().green(),
        s.failed.to_string().red(),
        s.failed_high
    );
}
