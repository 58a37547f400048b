//! Implementation of the `verify` command

use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use trace_core::{ConfigResolver, Outcome, RunOverrides, VerificationReport, Verifier};
use trace_fs::NormalizedPath;

use crate::cli::VerifyArgs;
use crate::error::Result;

/// Machine-readable output of `verify --json`
#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    outcome: Outcome,
    total_discrepancies: usize,
    #[serde(flatten)]
    report: &'a VerificationReport,
    log_path: &'a NormalizedPath,
    warnings: &'a [String],
}

/// Convert parsed flags into resolver overrides.
pub fn overrides_from_args(args: &VerifyArgs) -> RunOverrides {
    let text = |p: &Option<std::path::PathBuf>| p.as_deref().map(|p| NormalizedPath::new(p).as_str().to_string());
    RunOverrides {
        phase: args.phase.clone(),
        trace: text(&args.trace),
        phase_dir: text(&args.phase_dir),
        log_dir: text(&args.log_dir),
        workflow_dir: text(&args.workflow_dir),
        schema_dir: text(&args.schema_dir),
        cms_modules_dir: text(&args.cms_modules_dir),
        cms_forms: text(&args.cms_forms),
    }
}

/// Run one verification and print its summary.
///
/// Returns the run outcome; the caller maps it to the process exit code.
pub fn run_verify(root: &Path, args: &VerifyArgs) -> Result<Outcome> {
    let resolver = ConfigResolver::new(NormalizedPath::new(root));
    let config = resolver.resolve(&overrides_from_args(args))?;
    tracing::debug!(
        phase = ?config.phase,
        trace = %config.trace,
        phase_dir = %config.phase_dir,
        "Resolved configuration"
    );

    let summary = Verifier::new(config).run()?;
    let outcome = summary.report.outcome();

    if args.json {
        let output = JsonOutput {
            outcome,
            total_discrepancies: summary.report.total_discrepancies(),
            report: &summary.report,
            log_path: &summary.log_path,
            warnings: &summary.warnings,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(outcome);
    }

    for warning in &summary.warnings {
        println!("{} {}", "warning:".yellow().bold(), warning);
    }

    let log_path = summary.log_path.relative_to(resolver.root());
    println!("Verification log written to {}", log_path.as_str().cyan());

    match outcome {
        Outcome::Pass => {
            println!(
                "{} {} workflow reference(s) checked, no discrepancies",
                "OK".green().bold(),
                summary.report.reference_ids.len()
            );
        }
        Outcome::Fail => {
            for discrepancy in summary.report.discrepancies() {
                println!("  {} {}", "-".red(), discrepancy);
            }
            println!(
                "{} Discrepancies detected. See log for details.",
                "FAIL".red().bold()
            );
        }
    }

    Ok(outcome)
}
