//! Implementation of the `phases` command

use std::path::Path;

use colored::Colorize;
use trace_core::ConfigResolver;
use trace_fs::NormalizedPath;

use crate::error::Result;

/// List phase presets from built-in defaults and project config files.
pub fn run_phases(root: &Path, json: bool) -> Result<()> {
    let resolver = ConfigResolver::new(NormalizedPath::new(root));
    let manifest = resolver.load_manifest()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&manifest.phases)?);
        return Ok(());
    }

    if resolver.has_config() {
        println!("{} {}", "=>".blue().bold(), resolver.config_path());
    } else {
        println!("{} built-in defaults", "=>".blue().bold());
    }

    for (name, phase) in &manifest.phases {
        let trace = phase.trace.as_deref().unwrap_or("-");
        let marker = if phase.expect_workflows.unwrap_or(false) {
            " (expects workflows)".dimmed().to_string()
        } else {
            String::new()
        };
        println!("  {} {}{}", name.green().bold(), trace, marker);
    }

    Ok(())
}
