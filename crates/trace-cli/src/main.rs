//! Trace Verify CLI
//!
//! Checks that the workflow IDs, CMS assets and CRM properties a phase's
//! documentation refers to exist in the exported ground truth.

mod cli;
mod commands;
mod error;
mod logging;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use cli::{Cli, Commands};
use error::{CliError, Result};

/// Exit code for configuration and other fatal errors
const EXIT_FATAL: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run() -> Result<u8> {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("{}: failed to initialize logging: {}", "warning".yellow(), e);
    }
    tracing::debug!("Verbose mode enabled");

    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        return Err(CliError::user(format!(
            "Project root does not exist: {}",
            root.display()
        )));
    }

    match cli.command {
        Some(cmd) => execute_command(cmd, root),
        None => {
            println!("{} phase trace verification", "trace-verify".green().bold());
            println!();
            println!("Run {} for available commands.", "trace-verify --help".cyan());
            Ok(0)
        }
    }
}

fn execute_command(cmd: Commands, root: PathBuf) -> Result<u8> {
    match cmd {
        Commands::Verify(args) => {
            let outcome = commands::run_verify(&root, &args)?;
            Ok(outcome.exit_code() as u8)
        }
        Commands::Phases { json } => {
            commands::run_phases(&root, json)?;
            Ok(0)
        }
    }
}
