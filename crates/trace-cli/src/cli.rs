//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Trace Verify - check phase documentation against exported ground truth
#[derive(Parser, Debug)]
#[command(name = "trace-verify")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Project root; relative paths and trace-verify.toml resolve against it
    #[arg(long, global = true, env = "TRACE_VERIFY_ROOT")]
    pub root: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Verify a phase trace against workflow, CMS and schema exports
    ///
    /// Exit codes: 0 no discrepancies, 1 discrepancies found,
    /// 2 configuration error.
    ///
    /// Examples:
    ///   trace-verify verify --phase approval
    ///   trace-verify verify --trace docs/TRACE.md --phase-dir phases/03-approval
    Verify(VerifyArgs),

    /// List configured phase presets
    Phases {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },
}

/// Arguments for `verify`
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyArgs {
    /// Predefined phase to verify
    #[arg(long)]
    pub phase: Option<String>,

    /// Path to the trace markdown file
    #[arg(long)]
    pub trace: Option<PathBuf>,

    /// Path to the phase directory (contains assets/ and properties/)
    #[arg(long)]
    pub phase_dir: Option<PathBuf>,

    /// Directory to write verification logs
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Workflow export directory
    #[arg(long)]
    pub workflow_dir: Option<PathBuf>,

    /// Schema export directory
    #[arg(long)]
    pub schema_dir: Option<PathBuf>,

    /// CMS module export directory
    #[arg(long)]
    pub cms_modules_dir: Option<PathBuf>,

    /// CMS forms export file
    #[arg(long)]
    pub cms_forms: Option<PathBuf>,

    /// Print the report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_verify_with_phase() {
        let cli = Cli::try_parse_from(["trace-verify", "verify", "--phase", "approval"]).unwrap();
        match cli.command {
            Some(Commands::Verify(args)) => {
                assert_eq!(args.phase.as_deref(), Some("approval"));
                assert!(!args.json);
            }
            other => panic!("expected verify, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_explicit_paths() {
        let cli = Cli::try_parse_from([
            "trace-verify",
            "--root",
            "/project",
            "verify",
            "--trace",
            "docs/TRACE.md",
            "--phase-dir",
            "phases/x",
            "--cms-forms",
            "forms.json",
        ])
        .unwrap();
        assert_eq!(cli.root, Some(PathBuf::from("/project")));
        let Some(Commands::Verify(args)) = cli.command else {
            panic!("expected verify");
        };
        assert_eq!(args.trace, Some(PathBuf::from("docs/TRACE.md")));
        assert_eq!(args.phase_dir, Some(PathBuf::from("phases/x")));
        assert_eq!(args.cms_forms, Some(PathBuf::from("forms.json")));
    }
}
