//! Discrepancy model and the verification log
//!
//! Each checker produces an ordered list of [`Discrepancy`] values. The
//! [`VerificationReport`] keeps the lists in the order they were produced and
//! renders them into the Markdown log written at the end of a run.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use trace_fs::NormalizedPath;

use crate::Result;

/// Timestamp format used in the log header and file name
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// Category of a single mismatch between documentation and exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscrepancyKind {
    WorkflowMissing,
    CmsModuleMissing,
    CmsFormMissing,
    SchemaMissingForObject,
    PropertyMissingInSchema,
    /// A declaration or export file that could not be read
    LoadError,
}

/// A single verifiable mismatch. Carries no remediation state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    pub kind: DiscrepancyKind,
    pub message: String,
}

impl Discrepancy {
    pub fn new(kind: DiscrepancyKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// A file that failed to load, named together with the cause.
    pub fn load_error(path: &NormalizedPath, detail: &str) -> Self {
        Self::new(
            DiscrepancyKind::LoadError,
            format!("Failed to load {}: {}", path, detail),
        )
    }
}

impl fmt::Display for Discrepancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Overall result of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
}

impl Outcome {
    /// Process exit code for this outcome
    pub fn exit_code(self) -> i32 {
        match self {
            Outcome::Pass => 0,
            Outcome::Fail => 1,
        }
    }
}

/// Aggregated findings of one verification run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    pub timestamp: DateTime<Utc>,
    /// Workflow identifiers extracted from the trace, reported even when empty
    pub reference_ids: BTreeSet<String>,
    pub workflow_issues: Vec<Discrepancy>,
    pub cms_issues: Vec<Discrepancy>,
    pub property_issues: Vec<Discrepancy>,
}

impl VerificationReport {
    /// Pass iff every discrepancy list is empty.
    pub fn outcome(&self) -> Outcome {
        if self.workflow_issues.is_empty()
            && self.cms_issues.is_empty()
            && self.property_issues.is_empty()
        {
            Outcome::Pass
        } else {
            Outcome::Fail
        }
    }

    pub fn total_discrepancies(&self) -> usize {
        self.workflow_issues.len() + self.cms_issues.len() + self.property_issues.len()
    }

    /// Every discrepancy in report order: workflows, CMS assets, properties.
    pub fn discrepancies(&self) -> impl Iterator<Item = &Discrepancy> {
        self.workflow_issues
            .iter()
            .chain(&self.cms_issues)
            .chain(&self.property_issues)
    }

    pub fn timestamp_label(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Log file name, e.g. `phase-verification-20250101T120000Z.md`
    pub fn file_name(&self) -> String {
        format!("phase-verification-{}.md", self.timestamp_label())
    }

    /// Render the Markdown log.
    pub fn render_markdown(&self) -> String {
        let ids = if self.reference_ids.is_empty() {
            "None".to_string()
        } else {
            self.reference_ids
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut out = format!("# Phase Verification Log ({})\n", self.timestamp_label());

        out.push_str("## Workflow Check\n");
        out.push_str(&format!("Workflows referenced in trace: {}\n", ids));
        push_section(
            &mut out,
            &self.workflow_issues,
            "All referenced workflows found.",
        );

        out.push_str("\n## CMS Asset Check\n");
        push_section(
            &mut out,
            &self.cms_issues,
            "All referenced modules/forms located in exports.",
        );

        out.push_str("\n## Property Schema Check\n");
        push_section(
            &mut out,
            &self.property_issues,
            "All properties from property-mapping files found in schema exports.",
        );

        out.push_str("\n---\n");
        match self.outcome() {
            Outcome::Pass => out.push_str("Verification completed successfully.\n"),
            Outcome::Fail => {
                out.push_str("Verification completed with discrepancies. See issues above.\n")
            }
        }
        out
    }

    /// Write the log into `log_dir` in one atomic step, creating the
    /// directory when needed. Returns the path written.
    pub fn write_to(&self, log_dir: &NormalizedPath) -> Result<NormalizedPath> {
        let path = log_dir.join(&self.file_name());
        trace_fs::write_atomic(&path, self.render_markdown().as_bytes())?;
        tracing::info!(path = %path, "Verification log written");
        Ok(path)
    }
}

fn push_section(out: &mut String, issues: &[Discrepancy], clean: &str) {
    if issues.is_empty() {
        out.push_str(clean);
        out.push('\n');
    } else {
        out.push_str("### Issues\n");
        for issue in issues {
            out.push_str(&format!("- {}\n", issue));
        }
    }
}
