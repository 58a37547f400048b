//! Resolution of workflow references to exported definition files

use std::collections::BTreeSet;

use serde::Serialize;
use trace_fs::NormalizedPath;

use crate::report::{Discrepancy, DiscrepancyKind};

/// Accepted export file names as `(prefix, suffix)` around the identifier.
///
/// Exports have been produced under several naming schemes over time; any one
/// of them satisfies a reference.
pub const WORKFLOW_FILE_TEMPLATES: [(&str, &str); 4] = [
    ("v4-flow-", ".json"),
    ("v4-workflow-", ".json"),
    ("workflow-", "-v4.json"),
    ("workflow-", ".json"),
];

/// A workflow identifier and the export file found for it, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowExportRecord {
    pub id: String,
    pub resolved: Option<NormalizedPath>,
}

impl WorkflowExportRecord {
    pub fn exists(&self) -> bool {
        self.resolved.is_some()
    }
}

/// Checks workflow identifiers against an export directory.
#[derive(Debug, Clone)]
pub struct WorkflowResolver {
    export_dir: NormalizedPath,
}

impl WorkflowResolver {
    pub fn new(export_dir: NormalizedPath) -> Self {
        Self { export_dir }
    }

    /// All file paths that would satisfy `id`, in template order.
    pub fn candidate_paths(&self, id: &str) -> Vec<NormalizedPath> {
        WORKFLOW_FILE_TEMPLATES
            .iter()
            .map(|(prefix, suffix)| self.export_dir.join(&format!("{prefix}{id}{suffix}")))
            .collect()
    }

    /// Find the first existing export for `id`. Content is not inspected.
    pub fn resolve(&self, id: &str) -> WorkflowExportRecord {
        let resolved = self.candidate_paths(id).into_iter().find(|p| p.exists());
        WorkflowExportRecord {
            id: id.to_string(),
            resolved,
        }
    }

    /// One discrepancy per identifier with no export, in identifier order.
    pub fn check(&self, ids: &BTreeSet<String>) -> Vec<Discrepancy> {
        ids.iter()
            .map(|id| self.resolve(id))
            .filter(|record| !record.exists())
            .map(|record| {
                tracing::debug!(id = %record.id, dir = %self.export_dir, "Workflow export missing");
                Discrepancy::new(
                    DiscrepancyKind::WorkflowMissing,
                    format!("Workflow {} missing export file.", record.id),
                )
            })
            .collect()
    }
}
