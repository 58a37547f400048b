//! Recover-and-report loading of declaration and export files
//!
//! A file that cannot be read or parsed never aborts a run. It becomes a
//! [`LoadOutcome::Failed`] which the checkers forward as a load-error
//! discrepancy.

use serde::de::DeserializeOwned;
use trace_fs::NormalizedPath;

/// Result of loading one file that the run should survive failing on.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome<T> {
    Loaded { path: NormalizedPath, value: T },
    Failed { path: NormalizedPath, message: String },
}

impl<T> LoadOutcome<T> {
    /// Path of the file this outcome came from.
    pub fn path(&self) -> &NormalizedPath {
        match self {
            Self::Loaded { path, .. } | Self::Failed { path, .. } => path,
        }
    }

    /// Convert a parse attempt into an outcome, logging the failure.
    pub fn from_result(path: NormalizedPath, result: trace_fs::Result<T>) -> Self {
        match result {
            Ok(value) => Self::Loaded { path, value },
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Failed to load file");
                Self::Failed {
                    path,
                    message: e.detail(),
                }
            }
        }
    }
}

/// Read a JSON file into `T`, capturing any failure in the outcome.
pub fn load_json<T: DeserializeOwned>(path: NormalizedPath) -> LoadOutcome<T> {
    let result = trace_fs::read_json(&path);
    LoadOutcome::from_result(path, result)
}
