//! Error types for trace-fs

use std::path::PathBuf;

/// Result type for trace-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in trace-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON at {path}: {message}")]
    JsonParse { path: PathBuf, message: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The underlying cause without the path prefix, for messages that
    /// already name the file.
    pub fn detail(&self) -> String {
        match self {
            Self::Io { source, .. } => source.to_string(),
            Self::JsonParse { message, .. } => message.clone(),
            Self::LockFailed { .. } => self.to_string(),
        }
    }
}
