//! Error types for trace-core

use std::path::PathBuf;

/// Result type for trace-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a verification run.
///
/// Discrepancies between documentation and exports are not errors; they are
/// collected into the report. Only configuration problems and unexpected I/O
/// failures surface here.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Trace document does not exist
    #[error("Trace file not found at {path}")]
    TraceNotFound { path: PathBuf },

    /// Phase directory does not exist
    #[error("Phase directory not found at {path}")]
    PhaseDirNotFound { path: PathBuf },

    /// Trace path or phase directory was never specified
    #[error("{message}")]
    MissingConfiguration { message: String },

    /// A `--phase` name with no preset behind it
    #[error("Unknown phase: {name}")]
    UnknownPhase { name: String },

    /// Project configuration file could not be parsed
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    /// Filesystem error from trace-fs
    #[error(transparent)]
    Fs(#[from] trace_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// TOML deserialization error
    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),
}

impl Error {
    /// Whether this error belongs to the fatal configuration class, raised
    /// before any checker runs.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::TraceNotFound { .. }
                | Self::PhaseDirNotFound { .. }
                | Self::MissingConfiguration { .. }
                | Self::UnknownPhase { .. }
                | Self::ConfigParse { .. }
        )
    }
}
