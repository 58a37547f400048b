//! Configuration resolution
//!
//! A run is configured from these sources, later ones overriding earlier:
//!
//! 1. **Built-in defaults** - export locations and the standard phase presets
//! 2. **Project config** - `trace-verify.toml` at the project root
//! 3. **Local overrides** - `trace-verify.local.toml` (git-ignored)
//! 4. **Command-line flags** - [`RunOverrides`]
//!
//! Relative paths resolve against the project root.
//!
//! # Example
//!
//! ```ignore
//! use trace_core::config::{ConfigResolver, RunOverrides};
//! use trace_fs::NormalizedPath;
//!
//! let resolver = ConfigResolver::new(NormalizedPath::new("/path/to/project"));
//! let config = resolver.resolve(&RunOverrides::for_phase("approval"))?;
//! println!("Trace: {}", config.trace);
//! ```

mod manifest;
mod resolver;

pub use manifest::{ExportsSection, ExtractionSection, PhaseSection, ProjectManifest, SchemasSection};
pub use resolver::{
    CONFIG_FILE_NAME, ConfigResolver, ExportPaths, LOCAL_CONFIG_FILE_NAME, RunConfig, RunOverrides,
};
