//! Resolution of a single run's configuration

use std::fs;

use serde::Serialize;
use trace_fs::NormalizedPath;

use super::manifest::{PhaseSection, ProjectManifest};
use crate::extract::ReferenceExtractor;
use crate::schema::KnownSchemaTable;
use crate::{Error, Result};

/// Project configuration file at the project root
pub const CONFIG_FILE_NAME: &str = "trace-verify.toml";

/// Git-ignored local overrides next to the project configuration
pub const LOCAL_CONFIG_FILE_NAME: &str = "trace-verify.local.toml";

/// Values supplied on the command line; each one beats every file layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOverrides {
    pub phase: Option<String>,
    pub trace: Option<String>,
    pub phase_dir: Option<String>,
    pub log_dir: Option<String>,
    pub workflow_dir: Option<String>,
    pub schema_dir: Option<String>,
    pub cms_modules_dir: Option<String>,
    pub cms_forms: Option<String>,
}

impl RunOverrides {
    pub fn for_phase(phase: impl Into<String>) -> Self {
        Self {
            phase: Some(phase.into()),
            ..Self::default()
        }
    }
}

/// Absolute export locations for one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportPaths {
    pub workflows: NormalizedPath,
    pub schemas: NormalizedPath,
    pub cms_modules: NormalizedPath,
    pub cms_forms: NormalizedPath,
}

/// Fully resolved inputs for one verification run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub root: NormalizedPath,
    pub phase: Option<String>,
    pub trace: NormalizedPath,
    pub phase_dir: NormalizedPath,
    pub log_dir: NormalizedPath,
    pub exports: ExportPaths,
    pub known_schemas: KnownSchemaTable,
    pub portal_prefixes: Vec<String>,
    pub expect_workflows: bool,
}

impl RunConfig {
    /// Configuration for explicit paths with built-in defaults for
    /// everything else. Paths are used as given.
    pub fn new(
        root: NormalizedPath,
        trace: NormalizedPath,
        phase_dir: NormalizedPath,
        exports: ExportPaths,
    ) -> Self {
        let log_dir = default_log_dir(&phase_dir);
        Self {
            root,
            phase: None,
            trace,
            phase_dir,
            log_dir,
            exports,
            known_schemas: KnownSchemaTable::builtin(),
            portal_prefixes: vec![crate::extract::DEFAULT_PORTAL_PREFIX.to_string()],
            expect_workflows: false,
        }
    }

    pub fn extractor(&self) -> ReferenceExtractor {
        ReferenceExtractor::new(self.portal_prefixes.clone())
    }
}

fn default_log_dir(phase_dir: &NormalizedPath) -> NormalizedPath {
    phase_dir.join("verification/logs")
}

/// Resolves run configuration by layering defaults, project files and
/// command-line overrides.
pub struct ConfigResolver {
    root: NormalizedPath,
}

impl ConfigResolver {
    pub fn new(root: NormalizedPath) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &NormalizedPath {
        &self.root
    }

    pub fn config_path(&self) -> NormalizedPath {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn has_config(&self) -> bool {
        self.config_path().is_file()
    }

    /// Built-in defaults merged with the project and local config files.
    /// Missing files are skipped; invalid TOML is an error.
    pub fn load_manifest(&self) -> Result<ProjectManifest> {
        let mut manifest = ProjectManifest::builtin();

        for path in [self.config_path(), self.root.join(LOCAL_CONFIG_FILE_NAME)] {
            if !path.is_file() {
                tracing::debug!(path = %path, "No config file, skipping");
                continue;
            }
            tracing::debug!(path = %path, "Loading config");
            let content = fs::read_to_string(path.to_native())?;
            let layer = ProjectManifest::parse(&content).map_err(|e| Error::ConfigParse {
                path: path.to_native(),
                message: e.to_string(),
            })?;
            manifest.merge(&layer);
        }

        Ok(manifest)
    }

    /// Produce the configuration for one run.
    ///
    /// Fails with a configuration error when the named phase does not exist
    /// or when trace path and phase directory cannot both be determined.
    /// Existence of the paths is checked by the verifier, not here.
    pub fn resolve(&self, overrides: &RunOverrides) -> Result<RunConfig> {
        let manifest = self.load_manifest()?;
        self.resolve_with(&manifest, overrides)
    }

    /// Like [`resolve`](Self::resolve) with an already loaded manifest.
    pub fn resolve_with(&self, manifest: &ProjectManifest, overrides: &RunOverrides) -> Result<RunConfig> {
        let preset = match &overrides.phase {
            Some(name) => manifest
                .phases
                .get(name)
                .cloned()
                .ok_or_else(|| Error::UnknownPhase { name: name.clone() })?,
            None => PhaseSection::default(),
        };

        let trace = overrides.trace.as_ref().or(preset.trace.as_ref());
        let phase_dir = overrides.phase_dir.as_ref().or(preset.phase_dir.as_ref());
        let (Some(trace), Some(phase_dir)) = (trace, phase_dir) else {
            return Err(Error::MissingConfiguration {
                message: "Trace path and phase directory must be specified \
                          (either via --phase or explicit arguments)"
                    .to_string(),
            });
        };

        let trace = self.path(trace);
        let phase_dir = self.path(phase_dir);
        let log_dir = overrides
            .log_dir
            .as_ref()
            .or(preset.log_dir.as_ref())
            .map(|p| self.path(p))
            .unwrap_or_else(|| default_log_dir(&phase_dir));

        let exports = ExportPaths {
            workflows: self.export(&overrides.workflow_dir, &manifest.exports.workflows, "workflows")?,
            schemas: self.export(&overrides.schema_dir, &manifest.exports.schemas, "schemas")?,
            cms_modules: self.export(
                &overrides.cms_modules_dir,
                &manifest.exports.cms_modules,
                "cms_modules",
            )?,
            cms_forms: self.export(&overrides.cms_forms, &manifest.exports.cms_forms, "cms_forms")?,
        };

        let mut known_schemas = KnownSchemaTable::builtin();
        known_schemas.extend(manifest.schemas.known.clone());

        let config = RunConfig {
            root: self.root.clone(),
            phase: overrides.phase.clone(),
            trace,
            phase_dir,
            log_dir,
            exports,
            known_schemas,
            portal_prefixes: manifest.extraction.portal_prefixes.clone().unwrap_or_default(),
            expect_workflows: preset.expect_workflows.unwrap_or(false),
        };
        tracing::debug!(?config, "Resolved run configuration");
        Ok(config)
    }

    fn path(&self, value: &str) -> NormalizedPath {
        NormalizedPath::new(value).resolve_against(&self.root)
    }

    fn export(&self, flag: &Option<String>, configured: &Option<String>, name: &str) -> Result<NormalizedPath> {
        flag.as_ref()
            .or(configured.as_ref())
            .map(|p| self.path(p))
            .ok_or_else(|| Error::MissingConfiguration {
                message: format!("No location configured for the {} export", name),
            })
    }
}
