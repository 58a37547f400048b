//! One verification run from resolved configuration to written log

use chrono::{DateTime, Utc};
use serde::Serialize;
use trace_fs::NormalizedPath;

use crate::assets::{AssetReconciler, load_inventories};
use crate::config::RunConfig;
use crate::properties::{PropertyValidator, load_mappings};
use crate::report::VerificationReport;
use crate::schema::{SchemaLocator, SchemaRegistry};
use crate::workflows::WorkflowResolver;
use crate::{Error, Result};

/// The narrative document whose claims are being verified
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceDocument {
    pub path: NormalizedPath,
    pub text: String,
}

impl TraceDocument {
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        Ok(Self {
            path: path.clone(),
            text: trace_fs::read_text_lossy(path)?,
        })
    }
}

/// Result of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub report: VerificationReport,
    pub log_path: NormalizedPath,
    /// Advisory notes that do not affect the outcome
    pub warnings: Vec<String>,
}

/// Runs the three independent checks and merges their findings.
pub struct Verifier {
    config: RunConfig,
}

impl Verifier {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    /// Fail fast on the fatal configuration class before any checker runs.
    pub fn preflight(&self) -> Result<()> {
        if !self.config.trace.is_file() {
            return Err(Error::TraceNotFound {
                path: self.config.trace.to_native(),
            });
        }
        if !self.config.phase_dir.is_dir() {
            return Err(Error::PhaseDirNotFound {
                path: self.config.phase_dir.to_native(),
            });
        }
        Ok(())
    }

    /// Run every check and build the report without writing anything.
    pub fn verify(&self) -> Result<VerificationReport> {
        self.verify_at(Utc::now())
    }

    /// [`verify`](Self::verify) with an explicit report timestamp.
    pub fn verify_at(&self, timestamp: DateTime<Utc>) -> Result<VerificationReport> {
        self.preflight()?;
        let config = &self.config;

        let trace = TraceDocument::load(&config.trace)?;
        let reference_ids = config.extractor().extract(&trace.text);
        tracing::info!(trace = %trace.path, count = reference_ids.len(), "Extracted workflow references");

        let workflow_issues = WorkflowResolver::new(config.exports.workflows.clone()).check(&reference_ids);

        let inventories = load_inventories(&config.phase_dir)?;
        let cms_issues = AssetReconciler::new(
            config.exports.cms_modules.clone(),
            config.exports.cms_forms.clone(),
        )
        .check(&inventories);

        let mappings = load_mappings(&config.phase_dir)?;
        let registry = SchemaRegistry::new(SchemaLocator::new(
            config.exports.schemas.clone(),
            config.known_schemas.clone(),
        ));
        let property_issues = PropertyValidator::new(registry).check(&mappings)?;

        tracing::info!(
            workflows = workflow_issues.len(),
            cms = cms_issues.len(),
            properties = property_issues.len(),
            "Checks complete"
        );

        Ok(VerificationReport {
            timestamp,
            reference_ids,
            workflow_issues,
            cms_issues,
            property_issues,
        })
    }

    /// Verify and write the log. The log is written once, after every check
    /// has finished.
    pub fn run(&self) -> Result<RunSummary> {
        let report = self.verify()?;

        let mut warnings = Vec::new();
        if self.config.expect_workflows && report.reference_ids.is_empty() {
            let message = "No workflow IDs detected in trace; ensure the trace is populated \
                           with workflow references before running verification."
                .to_string();
            tracing::warn!("{}", message);
            warnings.push(message);
        }

        let log_path = report.write_to(&self.config.log_dir)?;
        Ok(RunSummary {
            report,
            log_path,
            warnings,
        })
    }
}
