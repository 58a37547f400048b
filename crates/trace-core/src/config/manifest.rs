//! Parsing and merging of `trace-verify.toml`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Result;

/// Export locations, relative to the project root unless absolute
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportsSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workflows: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schemas: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cms_modules: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cms_forms: Option<String>,
}

/// A named phase preset
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhaseSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase_dir: Option<String>,
    /// Defaults to `<phase_dir>/verification/logs`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,
    /// Warn when the trace yields no workflow references
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect_workflows: Option<bool>,
}

/// Additions to the known object-to-schema-file table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemasSection {
    #[serde(default)]
    pub known: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub portal_prefixes: Option<Vec<String>>,
}

/// Project configuration parsed from one TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectManifest {
    #[serde(default)]
    pub exports: ExportsSection,

    #[serde(default)]
    pub phases: BTreeMap<String, PhaseSection>,

    #[serde(default)]
    pub schemas: SchemasSection,

    #[serde(default)]
    pub extraction: ExtractionSection,
}

fn phase(trace: &str, phase_dir: &str, expect_workflows: bool) -> PhaseSection {
    PhaseSection {
        trace: Some(trace.to_string()),
        phase_dir: Some(phase_dir.to_string()),
        log_dir: None,
        expect_workflows: Some(expect_workflows),
    }
}

impl ProjectManifest {
    /// Parse a manifest from TOML content
    ///
    /// # Example
    ///
    /// ```
    /// use trace_core::config::ProjectManifest;
    ///
    /// let manifest = ProjectManifest::parse(r#"
    /// [exports]
    /// workflows = "exports/workflows"
    ///
    /// [phases.onboarding]
    /// trace = "docs/ONBOARDING.md"
    /// phase_dir = "phases/onboarding"
    /// "#).unwrap();
    ///
    /// assert_eq!(manifest.exports.workflows.as_deref(), Some("exports/workflows"));
    /// assert!(manifest.phases.contains_key("onboarding"));
    /// ```
    pub fn parse(content: &str) -> Result<Self> {
        let manifest: ProjectManifest = toml::from_str(content)?;
        Ok(manifest)
    }

    /// Defaults matching the standard export layout and phase tree
    pub fn builtin() -> Self {
        let phases = [
            (
                "foundation",
                phase(
                    "analysis/timesheet_process/phases/01-foundation/docs/FOUNDATIONS-TRACE.md",
                    "analysis/timesheet_process/phases/01-foundation",
                    false,
                ),
            ),
            (
                "timesheet_creation",
                phase(
                    "analysis/timesheet_process/phases/02-timesheet-creation/docs/TRACE.md",
                    "analysis/timesheet_process/phases/02-timesheet-creation",
                    false,
                ),
            ),
            (
                "approval",
                phase(
                    "analysis/timesheet_process/phases/03-approval/docs/TRACE.md",
                    "analysis/timesheet_process/phases/03-approval",
                    true,
                ),
            ),
            (
                "billing",
                phase(
                    "analysis/timesheet_process/phases/04-billing/docs/TRACE.md",
                    "analysis/timesheet_process/phases/04-billing",
                    true,
                ),
            ),
        ];

        Self {
            exports: ExportsSection {
                workflows: Some("data/raw/workflows".into()),
                schemas: Some("data/raw/ai-context/ai-context-export/data-model".into()),
                cms_modules: Some("data/raw/hubspot-cms-assets/Timesheets-Theme/modules".into()),
                cms_forms: Some("data/raw/hubspot-cms-api/forms/cms_forms_data.json".into()),
            },
            phases: phases
                .into_iter()
                .map(|(name, section)| (name.to_string(), section))
                .collect(),
            schemas: SchemasSection::default(),
            extraction: ExtractionSection {
                portal_prefixes: Some(vec![crate::extract::DEFAULT_PORTAL_PREFIX.to_string()]),
            },
        }
    }

    /// Merge another manifest into this one; `other` wins for every value it
    /// sets. Phases merge field by field, so a project file can move just the
    /// log directory of a built-in phase.
    pub fn merge(&mut self, other: &ProjectManifest) {
        merge_option(&mut self.exports.workflows, &other.exports.workflows);
        merge_option(&mut self.exports.schemas, &other.exports.schemas);
        merge_option(&mut self.exports.cms_modules, &other.exports.cms_modules);
        merge_option(&mut self.exports.cms_forms, &other.exports.cms_forms);

        for (name, other_phase) in &other.phases {
            let phase = self.phases.entry(name.clone()).or_default();
            merge_option(&mut phase.trace, &other_phase.trace);
            merge_option(&mut phase.phase_dir, &other_phase.phase_dir);
            merge_option(&mut phase.log_dir, &other_phase.log_dir);
            merge_option(&mut phase.expect_workflows, &other_phase.expect_workflows);
        }

        self.schemas
            .known
            .extend(other.schemas.known.iter().map(|(k, v)| (k.clone(), v.clone())));

        merge_option(
            &mut self.extraction.portal_prefixes,
            &other.extraction.portal_prefixes,
        );
    }
}

fn merge_option<T: Clone>(base: &mut Option<T>, other: &Option<T>) {
    if let Some(value) = other {
        *base = Some(value.clone());
    }
}
