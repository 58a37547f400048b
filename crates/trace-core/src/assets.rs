//! CMS asset reconciliation
//!
//! Asset inventories declare the modules and forms a phase relies on. Modules
//! are matched against subdirectories of the module export, forms against the
//! names listed in the forms export.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::Value;
use trace_fs::NormalizedPath;

use crate::Result;
use crate::load::{self, LoadOutcome};
use crate::report::{Discrepancy, DiscrepancyKind};

/// Trailing path segments identifying an inventory beneath a phase directory
pub const INVENTORY_SUFFIX: [&str; 2] = ["assets", "asset-inventory.json"];

/// Declared CMS assets for one part of a phase
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct AssetInventory {
    #[serde(default)]
    pub modules: Vec<NamedAsset>,
    #[serde(default)]
    pub forms: Vec<NamedAsset>,
}

/// Inventory entry; only the name takes part in reconciliation
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NamedAsset {
    #[serde(default)]
    pub name: Option<String>,
}

impl NamedAsset {
    /// The declared name, or `None` when absent or empty.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref().filter(|n| !n.is_empty())
    }
}

/// Load every inventory beneath `phase_dir`. A file that fails to parse is
/// kept as a [`LoadOutcome::Failed`] placeholder.
pub fn load_inventories(phase_dir: &NormalizedPath) -> Result<Vec<LoadOutcome<AssetInventory>>> {
    let paths = trace_fs::find_files_ending_with(phase_dir, &INVENTORY_SUFFIX)?;
    Ok(paths.into_iter().map(load::load_json).collect())
}

#[derive(Debug, Deserialize)]
struct FormsExport {
    #[serde(default)]
    results: Vec<Value>,
}

/// Form names known to the export, or why they are unavailable
enum FormIndex {
    Names(BTreeSet<String>),
    Unavailable,
}

/// Checks declared modules and forms against the CMS exports.
#[derive(Debug, Clone)]
pub struct AssetReconciler {
    module_dir: NormalizedPath,
    forms_export: NormalizedPath,
}

impl AssetReconciler {
    pub fn new(module_dir: NormalizedPath, forms_export: NormalizedPath) -> Self {
        Self {
            module_dir,
            forms_export,
        }
    }

    /// Reconcile every inventory. Failed loads are forwarded verbatim.
    pub fn check(&self, inventories: &[LoadOutcome<AssetInventory>]) -> Vec<Discrepancy> {
        let mut discrepancies = Vec::new();
        let forms = self.index_forms(&mut discrepancies);

        for outcome in inventories {
            let inventory = match outcome {
                LoadOutcome::Loaded { value, .. } => value,
                LoadOutcome::Failed { path, message } => {
                    discrepancies.push(Discrepancy::load_error(path, message));
                    continue;
                }
            };

            for name in inventory.modules.iter().filter_map(NamedAsset::name) {
                if !self.module_dir.join(name).exists() {
                    discrepancies.push(Discrepancy::new(
                        DiscrepancyKind::CmsModuleMissing,
                        format!("CMS module missing: {}", name),
                    ));
                }
            }

            let FormIndex::Names(known) = &forms else {
                continue;
            };
            if known.is_empty() {
                continue;
            }
            for name in inventory.forms.iter().filter_map(NamedAsset::name) {
                if !known.contains(name) {
                    discrepancies.push(Discrepancy::new(
                        DiscrepancyKind::CmsFormMissing,
                        format!("Form not found in export: {}", name),
                    ));
                }
            }
        }

        discrepancies
    }

    /// Build the set of exported form names once per check. A missing or
    /// unreadable export records a single discrepancy and disables form
    /// checks.
    fn index_forms(&self, discrepancies: &mut Vec<Discrepancy>) -> FormIndex {
        if !self.forms_export.exists() {
            tracing::warn!(path = %self.forms_export, "CMS forms export missing");
            discrepancies.push(Discrepancy::new(
                DiscrepancyKind::LoadError,
                "CMS forms export missing; cannot validate forms.",
            ));
            return FormIndex::Unavailable;
        }

        match load::load_json::<FormsExport>(self.forms_export.clone()) {
            LoadOutcome::Loaded { value, .. } => {
                let names: BTreeSet<String> = value
                    .results
                    .iter()
                    .filter_map(|entry| entry.get("name").and_then(Value::as_str))
                    .filter(|name| !name.is_empty())
                    .map(str::to_string)
                    .collect();
                if names.is_empty() {
                    tracing::warn!(path = %self.forms_export, "Forms export lists no forms; skipping form checks");
                }
                FormIndex::Names(names)
            }
            LoadOutcome::Failed { path, message } => {
                discrepancies.push(Discrepancy::load_error(&path, &message));
                FormIndex::Unavailable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::TempDir;

    struct Exports {
        _temp: TempDir,
        reconciler: AssetReconciler,
        root: std::path::PathBuf,
    }

    fn exports(modules: &[&str], forms_json: Option<&str>) -> Exports {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        let module_dir = root.join("modules");
        fs::create_dir_all(&module_dir).unwrap();
        for module in modules {
            fs::create_dir_all(module_dir.join(module)).unwrap();
        }
        let forms_path = root.join("cms_forms_data.json");
        if let Some(content) = forms_json {
            fs::write(&forms_path, content).unwrap();
        }
        Exports {
            reconciler: AssetReconciler::new(
                NormalizedPath::new(&module_dir),
                NormalizedPath::new(&forms_path),
            ),
            _temp: temp,
            root,
        }
    }

    fn inventory(modules: &[&str], forms: &[&str]) -> LoadOutcome<AssetInventory> {
        let named = |names: &[&str]| -> Vec<NamedAsset> {
            names
                .iter()
                .map(|n| NamedAsset {
                    name: Some(n.to_string()),
                })
                .collect()
        };
        LoadOutcome::Loaded {
            path: NormalizedPath::new("/phase/assets/asset-inventory.json"),
            value: AssetInventory {
                modules: named(modules),
                forms: named(forms),
            },
        }
    }

    fn messages(issues: &[Discrepancy]) -> Vec<&str> {
        issues.iter().map(|d| d.message.as_str()).collect()
    }

    #[test]
    fn test_all_assets_present() {
        let exports = exports(
            &["approval-banner"],
            Some(r#"{"results": [{"name": "Timesheet Approval"}]}"#),
        );
        let issues = exports
            .reconciler
            .check(&[inventory(&["approval-banner"], &["Timesheet Approval"])]);
        assert!(issues.is_empty(), "unexpected: {:?}", issues);
    }

    #[test]
    fn test_missing_module_and_absent_forms_export() {
        let exports = exports(&[], None);
        let issues = exports
            .reconciler
            .check(&[inventory(&["approval-banner"], &["Form A", "Form B"])]);

        assert_eq!(
            messages(&issues),
            vec![
                "CMS forms export missing; cannot validate forms.",
                "CMS module missing: approval-banner",
            ]
        );
        assert_eq!(issues[1].kind, DiscrepancyKind::CmsModuleMissing);
    }

    #[test]
    fn test_missing_form_reported() {
        let exports = exports(
            &[],
            Some(r#"{"results": [{"name": "Known"}, "stray", {"id": 3}]}"#),
        );
        let issues = exports.reconciler.check(&[inventory(&[], &["Known", "Unknown"])]);

        assert_eq!(messages(&issues), vec!["Form not found in export: Unknown"]);
        assert_eq!(issues[0].kind, DiscrepancyKind::CmsFormMissing);
    }

    #[test]
    fn test_failed_inventory_forwarded_without_aborting() {
        let exports = exports(&["ok-module"], Some(r#"{"results": [{"name": "F"}]}"#));
        let failed = LoadOutcome::Failed {
            path: NormalizedPath::new("/phase/a/assets/asset-inventory.json"),
            message: "EOF while parsing".to_string(),
        };
        let issues = exports
            .reconciler
            .check(&[failed, inventory(&["ok-module", "gone"], &[])]);

        assert_eq!(
            messages(&issues),
            vec![
                "Failed to load /phase/a/assets/asset-inventory.json: EOF while parsing",
                "CMS module missing: gone",
            ]
        );
    }

    #[test]
    fn test_unreadable_forms_export_disables_form_checks() {
        let exports = exports(&[], Some("not json"));
        let issues = exports.reconciler.check(&[inventory(&[], &["Anything"])]);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, DiscrepancyKind::LoadError);
        assert!(issues[0].message.contains("cms_forms_data.json"));
        assert!(exports.root.join("cms_forms_data.json").exists());
    }

    #[test]
    fn test_unnamed_entries_skipped() {
        let exports = exports(&[], Some(r#"{"results": [{"name": "F"}]}"#));
        let value = AssetInventory {
            modules: vec![NamedAsset { name: None }, NamedAsset { name: Some(String::new()) }],
            forms: vec![NamedAsset { name: None }],
        };
        let issues = exports.reconciler.check(&[LoadOutcome::Loaded {
            path: NormalizedPath::new("/phase/assets/asset-inventory.json"),
            value,
        }]);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_load_inventories_keeps_failures() {
        let temp = TempDir::new().unwrap();
        let good = temp.path().join("agents/a/assets");
        let bad = temp.path().join("agents/b/assets");
        fs::create_dir_all(&good).unwrap();
        fs::create_dir_all(&bad).unwrap();
        fs::write(
            good.join("asset-inventory.json"),
            r#"{"modules": [{"name": "m1", "path": "x"}]}"#,
        )
        .unwrap();
        fs::write(bad.join("asset-inventory.json"), "{").unwrap();

        let loaded = load_inventories(&NormalizedPath::new(temp.path())).unwrap();
        assert_eq!(loaded.len(), 2);
        match &loaded[0] {
            LoadOutcome::Loaded { value, .. } => {
                assert_eq!(value.modules[0].name(), Some("m1"));
                assert!(value.forms.is_empty());
            }
            other => panic!("expected loaded inventory, got {:?}", other),
        }
        assert!(matches!(loaded[1], LoadOutcome::Failed { .. }));
    }
}
