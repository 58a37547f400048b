//! [`PhaseFixture`] builder for verification scenarios.
//!
//! Lays out a temporary project like this:
//!
//! ```text
//! <root>/
//!   phase/
//!     docs/TRACE.md
//!     <part>/assets/asset-inventory.json
//!     <part>/properties/property-mapping.json
//!     verification/logs/          (written by a run)
//!   exports/
//!     workflows/
//!     schemas/
//!     modules/<module>/
//!     cms_forms_data.json         (only after `with_forms`)
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use tempfile::TempDir;

/// A temporary project with one phase and a set of exports.
///
/// # Example
///
/// ```rust,no_run
/// use trace_test_utils::PhaseFixture;
///
/// let fixture = PhaseFixture::new()
///     .with_trace("Workflow (567358311) triggers approval")
///     .with_workflow_export("v4-flow-567358311.json");
/// fixture.assert_file_exists("exports/workflows/v4-flow-567358311.json");
/// ```
pub struct PhaseFixture {
    temp_dir: TempDir,
}

impl Default for PhaseFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl PhaseFixture {
    /// Create the directory skeleton with an empty trace and no forms export.
    pub fn new() -> Self {
        let fixture = Self {
            temp_dir: TempDir::new().unwrap(),
        };
        for dir in ["phase/docs", "exports/workflows", "exports/schemas", "exports/modules"] {
            fs::create_dir_all(fixture.root().join(dir)).unwrap();
        }
        fixture.write("phase/docs/TRACE.md", "");
        fixture
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn phase_dir(&self) -> PathBuf {
        self.root().join("phase")
    }

    pub fn trace_path(&self) -> PathBuf {
        self.root().join("phase/docs/TRACE.md")
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root().join("phase/verification/logs")
    }

    pub fn workflow_dir(&self) -> PathBuf {
        self.root().join("exports/workflows")
    }

    pub fn schema_dir(&self) -> PathBuf {
        self.root().join("exports/schemas")
    }

    pub fn module_dir(&self) -> PathBuf {
        self.root().join("exports/modules")
    }

    pub fn forms_path(&self) -> PathBuf {
        self.root().join("exports/cms_forms_data.json")
    }

    /// Write `content` to `rel` (relative to the root), creating parents.
    pub fn write(&self, rel: &str, content: &str) {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("Could not write {}: {}", path.display(), e));
    }

    fn write_json(&self, rel: &str, value: &Value) {
        self.write(rel, &serde_json::to_string_pretty(value).unwrap());
    }

    pub fn with_trace(self, text: &str) -> Self {
        self.write("phase/docs/TRACE.md", text);
        self
    }

    /// Add an (empty) workflow export file by exact name.
    pub fn with_workflow_export(self, file_name: &str) -> Self {
        self.write(&format!("exports/workflows/{file_name}"), "{}");
        self
    }

    /// Add a schema export listing `properties` as top-level descriptors.
    pub fn with_schema(self, file_name: &str, properties: &[&str]) -> Self {
        let descriptors: Vec<Value> = properties
            .iter()
            .map(|name| json!({ "name": name, "type": "string" }))
            .collect();
        self.write_json(
            &format!("exports/schemas/{file_name}"),
            &json!({ "properties": descriptors }),
        );
        self
    }

    /// Add a schema export using the nested `schema.results` shape.
    pub fn with_nested_schema(self, file_name: &str, properties: &[&str]) -> Self {
        let descriptors: Vec<Value> = properties.iter().map(|name| json!({ "name": name })).collect();
        self.write_json(
            &format!("exports/schemas/{file_name}"),
            &json!({ "schema": { "results": descriptors } }),
        );
        self
    }

    pub fn with_module(self, name: &str) -> Self {
        fs::create_dir_all(self.module_dir().join(name)).unwrap();
        self
    }

    /// Write the forms export listing `names`.
    pub fn with_forms(self, names: &[&str]) -> Self {
        let results: Vec<Value> = names.iter().map(|name| json!({ "name": name })).collect();
        self.write_json("exports/cms_forms_data.json", &json!({ "results": results }));
        self
    }

    /// Add `phase/<part>/assets/asset-inventory.json`.
    pub fn with_inventory(self, part: &str, modules: &[&str], forms: &[&str]) -> Self {
        let named = |names: &[&str]| -> Vec<Value> {
            names.iter().map(|name| json!({ "name": name })).collect()
        };
        self.write_json(
            &format!("phase/{part}/assets/asset-inventory.json"),
            &json!({ "modules": named(modules), "forms": named(forms) }),
        );
        self
    }

    /// Add `phase/<part>/properties/property-mapping.json` declaring
    /// `objects` as key to property names.
    pub fn with_property_mapping(self, part: &str, objects: &[(&str, &[&str])]) -> Self {
        let mut object_map = Map::new();
        for (key, properties) in objects {
            let props: Map<String, Value> = properties
                .iter()
                .map(|p| (p.to_string(), json!({ "source": "trace" })))
                .collect();
            object_map.insert(key.to_string(), Value::Object(props));
        }
        self.write_json(
            &format!("phase/{part}/properties/property-mapping.json"),
            &json!({ "objects": object_map }),
        );
        self
    }

    /// Path of the mapping file for `part`, as it appears in messages.
    pub fn mapping_path(&self, part: &str) -> PathBuf {
        self.phase_dir().join(part).join("properties/property-mapping.json")
    }

    /// Log files written so far, sorted.
    pub fn log_files(&self) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(self.log_dir()) else {
            return Vec::new();
        };
        let mut files: Vec<PathBuf> = entries.map(|e| e.unwrap().path()).collect();
        files.sort();
        files
    }

    /// Assert that `path` (relative to the root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }
}
