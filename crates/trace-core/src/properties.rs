//! Property-mapping validation against schema exports

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use trace_fs::NormalizedPath;

use crate::Result;
use crate::load::LoadOutcome;
use crate::report::{Discrepancy, DiscrepancyKind};
use crate::schema::{SchemaLookup, SchemaRegistry};

/// Trailing path segments identifying a mapping file beneath a phase directory
pub const MAPPING_SUFFIX: [&str; 2] = ["properties", "property-mapping.json"];

/// Declared property names per object key, from one mapping file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyMapping {
    pub objects: BTreeMap<String, BTreeSet<String>>,
}

impl PropertyMapping {
    /// Parse a mapping document. Only the key sets of `objects.<key>` are
    /// used; property metadata is ignored. A document without `objects`
    /// declares nothing.
    pub fn from_value(document: &Value) -> std::result::Result<Self, String> {
        let Some(objects) = document.get("objects") else {
            return Ok(Self::default());
        };
        let Some(objects) = objects.as_object() else {
            return Err("`objects` must be a JSON object".to_string());
        };

        let mut mapping = Self::default();
        for (key, props) in objects {
            let Some(props) = props.as_object() else {
                return Err(format!(
                    "`objects.{}` must map property names to metadata",
                    key
                ));
            };
            mapping
                .objects
                .entry(key.clone())
                .or_default()
                .extend(props.keys().cloned());
        }
        Ok(mapping)
    }
}

/// Load every mapping file beneath `phase_dir`, keeping failures as
/// placeholders.
pub fn load_mappings(phase_dir: &NormalizedPath) -> Result<Vec<LoadOutcome<PropertyMapping>>> {
    let paths = trace_fs::find_files_ending_with(phase_dir, &MAPPING_SUFFIX)?;
    Ok(paths.into_iter().map(load_mapping).collect())
}

fn load_mapping(path: NormalizedPath) -> LoadOutcome<PropertyMapping> {
    match trace_fs::read_json::<Value>(&path) {
        Ok(document) => match PropertyMapping::from_value(&document) {
            Ok(value) => LoadOutcome::Loaded { path, value },
            Err(message) => {
                tracing::warn!(path = %path, %message, "Invalid property mapping");
                LoadOutcome::Failed { path, message }
            }
        },
        Err(e) => LoadOutcome::from_result(path, Err(e)),
    }
}

/// Checks declared properties against schema exports through a
/// [`SchemaRegistry`] it owns for the duration of the run.
#[derive(Debug)]
pub struct PropertyValidator {
    registry: SchemaRegistry,
}

impl PropertyValidator {
    pub fn new(registry: SchemaRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// At most one discrepancy per (mapping file, object key) pair.
    pub fn check(&mut self, mappings: &[LoadOutcome<PropertyMapping>]) -> Result<Vec<Discrepancy>> {
        let mut discrepancies = Vec::new();

        for outcome in mappings {
            let (source, mapping) = match outcome {
                LoadOutcome::Loaded { path, value } => (path, value),
                LoadOutcome::Failed { path, message } => {
                    discrepancies.push(Discrepancy::load_error(path, message));
                    continue;
                }
            };

            for (key, declared) in &mapping.objects {
                if let Some(issue) = self.check_object(source, key, declared)? {
                    discrepancies.push(issue);
                }
            }
        }

        Ok(discrepancies)
    }

    fn check_object(
        &mut self,
        source: &NormalizedPath,
        key: &str,
        declared: &BTreeSet<String>,
    ) -> Result<Option<Discrepancy>> {
        let schema = match self.registry.lookup(key)? {
            SchemaLookup::Found { properties, .. } if !properties.is_empty() => properties,
            SchemaLookup::Unreadable { path, message } => {
                return Ok(Some(Discrepancy::new(
                    DiscrepancyKind::LoadError,
                    format!(
                        "Failed to load {}: {} (object '{}' referenced in {})",
                        path, message, key, source
                    ),
                )));
            }
            _ => {
                return Ok(Some(Discrepancy::new(
                    DiscrepancyKind::SchemaMissingForObject,
                    format!(
                        "No schema export found for object '{}' referenced in {}",
                        key, source
                    ),
                )));
            }
        };

        let missing: Vec<&str> = declared
            .iter()
            .filter(|p| !schema.contains(*p))
            .map(String::as_str)
            .collect();
        if missing.is_empty() {
            return Ok(None);
        }

        Ok(Some(Discrepancy::new(
            DiscrepancyKind::PropertyMissingInSchema,
            format!(
                "Properties missing in schema for {}: {} (source: {})",
                key,
                missing.join(", "),
                source
            ),
        )))
    }
}
