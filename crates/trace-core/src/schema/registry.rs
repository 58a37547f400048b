//! Run-scoped schema cache

use std::collections::{BTreeSet, HashMap};

use serde_json::Value;
use trace_fs::NormalizedPath;

use super::SchemaLocator;
use crate::Result;
use crate::load::LoadOutcome;

/// What the registry knows about one object key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaLookup {
    /// Schema export found and parsed. The set may be empty if the export
    /// declares no named properties.
    Found {
        path: NormalizedPath,
        properties: BTreeSet<String>,
    },
    /// No schema export resolves for the key
    NotFound,
    /// A schema export resolved but could not be read or parsed
    Unreadable { path: NormalizedPath, message: String },
}

impl SchemaLookup {
    /// Declared property names; empty for anything but a parsed schema.
    pub fn properties(&self) -> BTreeSet<String> {
        match self {
            Self::Found { properties, .. } => properties.clone(),
            _ => BTreeSet::new(),
        }
    }
}

/// Collect property names from both export shapes: a top-level
/// `properties` list and a nested `schema.results` list. Entries without a
/// string `name` are ignored.
pub fn parse_property_names(document: &Value) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let lists = [
        document.get("properties"),
        document.get("schema").and_then(|s| s.get("results")),
    ];
    for list in lists.into_iter().flatten() {
        let Some(items) = list.as_array() else {
            continue;
        };
        for item in items {
            if let Some(name) = item.get("name").and_then(Value::as_str).filter(|n| !n.is_empty()) {
                names.insert(name.to_string());
            }
        }
    }
    names
}

/// Resolves object keys to property sets, memoizing both the resolved path
/// and the parsed result for the lifetime of one run.
///
/// Misses are cached too: an unknown key scans the schema directory once,
/// however many mapping files reference it.
#[derive(Debug)]
pub struct SchemaRegistry {
    locator: SchemaLocator,
    paths: HashMap<String, Option<NormalizedPath>>,
    lookups: HashMap<String, SchemaLookup>,
}

impl SchemaRegistry {
    pub fn new(locator: SchemaLocator) -> Self {
        Self {
            locator,
            paths: HashMap::new(),
            lookups: HashMap::new(),
        }
    }

    /// Resolve the schema file for `key`, consulting the path cache first.
    pub fn resolve_path(&mut self, key: &str) -> Result<Option<NormalizedPath>> {
        let key = key.to_lowercase();
        if let Some(cached) = self.paths.get(&key) {
            return Ok(cached.clone());
        }
        let resolved = self.locator.locate(&key)?;
        self.paths.insert(key, resolved.clone());
        Ok(resolved)
    }

    /// Look up `key`, loading and parsing its schema on first use.
    pub fn lookup(&mut self, key: &str) -> Result<&SchemaLookup> {
        let key = key.to_lowercase();
        if !self.lookups.contains_key(&key) {
            let lookup = match self.resolve_path(&key)? {
                None => SchemaLookup::NotFound,
                Some(path) => {
                    let result = trace_fs::read_json::<Value>(&path);
                    match LoadOutcome::from_result(path, result) {
                        LoadOutcome::Loaded { path, value } => SchemaLookup::Found {
                            path,
                            properties: parse_property_names(&value),
                        },
                        LoadOutcome::Failed { path, message } => {
                            SchemaLookup::Unreadable { path, message }
                        }
                    }
                }
            };
            tracing::debug!(key = %key, ?lookup, "Cached schema lookup");
            self.lookups.insert(key.clone(), lookup);
        }
        Ok(&self.lookups[&key])
    }

    /// Property set for `key`; empty when no schema is available.
    pub fn properties(&mut self, key: &str) -> Result<BTreeSet<String>> {
        Ok(self.lookup(key)?.properties())
    }

    /// Number of object keys with a cached lookup.
    pub fn cached_len(&self) -> usize {
        self.lookups.len()
    }
}
