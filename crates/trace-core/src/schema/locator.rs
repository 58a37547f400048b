//! Ordered schema file resolution

use std::collections::BTreeMap;

use trace_fs::NormalizedPath;

use crate::Result;

/// Core objects whose export file names do not follow a predictable pattern
pub const BUILTIN_SCHEMA_FILES: [(&str, &str); 9] = [
    ("deal", "deals_schema.json"),
    ("deals", "deals_schema.json"),
    ("company", "companies_schema.json"),
    ("contact", "contacts_schema.json"),
    ("contacts", "contacts_schema.json"),
    ("hj_projects", "hj_projects-schema-2-26103074.json"),
    ("hj_consultants", "hj_consultants-schema-2-26103040.json"),
    ("hj_wells", "hj_wells-schema-2-26102958.json"),
    ("hj_approvals", "hj_approvals-schema-2-26103010.json"),
];

/// Explicit object key to schema file name table. Keys are case-folded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnownSchemaTable {
    entries: BTreeMap<String, String>,
}

impl Default for KnownSchemaTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl KnownSchemaTable {
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn builtin() -> Self {
        let mut table = Self::empty();
        table.extend(
            BUILTIN_SCHEMA_FILES
                .iter()
                .map(|(key, file)| (key.to_string(), file.to_string())),
        );
        table
    }

    /// Add or replace entries.
    pub fn extend(&mut self, entries: impl IntoIterator<Item = (String, String)>) {
        for (key, file) in entries {
            self.entries.insert(key.to_lowercase(), file);
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&key.to_lowercase()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether a (lowercased) schema file name belongs to `key`: it contains the
/// key, the key with `_schema`, or the key without a trailing plural `s`.
pub fn filename_matches(file_name: &str, key: &str) -> bool {
    let singular = key.strip_suffix('s').unwrap_or(key);
    file_name.contains(key)
        || file_name.contains(&format!("{key}_schema"))
        || (!singular.is_empty() && file_name.contains(singular))
}

/// Resolves object keys to schema export files.
#[derive(Debug, Clone)]
pub struct SchemaLocator {
    schema_dir: NormalizedPath,
    known: KnownSchemaTable,
}

impl SchemaLocator {
    pub fn new(schema_dir: NormalizedPath, known: KnownSchemaTable) -> Self {
        Self { schema_dir, known }
    }

    /// Step one: the known table. `Some` means the key is in the table,
    /// whether or not the file exists.
    pub fn from_known_table(&self, key: &str) -> Option<NormalizedPath> {
        self.known.get(key).map(|file| self.schema_dir.join(file))
    }

    /// Step two: first `*.json` file in the schema directory, by sorted name,
    /// whose name matches the key.
    pub fn scan(&self, key: &str) -> Result<Option<NormalizedPath>> {
        let key = key.to_lowercase();
        if key.is_empty() {
            return Ok(None);
        }
        let files = trace_fs::list_files_with_extension(&self.schema_dir, "json")?;
        Ok(files.into_iter().find(|path| {
            path.file_name()
                .is_some_and(|name| filename_matches(&name.to_lowercase(), &key))
        }))
    }

    /// Resolve `key` to an existing schema file.
    ///
    /// A key listed in the known table never falls back to the scan; if its
    /// file is absent the object has no schema.
    pub fn locate(&self, key: &str) -> Result<Option<NormalizedPath>> {
        if let Some(path) = self.from_known_table(key) {
            tracing::debug!(key, path = %path, "Schema from known table");
            return Ok(path.is_file().then_some(path));
        }
        let found = self.scan(key)?;
        tracing::debug!(key, found = ?found.as_ref().map(NormalizedPath::as_str), "Schema from directory scan");
        Ok(found)
    }
}
