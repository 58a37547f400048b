//! Object schema resolution
//!
//! - [`SchemaLocator`] maps an object key to a schema export file: the known
//!   table first, then a filename scan of the schema directory.
//! - [`SchemaRegistry`] owns one locator plus the per-run cache of resolved
//!   paths and parsed property sets.

mod locator;
mod registry;

pub use locator::{BUILTIN_SCHEMA_FILES, KnownSchemaTable, SchemaLocator, filename_matches};
pub use registry::{SchemaLookup, SchemaRegistry, parse_property_names};
