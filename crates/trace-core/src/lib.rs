//! Reconciliation engine for phase documentation
//!
//! Given a human-written phase trace and a set of machine exports, this crate
//! verifies that what the documentation claims actually exists:
//!
//! - **Reference extraction**: workflow identifiers mentioned in the trace
//! - **Workflow resolution**: each identifier has an exported definition file
//! - **Asset reconciliation**: declared CMS modules and forms exist in the exports
//! - **Schema registry**: object key to authoritative property set, cached per run
//! - **Property validation**: declared properties exist in their object's schema
//! - **Reporting**: one deterministic Markdown log plus a pass/fail outcome
//!
//! # Architecture
//!
//! ```text
//!                  trace-cli
//!                      |
//!                  Verifier
//!                      |
//!   +------------+-----+--------+-----------------+
//!   |            |              |                 |
//! extract   workflows        assets    properties -> schema
//!   |            |              |                 |
//!   +------------+----- report -+-----------------+
//!                      |
//!                  trace-fs
//! ```

pub mod assets;
pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod load;
pub mod properties;
pub mod report;
pub mod schema;
pub mod workflows;

pub use assets::{AssetInventory, AssetReconciler, NamedAsset, load_inventories};
pub use config::{ConfigResolver, ExportPaths, ProjectManifest, RunConfig, RunOverrides};
pub use engine::{RunSummary, TraceDocument, Verifier};
pub use error::{Error, Result};
pub use extract::ReferenceExtractor;
pub use load::LoadOutcome;
pub use properties::{PropertyMapping, PropertyValidator, load_mappings};
pub use report::{Discrepancy, DiscrepancyKind, Outcome, VerificationReport};
pub use schema::{KnownSchemaTable, SchemaLocator, SchemaLookup, SchemaRegistry};
pub use workflows::{WorkflowExportRecord, WorkflowResolver};
