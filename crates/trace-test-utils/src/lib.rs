//! Shared test utilities for the trace-verify workspace.
//!
//! Dev-dependency only; never published.
//!
//! # Modules
//!
//! - [`phase`]: [`PhaseFixture`] builder for a project with a phase tree and exports

pub mod phase;

pub use phase::PhaseFixture;
