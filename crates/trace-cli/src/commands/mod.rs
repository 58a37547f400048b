//! Command implementations

mod phases;
mod verify;

pub use phases::run_phases;
pub use verify::{overrides_from_args, run_verify};
