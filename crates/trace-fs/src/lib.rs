//! Filesystem layer for the trace verifier
//!
//! Provides normalized path handling, JSON export loading, discovery of
//! declaration files beneath a phase directory, and atomic report writes.

pub mod discover;
pub mod error;
pub mod io;
pub mod path;

pub use discover::{find_files_ending_with, list_files_with_extension};
pub use error::{Error, Result};
pub use io::{read_json, read_text, read_text_lossy, write_atomic};
pub use path::NormalizedPath;
