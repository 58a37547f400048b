//! Discovery of declaration files and export listings
//!
//! Both helpers return paths in sorted order. Everything downstream renders
//! discrepancies in discovery order, so the order must not depend on how the
//! operating system happens to enumerate a directory.

use std::fs;
use std::path::Path;

use crate::{Error, NormalizedPath, Result};

/// Recursively find files beneath `root` whose trailing path segments equal
/// `suffix`, e.g. `["assets", "asset-inventory.json"]`.
///
/// A missing `root` yields an empty list. Symlinked directories are not
/// followed.
pub fn find_files_ending_with(root: &NormalizedPath, suffix: &[&str]) -> Result<Vec<NormalizedPath>> {
    let mut found = Vec::new();
    if !root.is_dir() || suffix.is_empty() {
        return Ok(found);
    }

    fn recurse(dir: &Path, suffix: &[&str], out: &mut Vec<NormalizedPath>) -> Result<()> {
        for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
            let entry = entry.map_err(|e| Error::io(dir, e))?;
            let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
            let path = entry.path();
            if file_type.is_dir() {
                recurse(&path, suffix, out)?;
            } else if path.is_file() && ends_with_segments(&path, suffix) {
                out.push(NormalizedPath::new(&path));
            }
        }
        Ok(())
    }

    recurse(&root.to_native(), suffix, &mut found)?;
    found.sort();
    tracing::debug!(root = %root, ?suffix, count = found.len(), "Discovered files");
    Ok(found)
}

/// List the files directly inside `dir` with the given extension
/// (case-insensitive), sorted by path. A missing directory yields an empty
/// list.
pub fn list_files_with_extension(dir: &NormalizedPath, extension: &str) -> Result<Vec<NormalizedPath>> {
    let mut found = Vec::new();
    if !dir.is_dir() {
        return Ok(found);
    }

    let native = dir.to_native();
    for entry in fs::read_dir(&native).map_err(|e| Error::io(&native, e))? {
        let entry = entry.map_err(|e| Error::io(&native, e))?;
        let path = entry.path();
        let matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(extension));
        if matches && path.is_file() {
            found.push(NormalizedPath::new(&path));
        }
    }
    found.sort();
    Ok(found)
}

fn ends_with_segments(path: &Path, suffix: &[&str]) -> bool {
    let components: Vec<_> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect();
    components.len() >= suffix.len()
        && components[components.len() - suffix.len()..]
            .iter()
            .zip(suffix)
            .all(|(component, expected)| component.as_ref() == *expected)
}
