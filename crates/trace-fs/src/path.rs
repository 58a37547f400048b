//! Normalized path handling for cross-platform compatibility

use std::path::{Path, PathBuf};

use serde::Serialize;

/// A path normalized to use forward slashes internally.
///
/// Discrepancy messages embed file paths, so every path that ends up in a
/// report goes through this type to keep the rendered text identical across
/// platforms.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Create a new NormalizedPath from any path-like input.
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let normalized = path_str.replace('\\', "/");
        Self { inner: normalized }
    }

    /// Get the internal normalized string representation.
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Convert to a platform-native PathBuf for I/O operations.
    pub fn to_native(&self) -> PathBuf {
        PathBuf::from(&self.inner)
    }

    /// Join this path with a segment.
    pub fn join(&self, segment: &str) -> Self {
        let segment_normalized = segment.replace('\\', "/");
        let joined = if self.inner.ends_with('/') {
            format!("{}{}", self.inner, segment_normalized)
        } else {
            format!("{}/{}", self.inner, segment_normalized)
        };
        Self { inner: joined }
    }

    /// Get the file name component.
    pub fn file_name(&self) -> Option<&str> {
        let trimmed = self.inner.trim_end_matches('/');
        trimmed.rsplit('/').next().filter(|name| !name.is_empty())
    }

    /// Check if this path exists on the filesystem.
    pub fn exists(&self) -> bool {
        self.to_native().exists()
    }

    /// Check if this is a directory.
    pub fn is_dir(&self) -> bool {
        self.to_native().is_dir()
    }

    /// Check if this is a file.
    pub fn is_file(&self) -> bool {
        self.to_native().is_file()
    }

    /// Whether the path is absolute on either Unix or Windows conventions.
    pub fn is_absolute(&self) -> bool {
        self.inner.starts_with('/')
            || self
                .inner
                .as_bytes()
                .get(1..3)
                .is_some_and(|drive| drive == b":/")
    }

    /// Resolve `self` against `base` unless it is already absolute.
    pub fn resolve_against(&self, base: &NormalizedPath) -> Self {
        if self.is_absolute() {
            self.clone()
        } else {
            base.join(self.inner.trim_start_matches("./"))
        }
    }

    /// Express this path relative to `base`, or return it unchanged when it
    /// does not live under `base`.
    pub fn relative_to(&self, base: &NormalizedPath) -> Self {
        let prefix = base.inner.trim_end_matches('/');
        match self.inner.strip_prefix(prefix) {
            Some(rest) if rest.starts_with('/') => Self {
                inner: rest.trim_start_matches('/').to_string(),
            },
            _ => self.clone(),
        }
    }
}

impl AsRef<Path> for NormalizedPath {
    fn as_ref(&self) -> &Path {
        Path::new(&self.inner)
    }
}

impl std::fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}
