//! FileEntry - a regular file discovered under the source root

use std::path::{Path, PathBuf};

/// Bucket name used for files without a usable extension.
pub const NO_EXTENSION_BUCKET: &str = "no_extension";

/// A regular file found by the scanner.
///
/// The path is relative to the scanned root. Entries are produced once by the
/// scanner and consumed exactly once by the executor; they are never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the source root
    pub path: PathBuf,

    /// File size in bytes
    pub size: u64,
}

impl FileEntry {
    pub fn new(path: PathBuf, size: u64) -> Self {
        Self { path, size }
    }

    /// The file name component of the entry.
    pub fn file_name(&self) -> String {
        // Scanner only produces entries with a final component.
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Classify the entry by its filename suffix.
    ///
    /// The key is the substring after the last `.`, lower-cased. Names with no
    /// dot, a trailing dot, or only a leading dot (`.gitignore`) have no
    /// usable suffix and map to [`NO_EXTENSION_BUCKET`].
    pub fn bucket_key(&self) -> String {
        bucket_key_for(&self.path)
    }
}

/// Derive the destination bucket name for a file path.
pub fn bucket_key_for(path: &Path) -> String {
    match path.extension() {
        Some(ext) if !ext.is_empty() => ext.to_string_lossy().to_lowercase(),
        _ => NO_EXTENSION_BUCKET.to_string(),
    }
}
