//! Error types for shelve

use std::path::PathBuf;
use thiserror::Error;

/// Error types for shelve operations
#[derive(Debug, Error)]
pub enum ShelveError {
    /// Standard IO error (automatically converted via #[from])
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Source path missing or not a directory. The only fatal kind: it aborts
    /// the run before any work starts.
    #[error("Invalid source: {0}")]
    Source(String),

    /// Destination bucket directory could not be created
    #[error("Failed to create bucket {path}: {source}")]
    BucketCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Source read or destination write failed for one file
    #[error("Failed to copy {path}: {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ShelveError {
    /// Check if this error terminates the whole run.
    ///
    /// Everything except an invalid source is recovered per file: logged,
    /// counted, and never allowed to affect other files.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ShelveError::Source(_))
    }
}
