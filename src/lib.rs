//! # shelve - sort files into per-extension buckets
//!
//! Scans a source tree for regular files, classifies each by its filename
//! suffix, and copies it into `target/<extension>/` concurrently. Files
//! without a suffix land in `target/no_extension/`.

// Module declarations
pub mod commands;
pub mod config;
pub mod executor;
pub mod scanner;
pub mod types;

// Re-export commonly used types
pub use config::Config;
pub use executor::BatchStats;
pub use types::{FileEntry, ShelveError, NO_EXTENSION_BUCKET};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
