//! Directory scanning

pub mod walker;

pub use walker::{scan_directory, ScanCallback, ScanEvent, ScanOutcome};
