//! Core types for shelve

pub mod entry;
pub mod error;

pub use entry::{FileEntry, NO_EXTENSION_BUCKET};
pub use error::ShelveError;
