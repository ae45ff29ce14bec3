//! Destination planning
//!
//! Turns scanned entries into concrete copy jobs before any I/O happens.
//! Planning is deterministic in entry order, which makes the opt-in duplicate
//! renaming reproducible.

use crate::config::Config;
use crate::types::FileEntry;
use std::collections::HashSet;
use std::path::{Component, PathBuf};

/// One planned copy: absolute source, absolute bucket directory, and the file
/// name to write inside the bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyJob {
    pub source: PathBuf,
    pub bucket_dir: PathBuf,
    pub file_name: String,
}

impl CopyJob {
    /// Full destination path for this job.
    pub fn dest(&self) -> PathBuf {
        self.bucket_dir.join(&self.file_name)
    }
}

/// Assign a destination to every entry.
///
/// By default two entries with the same name and the same bucket race on the
/// destination and the last write wins. With `rename_duplicates` the second
/// and later claimants of a (bucket, name) pair get a prefix derived from
/// their parent path, so nothing is overwritten.
pub fn build_plan(entries: &[FileEntry], config: &Config) -> Vec<CopyJob> {
    let mut claimed: HashSet<PathBuf> = HashSet::new();
    let mut jobs = Vec::with_capacity(entries.len());

    for entry in entries {
        let bucket_dir = config.target.join(entry.bucket_key());
        let mut file_name = entry.file_name();

        if config.rename_duplicates {
            if claimed.contains(&bucket_dir.join(&file_name)) {
                file_name = path_prefixed_name(entry);
            }
            let mut round = 2u32;
            while !claimed.insert(bucket_dir.join(&file_name)) {
                file_name = format!("{}_{}", round, path_prefixed_name(entry));
                round += 1;
            }
        }

        jobs.push(CopyJob {
            source: config.source.join(&entry.path),
            bucket_dir,
            file_name,
        });
    }

    jobs
}

/// Disambiguated name: parent components joined with `_`, then the file name.
/// `sub/logs/x.log` becomes `sub_logs_x.log`.
fn path_prefixed_name(entry: &FileEntry) -> String {
    let mut parts: Vec<String> = entry
        .path
        .parent()
        .into_iter()
        .flat_map(|p| p.components())
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    parts.push(entry.file_name());
    parts.join("_")
}
