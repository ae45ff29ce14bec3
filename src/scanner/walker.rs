//! Work-list directory walker

use crate::types::FileEntry;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

/// Events emitted while scanning.
#[derive(Debug)]
pub enum ScanEvent {
    /// A directory could not be enumerated; the walk continued without it.
    DirUnreadable {
        path: PathBuf,
        error: std::io::Error,
    },
}

/// Callback for receiving scan events.
///
/// The walker never logs directly; the caller decides what to do with the
/// events, which keeps tests deterministic.
pub type ScanCallback = dyn Fn(&ScanEvent) + Send + Sync;

/// Result of a directory scan.
#[derive(Debug, Default)]
pub struct ScanOutcome {
    /// Discovered regular files, paths relative to the scanned root.
    /// Order is traversal order and carries no meaning.
    pub entries: Vec<FileEntry>,
    /// Directories visited, the root included.
    pub total_dirs: u64,
    /// Directories that could not be read.
    pub unreadable_dirs: u64,
}

/// Enumerate every regular file reachable under `root`.
///
/// The walk uses an explicit work list instead of recursion, so tree depth is
/// not limited by the call stack. Only genuine subdirectories are descended
/// into: symlinks are never followed, which also rules out link cycles.
/// Entries that are neither regular files nor directories (sockets, devices,
/// broken links) are skipped without comment.
///
/// Unreadable directories are reported through `on_event` and the walk
/// continues with its remaining work; partial coverage on partial failure is
/// the contract, not an error. Callers are expected to have validated that
/// `root` itself exists and is a directory.
pub fn scan_directory(root: &Path, on_event: Option<&ScanCallback>) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();
    let mut pending: VecDeque<PathBuf> = VecDeque::new();
    pending.push_back(root.to_path_buf());

    while let Some(dir) = pending.pop_front() {
        outcome.total_dirs += 1;

        let reader = match fs::read_dir(&dir) {
            Ok(reader) => reader,
            Err(error) => {
                outcome.unreadable_dirs += 1;
                emit(on_event, ScanEvent::DirUnreadable { path: dir, error });
                continue;
            }
        };

        for result in reader {
            let entry = match result {
                Ok(entry) => entry,
                Err(error) => {
                    // A partially readable directory: report and keep going.
                    emit(
                        on_event,
                        ScanEvent::DirUnreadable {
                            path: dir.clone(),
                            error,
                        },
                    );
                    continue;
                }
            };

            // DirEntry::file_type does not traverse symlinks, so a link to a
            // directory is neither a file nor a dir here and falls through.
            let file_type = match entry.file_type() {
                Ok(ft) => ft,
                Err(_) => continue, // deleted mid-scan or unstattable
            };

            if file_type.is_dir() {
                pending.push_back(entry.path());
            } else if file_type.is_file() {
                let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                let relative = match entry.path().strip_prefix(root) {
                    Ok(p) => p.to_path_buf(),
                    Err(_) => continue,
                };
                outcome.entries.push(FileEntry::new(relative, size));
            }
            // Sockets, devices, symlinks: not files to classify, not errors.
        }
    }

    outcome
}

fn emit(on_event: Option<&ScanCallback>, event: ScanEvent) {
    if let Some(callback) = on_event {
        callback(&event);
    }
}
