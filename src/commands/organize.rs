//! Main organize command

use crate::executor::{run_batch, BatchCallback, BatchEvent, BatchStats};
use crate::scanner::{scan_directory, ScanCallback, ScanEvent};
use crate::types::ShelveError;
use crate::Config;
use std::fs;
use tracing::{error, info, warn};

/// Run the organize operation: validate, scan, then copy everything.
///
/// Per-file failures are logged and counted but never abort the batch; the
/// returned stats tell the caller whether the run was clean. The only hard
/// error before the batch is an invalid source, raised before the target
/// directory is created.
pub fn run(config: &Config) -> Result<BatchStats, ShelveError> {
    config.validate()?;

    fs::create_dir_all(&config.target)?;

    let scan_events: &ScanCallback = &|event: &ScanEvent| {
        let ScanEvent::DirUnreadable { path, error } = event;
        warn!(path = %path.display(), %error, "skipping unreadable directory");
    };
    let scan = scan_directory(&config.source, Some(scan_events));

    info!(
        files = scan.entries.len(),
        dirs = scan.total_dirs,
        unreadable_dirs = scan.unreadable_dirs,
        "scan finished"
    );

    let batch_events: &BatchCallback = &|event: &BatchEvent| match event {
        BatchEvent::FileCopied { source, dest, bytes } => {
            info!(source = %source.display(), dest = %dest.display(), bytes, "copied");
        }
        BatchEvent::FileFailed { source, error } => {
            error!(source = %source.display(), %error, "copy failed");
        }
        BatchEvent::Complete { stats } => {
            info!(
                copied = stats.copied_files,
                failed = stats.failed_files,
                bytes = stats.bytes_copied,
                "batch finished"
            );
        }
    };

    run_batch(config, &scan.entries, Some(batch_events))
}
