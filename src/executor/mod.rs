//! Concurrent copy executor
//!
//! Fan-out/join over planned copy jobs:
//! - one tokio task per job, gated by an optional semaphore
//! - per-job outcomes flow back over an mpsc results channel
//! - the coordinator accumulates stats and forwards events to a callback

pub mod copy;
pub mod plan;

pub use copy::copy_into_bucket;
pub use plan::{build_plan, CopyJob};

use crate::config::Config;
use crate::types::{FileEntry, ShelveError};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder;
use tokio::sync::{mpsc, Semaphore};

/// Aggregate result of one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    /// Number of planned copy jobs.
    pub total_files: usize,
    /// Jobs that completed successfully.
    pub copied_files: usize,
    /// Jobs that failed; each failure was logged and isolated.
    pub failed_files: usize,
    /// Total bytes written for successful jobs.
    pub bytes_copied: u64,
}

impl BatchStats {
    /// True when every attempted copy succeeded.
    pub fn is_clean(&self) -> bool {
        self.failed_files == 0
    }
}

/// Events emitted while a batch runs.
#[derive(Debug)]
pub enum BatchEvent {
    /// One file landed in its bucket.
    FileCopied {
        source: PathBuf,
        dest: PathBuf,
        bytes: u64,
    },
    /// One file failed; the batch keeps going.
    FileFailed {
        source: PathBuf,
        error: ShelveError,
    },
    /// Every job reached completion.
    Complete { stats: BatchStats },
}

/// Optional callback used to receive batch events.
pub type BatchCallback = dyn Fn(&BatchEvent) + Send + Sync;

/// Outcome of a single job, reported back to the coordinator.
struct FileOutcome {
    job: CopyJob,
    result: Result<u64, ShelveError>,
}

/// Plan destinations for `entries` and copy them all into the target.
///
/// Every job gets exactly one attempt. A failed job is counted and reported
/// through the callback; it never cancels or delays the others. The call
/// returns only after the last job finished, success or not.
///
/// `config.jobs` caps in-flight copies; `0` means one concurrent task per
/// file with no cap.
pub fn run_batch(
    config: &Config,
    entries: &[FileEntry],
    on_event: Option<&BatchCallback>,
) -> Result<BatchStats, ShelveError> {
    let jobs = build_plan(entries, config);

    let runtime = Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(ShelveError::Io)?;

    runtime.block_on(dispatch_all(jobs, config.jobs, on_event))
}

async fn dispatch_all(
    jobs: Vec<CopyJob>,
    max_in_flight: usize,
    on_event: Option<&BatchCallback>,
) -> Result<BatchStats, ShelveError> {
    let mut stats = BatchStats {
        total_files: jobs.len(),
        ..Default::default()
    };

    let limiter = match max_in_flight {
        0 => None,
        n => Some(Arc::new(Semaphore::new(n))),
    };

    let (outcome_tx, mut outcome_rx) = mpsc::channel::<FileOutcome>(jobs.len().max(1));
    let mut handles = Vec::with_capacity(jobs.len());

    for job in jobs {
        let tx = outcome_tx.clone();
        let limiter = limiter.clone();

        handles.push(tokio::spawn(async move {
            // The semaphore is never closed, so acquire only fails if the
            // whole runtime is shutting down; the task just exits then.
            let _permit = match limiter {
                Some(sem) => match sem.acquire_owned().await {
                    Ok(permit) => Some(permit),
                    Err(_) => return,
                },
                None => None,
            };

            let result = copy_into_bucket(&job).await;
            // Receiver outlives all senders; a send can only fail if the
            // coordinator is gone, and then there is nobody to tell.
            let _ = tx.send(FileOutcome { job, result }).await;
        }));
    }

    // The coordinator's loop ends once every task dropped its sender.
    drop(outcome_tx);

    while let Some(outcome) = outcome_rx.recv().await {
        match outcome.result {
            Ok(bytes) => {
                stats.copied_files += 1;
                stats.bytes_copied += bytes;
                emit(
                    on_event,
                    BatchEvent::FileCopied {
                        source: outcome.job.source.clone(),
                        dest: outcome.job.dest(),
                        bytes,
                    },
                );
            }
            Err(error) => {
                stats.failed_files += 1;
                emit(
                    on_event,
                    BatchEvent::FileFailed {
                        source: outcome.job.source.clone(),
                        error,
                    },
                );
            }
        }
    }

    for handle in handles {
        handle
            .await
            .map_err(|e| ShelveError::Io(std::io::Error::other(e)))?;
    }

    emit(
        on_event,
        BatchEvent::Complete {
            stats: stats.clone(),
        },
    );

    Ok(stats)
}

fn emit(on_event: Option<&BatchCallback>, event: BatchEvent) {
    if let Some(callback) = on_event {
        callback(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn config_for(source: &TempDir, target: &TempDir, jobs: usize) -> Config {
        Config {
            source: source.path().to_path_buf(),
            target: target.path().to_path_buf(),
            jobs,
            rename_duplicates: false,
            summary_json: false,
        }
    }

    fn entry(path: &str, size: u64) -> FileEntry {
        FileEntry::new(PathBuf::from(path), size)
    }

    #[test]
    fn test_batch_sorts_files_into_buckets() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        let config = config_for(&src, &dst, 4);

        fs::write(src.path().join("a.txt"), b"alpha").expect("write a");
        fs::write(src.path().join("b.txt"), b"beta").expect("write b");
        fs::write(src.path().join("c"), b"gamma").expect("write c");

        let entries = vec![entry("a.txt", 5), entry("b.txt", 4), entry("c", 5)];
        let stats = run_batch(&config, &entries, None).expect("run batch");

        assert_eq!(stats.total_files, 3);
        assert_eq!(stats.copied_files, 3);
        assert_eq!(stats.failed_files, 0);
        assert_eq!(stats.bytes_copied, 14);
        assert!(stats.is_clean());

        assert_eq!(
            fs::read(dst.path().join("txt/a.txt")).expect("read a"),
            b"alpha"
        );
        assert_eq!(
            fs::read(dst.path().join("txt/b.txt")).expect("read b"),
            b"beta"
        );
        assert_eq!(
            fs::read(dst.path().join("no_extension/c")).expect("read c"),
            b"gamma"
        );
    }

    #[test]
    fn test_no_empty_buckets_are_created() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        let config = config_for(&src, &dst, 4);

        fs::write(src.path().join("only.md"), b"doc").expect("write");
        run_batch(&config, &[entry("only.md", 3)], None).expect("run batch");

        let buckets: Vec<String> = fs::read_dir(dst.path())
            .expect("read target")
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(buckets, vec!["md".to_string()]);
    }

    #[test]
    fn test_empty_batch_completes() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        let config = config_for(&src, &dst, 4);

        let stats = run_batch(&config, &[], None).expect("run batch");
        assert_eq!(stats, BatchStats::default());
    }

    #[test]
    fn test_failure_is_isolated() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        let config = config_for(&src, &dst, 4);

        fs::write(src.path().join("good.txt"), b"good").expect("write good");
        // missing.txt never exists on disk.

        let entries = vec![entry("missing.txt", 1), entry("good.txt", 4)];
        let stats = run_batch(&config, &entries, None).expect("run batch");

        assert_eq!(stats.copied_files, 1);
        assert_eq!(stats.failed_files, 1);
        assert!(!stats.is_clean());
        assert_eq!(
            fs::read(dst.path().join("txt/good.txt")).expect("read good"),
            b"good"
        );
    }

    #[test]
    fn test_events_report_each_outcome() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        let config = config_for(&src, &dst, 2);

        fs::write(src.path().join("ok.txt"), b"ok").expect("write ok");

        let labels: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
        let labels_ref = Arc::clone(&labels);
        let callback = move |event: &BatchEvent| {
            let label = match event {
                BatchEvent::FileCopied { .. } => "copied",
                BatchEvent::FileFailed { .. } => "failed",
                BatchEvent::Complete { .. } => "complete",
            };
            labels_ref.lock().expect("lock labels").push(label.to_string());
        };

        let entries = vec![entry("ok.txt", 2), entry("gone.txt", 1)];
        let stats = run_batch(&config, &entries, Some(&callback)).expect("run batch");
        assert_eq!(stats.copied_files, 1);
        assert_eq!(stats.failed_files, 1);

        let mut snapshot = labels.lock().expect("lock snapshot").clone();
        let complete = snapshot.pop();
        snapshot.sort();
        assert_eq!(complete.as_deref(), Some("complete"));
        assert_eq!(snapshot, vec!["copied".to_string(), "failed".to_string()]);
    }

    #[test]
    fn test_unbounded_and_serial_agree() {
        let src = TempDir::new().expect("create src tempdir");
        let dst_serial = TempDir::new().expect("create serial tempdir");
        let dst_unbounded = TempDir::new().expect("create unbounded tempdir");

        for i in 0..20 {
            fs::write(src.path().join(format!("f{i}.dat")), format!("payload-{i}"))
                .expect("write file");
        }
        let entries: Vec<FileEntry> = (0..20)
            .map(|i| entry(&format!("f{i}.dat"), 9))
            .collect();

        let serial = run_batch(&config_for(&src, &dst_serial, 1), &entries, None)
            .expect("serial batch");
        let unbounded = run_batch(&config_for(&src, &dst_unbounded, 0), &entries, None)
            .expect("unbounded batch");

        assert_eq!(serial.copied_files, 20);
        assert_eq!(unbounded.copied_files, 20);
        for i in 0..20 {
            let name = format!("dat/f{i}.dat");
            assert_eq!(
                fs::read(dst_serial.path().join(&name)).expect("read serial"),
                fs::read(dst_unbounded.path().join(&name)).expect("read unbounded"),
            );
        }
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        let config = config_for(&src, &dst, 4);

        fs::write(src.path().join("a.txt"), b"stable").expect("write");
        let entries = vec![entry("a.txt", 6)];

        let first = run_batch(&config, &entries, None).expect("first run");
        let second = run_batch(&config, &entries, None).expect("second run");

        assert_eq!(first, second);
        assert_eq!(
            fs::read(dst.path().join("txt/a.txt")).expect("read"),
            b"stable"
        );
    }

    #[test]
    fn test_same_name_collision_keeps_one_content() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        let config = config_for(&src, &dst, 0);

        fs::create_dir(src.path().join("one")).expect("create one");
        fs::create_dir(src.path().join("two")).expect("create two");
        fs::write(src.path().join("one/x.log"), b"from-one").expect("write one");
        fs::write(src.path().join("two/x.log"), b"from-two").expect("write two");

        let entries = vec![entry("one/x.log", 8), entry("two/x.log", 8)];
        let stats = run_batch(&config, &entries, None).expect("run batch");
        assert_eq!(stats.copied_files, 2);

        let landed = fs::read(dst.path().join("log/x.log")).expect("read collision");
        assert!(landed == b"from-one" || landed == b"from-two");
    }

    #[test]
    fn test_rename_duplicates_preserves_both() {
        let src = TempDir::new().expect("create src tempdir");
        let dst = TempDir::new().expect("create dst tempdir");
        let mut config = config_for(&src, &dst, 4);
        config.rename_duplicates = true;

        fs::create_dir(src.path().join("one")).expect("create one");
        fs::create_dir(src.path().join("two")).expect("create two");
        fs::write(src.path().join("one/x.log"), b"from-one").expect("write one");
        fs::write(src.path().join("two/x.log"), b"from-two").expect("write two");

        let entries = vec![entry("one/x.log", 8), entry("two/x.log", 8)];
        let stats = run_batch(&config, &entries, None).expect("run batch");
        assert_eq!(stats.copied_files, 2);

        assert_eq!(
            fs::read(dst.path().join("log/x.log")).expect("read first"),
            b"from-one"
        );
        assert_eq!(
            fs::read(dst.path().join("log/two_x.log")).expect("read second"),
            b"from-two"
        );
    }
}
