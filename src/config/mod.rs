//! Configuration management

use crate::types::ShelveError;
use clap::Parser;
use std::path::PathBuf;

/// Default cap on in-flight copies. I/O bound work, so comfortably above the
/// core count; `--jobs 0` removes the cap entirely.
pub const DEFAULT_JOBS: usize = 32;

/// Sort files from a source tree into per-extension buckets under a target
/// directory.
#[derive(Debug, Parser)]
#[command(name = "shelve", version, about)]
pub struct Cli {
    /// Source directory to scan recursively
    #[arg(short, long)]
    pub source: PathBuf,

    /// Target directory; one subdirectory per extension is created in it
    #[arg(short, long)]
    pub target: PathBuf,

    /// Maximum concurrent copies (0 = one task per file, uncapped)
    #[arg(short, long, default_value_t = DEFAULT_JOBS)]
    pub jobs: usize,

    /// Rename later same-named files instead of overwriting the first copy
    #[arg(long)]
    pub rename_duplicates: bool,

    /// Print the final summary as JSON on stdout
    #[arg(long)]
    pub summary_json: bool,
}

/// Global configuration for a shelve run
#[derive(Debug, Clone)]
pub struct Config {
    /// Source directory
    pub source: PathBuf,

    /// Target directory
    pub target: PathBuf,

    /// Concurrency cap for the executor (0 = unbounded)
    pub jobs: usize,

    /// Disambiguate duplicate (bucket, name) pairs instead of last-writer-wins
    pub rename_duplicates: bool,

    /// Emit the summary as JSON
    pub summary_json: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            source: cli.source,
            target: cli.target,
            jobs: cli.jobs,
            rename_duplicates: cli.rename_duplicates,
            summary_json: cli.summary_json,
        }
    }
}

impl Config {
    /// Validate the source before any work happens.
    ///
    /// Runs before the target directory is created, so an invalid source
    /// leaves the filesystem untouched.
    pub fn validate(&self) -> Result<(), ShelveError> {
        if !self.source.exists() {
            return Err(ShelveError::Source(format!(
                "source path does not exist: {}",
                self.source.display()
            )));
        }
        if !self.source.is_dir() {
            return Err(ShelveError::Source(format!(
                "source path is not a directory: {}",
                self.source.display()
            )));
        }
        Ok(())
    }
}
