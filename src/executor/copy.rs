//! Single-file copy into an extension bucket

use crate::executor::CopyJob;
use crate::types::ShelveError;
use tokio::fs;

/// Copy one file into its bucket, creating the bucket first.
///
/// Bucket creation is idempotent: `create_dir_all` treats an existing
/// directory as success, so concurrent jobs targeting the same bucket may all
/// issue the call without coordination. The content is read whole and written
/// whole; an existing destination file is overwritten without warning.
///
/// Returns the number of bytes copied.
pub async fn copy_into_bucket(job: &CopyJob) -> Result<u64, ShelveError> {
    fs::create_dir_all(&job.bucket_dir)
        .await
        .map_err(|source| ShelveError::BucketCreate {
            path: job.bucket_dir.clone(),
            source,
        })?;

    let content = fs::read(&job.source)
        .await
        .map_err(|source| ShelveError::Copy {
            path: job.source.clone(),
            source,
        })?;

    let dest = job.dest();
    fs::write(&dest, &content)
        .await
        .map_err(|source| ShelveError::Copy {
            path: dest,
            source,
        })?;

    Ok(content.len() as u64)
}
