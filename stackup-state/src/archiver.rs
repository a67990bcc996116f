//! State archival
//!
//! The first apply of an environment runs against the local backend, because
//! the backend bucket is one of the resources it creates. Afterwards the local
//! state file is copied into that bucket so later runs can use the S3 backend.

use std::path::Path;

use log::{info, warn};
use stackup_core::StateLocation;

use crate::selector::bucket_present;
use crate::store::{ObjectStore, StorageError, StorageResult};

/// What archiving did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveOutcome {
    /// No local state file, so the remote backend is already in use
    NoLocalState,
    Uploaded { bucket: String, key: String },
    /// Local state exists but the bucket does not
    BucketMissing,
}

/// Upload the local state file for `location` if both it and its bucket exist
pub async fn archive_state(
    store: &dyn ObjectStore,
    workdir: &Path,
    location: &StateLocation,
) -> StorageResult<ArchiveOutcome> {
    let path = workdir.join(&location.state_file);
    let exists = tokio::fs::try_exists(&path)
        .await
        .map_err(|e| StorageError::io(&path, e))?;
    if !exists {
        info!("No local state at {}, nothing to archive", path.display());
        return Ok(ArchiveOutcome::NoLocalState);
    }

    if !bucket_present(store, &location.bucket).await {
        // TODO: tear down what a failed first apply created, since its state is only local
        warn!(
            "Bucket {} does not exist; local state {} was not archived",
            location.bucket,
            path.display()
        );
        return Ok(ArchiveOutcome::BucketMissing);
    }

    let key = state_key(location);
    store.put_file(&location.bucket, &key, &path).await?;
    info!("Uploaded {} to s3://{}/{}", path.display(), location.bucket, key);

    Ok(ArchiveOutcome::Uploaded {
        bucket: location.bucket.clone(),
        key,
    })
}

/// Object key of the archived state: the file's base name, matching the
/// key the S3 backend declaration points at
fn state_key(location: &StateLocation) -> String {
    location.state_file.clone()
}
