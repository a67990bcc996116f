//! Backend selection
//!
//! Terraform keeps its state locally until the environment's backend bucket
//! exists; from then on the S3 backend is declared instead.

use std::path::Path;

use log::{info, warn};
use stackup_core::backend::BACKEND_FILE;
use stackup_core::{BackendDeclaration, Config, StateLocation};

use crate::store::{ObjectStore, StorageError, StorageResult};

/// Probe the state bucket, treating any probe failure as "does not exist"
pub async fn bucket_present(store: &dyn ObjectStore, bucket: &str) -> bool {
    match store.bucket_exists(bucket).await {
        Ok(exists) => exists,
        Err(err) => {
            warn!("{}; assuming the bucket does not exist", err);
            false
        }
    }
}

/// Choose the backend declaration for a state location
pub async fn select_backend(
    store: &dyn ObjectStore,
    location: &StateLocation,
    region: &str,
) -> BackendDeclaration {
    if bucket_present(store, &location.bucket).await {
        BackendDeclaration::remote(location, region)
    } else {
        BackendDeclaration::local(location)
    }
}

/// Select the backend for `config` and write it to `backend.tf` in `workdir`
pub async fn init_backend(
    store: &dyn ObjectStore,
    workdir: &Path,
    config: &Config,
) -> StorageResult<BackendDeclaration> {
    let location = StateLocation::for_config(config);
    let declaration = select_backend(store, &location, &config.region).await;

    let path = workdir.join(BACKEND_FILE);
    tokio::fs::write(&path, declaration.render())
        .await
        .map_err(|e| StorageError::io(&path, e))?;

    match &declaration {
        BackendDeclaration::Remote { bucket, .. } => {
            info!("Wrote {} using the s3 backend in {}", path.display(), bucket)
        }
        BackendDeclaration::Local { path: state } => {
            info!("Wrote {} using the local backend at {}", path.display(), state)
        }
    }

    Ok(declaration)
}
