//! Object store implementations

mod local;
mod s3;

pub use local::LocalStore;
pub use s3::S3Store;

use std::path::PathBuf;

use stackup_core::Environment;

use crate::store::ObjectStore;

/// Which store to talk to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    S3 { region: String },
    Local { root: PathBuf },
}

/// Create a store from configuration
///
/// `env` is the layered environment; only the S3 store reads it.
pub async fn create_store(config: &StoreConfig, env: &Environment) -> Box<dyn ObjectStore> {
    match config {
        StoreConfig::S3 { region } => Box::new(S3Store::connect(region, env).await),
        StoreConfig::Local { root } => Box::new(LocalStore::new(root.clone())),
    }
}
