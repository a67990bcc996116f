//! Stackup State
//!
//! Terraform state backend handling for stackup.
//!
//! # Overview
//!
//! - **ObjectStore**: the two storage calls stackup needs, a bucket-existence
//!   probe and a file upload, implemented for S3 and for a local directory
//! - **Selector**: picks the local or S3 backend declaration depending on
//!   whether the environment's backend bucket exists, and writes `backend.tf`
//! - **Archiver**: after an apply, copies a local state file into the backend
//!   bucket once that bucket exists
//!
//! # Example
//!
//! ```ignore
//! use stackup_state::{create_store, init_backend, StoreConfig};
//!
//! let store = create_store(&StoreConfig::S3 { region: config.region.clone() }, &env).await;
//! let declaration = init_backend(store.as_ref(), workdir, &config).await?;
//! ```

pub mod archiver;
pub mod selector;
pub mod store;
pub mod stores;

#[cfg(test)]
mod testing;

pub use archiver::{ArchiveOutcome, archive_state};
pub use selector::{init_backend, select_backend};
pub use store::{ObjectStore, StorageError, StorageResult};
pub use stores::{LocalStore, S3Store, StoreConfig, create_store};
