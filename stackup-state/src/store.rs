//! Object store trait and error types

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when interacting with an object store
#[derive(Debug, Error)]
pub enum StorageError {
    /// The existence check failed for a reason other than "not found"
    #[error("Failed to probe bucket {bucket}: {message}")]
    Probe { bucket: String, message: String },

    /// Uploading an object failed
    #[error("Failed to upload {key} to bucket {bucket}: {message}")]
    Upload {
        bucket: String,
        key: String,
        message: String,
    },

    /// Local file I/O failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StorageError {
    pub fn probe(bucket: impl Into<String>, message: impl ToString) -> Self {
        Self::Probe {
            bucket: bucket.into(),
            message: message.to_string(),
        }
    }

    pub fn upload(bucket: impl Into<String>, key: impl Into<String>, message: impl ToString) -> Self {
        Self::Upload {
            bucket: bucket.into(),
            key: key.into(),
            message: message.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Remote object storage as used by backend selection and state archival
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Check whether a bucket exists
    ///
    /// Returns `Ok(false)` when the store reports the bucket as missing and an
    /// error for anything it cannot classify.
    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool>;

    /// Upload a local file as `key` in `bucket`
    async fn put_file(&self, bucket: &str, key: &str, path: &Path) -> StorageResult<()>;
}
