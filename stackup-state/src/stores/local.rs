//! Local directory store
//!
//! Buckets are subdirectories of a root directory and objects are files inside
//! them. Useful for exercising backend selection and archival offline.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::store::{ObjectStore, StorageError, StorageResult};

/// Directory-backed object store
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path an object is stored at
    pub fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.root.join(bucket).join(key.trim_start_matches('/'))
    }

    /// Create a bucket directory
    pub async fn create_bucket(&self, bucket: &str) -> StorageResult<()> {
        let path = self.root.join(bucket);
        tokio::fs::create_dir_all(&path)
            .await
            .map_err(|e| StorageError::io(path, e))
    }
}

#[async_trait]
impl ObjectStore for LocalStore {
    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool> {
        match tokio::fs::metadata(self.root.join(bucket)).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::probe(bucket, e)),
        }
    }

    async fn put_file(&self, bucket: &str, key: &str, path: &Path) -> StorageResult<()> {
        if !self.bucket_exists(bucket).await? {
            return Err(StorageError::upload(bucket, key, "bucket does not exist"));
        }

        let dest = self.object_path(bucket, key);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::io(parent, e))?;
        }
        tokio::fs::copy(path, &dest)
            .await
            .map_err(|e| StorageError::io(path, e))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_bucket_exists() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path());

        assert!(!store.bucket_exists("acme-development-backend").await.unwrap());
        store.create_bucket("acme-development-backend").await.unwrap();
        assert!(store.bucket_exists("acme-development-backend").await.unwrap());
    }

    #[tokio::test]
    async fn test_plain_file_is_not_a_bucket() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("bucket"), "x").unwrap();
        let store = LocalStore::new(dir.path());
        assert!(!store.bucket_exists("bucket").await.unwrap());
    }

    #[tokio::test]
    async fn test_put_file() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path().join("store"));
        store.create_bucket("b").await.unwrap();

        let src = dir.path().join("state.tfstate");
        std::fs::write(&src, "{\"version\": 4}").unwrap();

        store.put_file("b", "nested/state.tfstate", &src).await.unwrap();
        let stored = std::fs::read_to_string(store.object_path("b", "nested/state.tfstate")).unwrap();
        assert_eq!(stored, "{\"version\": 4}");
    }

    #[tokio::test]
    async fn test_put_file_missing_bucket() {
        let dir = tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let src = dir.path().join("state.tfstate");
        std::fs::write(&src, "{}").unwrap();

        let result = store.put_file("missing", "state.tfstate", &src).await;
        assert!(matches!(result, Err(StorageError::Upload { .. })));
    }
}
