//! Store double recording every call

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::store::{ObjectStore, StorageError, StorageResult};

#[derive(Debug, Clone, Copy)]
pub enum Probe {
    Exists,
    Missing,
    Fails,
}

pub struct RecordingStore {
    probe: Probe,
    pub probes: Mutex<Vec<String>>,
    pub uploads: Mutex<Vec<(String, String, PathBuf)>>,
}

impl RecordingStore {
    pub fn new(probe: Probe) -> Self {
        Self {
            probe,
            probes: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.probes.lock().unwrap().len() + self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn bucket_exists(&self, bucket: &str) -> StorageResult<bool> {
        self.probes.lock().unwrap().push(bucket.to_string());
        match self.probe {
            Probe::Exists => Ok(true),
            Probe::Missing => Ok(false),
            Probe::Fails => Err(StorageError::probe(bucket, "403 Forbidden")),
        }
    }

    async fn put_file(&self, bucket: &str, key: &str, path: &Path) -> StorageResult<()> {
        self.uploads
            .lock()
            .unwrap()
            .push((bucket.to_string(), key.to_string(), path.to_path_buf()));
        Ok(())
    }
}
