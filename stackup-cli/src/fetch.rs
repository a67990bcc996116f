//! Release artifact downloads

use std::path::{Path, PathBuf};

use log::info;
use stackup_core::Artifact;
use stackup_core::artifact::RELEASE_DIR;
use tokio::io::AsyncWriteExt;

use crate::error::{Error, Result};

/// Downloads artifacts into `<workdir>/release`
pub struct Fetcher {
    client: reqwest::Client,
    workdir: PathBuf,
}

impl Fetcher {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            client: reqwest::Client::new(),
            workdir: workdir.into(),
        }
    }

    /// Download `artifact` at `version`, returning the saved file's path
    pub async fn fetch(&self, artifact: Artifact, version: &str) -> Result<PathBuf> {
        let path = self.release_path(artifact.file_name()).await?;
        let url = artifact.url(version);

        let bytes = self.download(&url, &path).await?;
        info!("Saved {} ({} bytes) to {}", url, bytes, path.display());
        Ok(path)
    }

    /// Ensure the release directory exists and return the path for `file_name` in it
    async fn release_path(&self, file_name: &str) -> Result<PathBuf> {
        let dir = self.workdir.join(RELEASE_DIR);
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| Error::filesystem("failed to create release directory", &dir, e))?;
        Ok(dir.join(file_name))
    }

    /// Stream the body of `url` into `path`
    ///
    /// A failure part way through leaves a truncated file behind.
    pub async fn download(&self, url: &str, path: &Path) -> Result<u64> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::network(url, e))?;

        let mut file = tokio::fs::File::create(path)
            .await
            .map_err(|e| Error::filesystem("failed to open", path, e))?;

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(|e| Error::network(url, e))? {
            file.write_all(&chunk)
                .await
                .map_err(|e| Error::filesystem("failed to write", path, e))?;
            written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|e| Error::filesystem("failed to write", path, e))?;

        Ok(written)
    }
}
