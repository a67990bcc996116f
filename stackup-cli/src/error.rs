//! Error type for running targets

use std::path::PathBuf;
use std::process::ExitStatus;

use stackup_core::{ConfigError, Invocation};
use stackup_state::StorageError;
use thiserror::Error;

/// Exit status reserved for configuration failures (sysexits `EX_CONFIG`)
pub const EXIT_BAD_CONFIG: i32 = 78;
/// Exit status for every other failure
pub const EXIT_FAILURE: i32 = 1;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to resolve configuration: {0}")]
    Config(#[from] ConfigError),

    /// The program could not be started
    #[error("failed when executing: {command}: {source}")]
    Command {
        command: Invocation,
        #[source]
        source: std::io::Error,
    },

    #[error("failed when executing: {command}: {status}")]
    CommandStatus {
        command: Invocation,
        status: ExitStatus,
    },

    #[error("failed to download {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{action} {}: {source}", .path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to locate the terraform plan at {}", .path.display())]
    MissingPlan { path: PathBuf },
}

impl Error {
    pub fn filesystem(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }

    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => EXIT_BAD_CONFIG,
            _ => EXIT_FAILURE,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
