//! Configuration error types

use thiserror::Error;

/// Errors raised while resolving the configuration record
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is unset or empty
    #[error("required environment variable \"{name}\" is not set")]
    MissingVariable { name: String },

    /// An override variable has nothing after its prefix
    #[error("environment variable \"{key}\" has an empty name after its override prefix")]
    InvalidOverride { key: String },
}

impl ConfigError {
    pub fn missing(name: impl Into<String>) -> Self {
        Self::MissingVariable { name: name.into() }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
