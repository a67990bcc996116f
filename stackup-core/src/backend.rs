//! Backend - Terraform state backend declarations

use crate::config::Config;

/// File the chosen declaration is written to
pub const BACKEND_FILE: &str = "backend.tf";

/// Where an environment's state lives: a bucket and the state file named after it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateLocation {
    /// `<project>-<env>-backend`
    pub bucket: String,
    /// `<bucket>.tfstate`
    pub state_file: String,
}

impl StateLocation {
    pub fn new(project_name: &str, app_env: &str) -> Self {
        let bucket = format!("{}-{}-backend", project_name, app_env);
        let state_file = format!("{}.tfstate", bucket);
        Self { bucket, state_file }
    }

    pub fn for_config(config: &Config) -> Self {
        Self::new(&config.project_name, &config.app_env)
    }
}

/// Terraform backend block telling the tool where to persist state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendDeclaration {
    Local {
        path: String,
    },
    Remote {
        bucket: String,
        key: String,
        region: String,
    },
}

impl BackendDeclaration {
    pub fn local(location: &StateLocation) -> Self {
        Self::Local {
            path: location.state_file.clone(),
        }
    }

    pub fn remote(location: &StateLocation, region: &str) -> Self {
        Self::Remote {
            bucket: location.bucket.clone(),
            key: location.state_file.clone(),
            region: region.to_string(),
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }

    /// Render the declaration as it is written to `backend.tf`
    pub fn render(&self) -> String {
        match self {
            Self::Local { path } => format!(
                "terraform {{\n\tbackend \"local\" {{\n\t\tpath = \"{}\"\n\t}}\n}}",
                path
            ),
            Self::Remote {
                bucket,
                key,
                region,
            } => format!(
                "terraform {{\n\tbackend \"s3\" {{\n\t\tbucket = \"{}\"\n\t\tkey    = \"{}\"\n\t\tregion = \"{}\"\n\t}}\n}}",
                bucket, key, region
            ),
        }
    }
}
