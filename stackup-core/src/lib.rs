//! Stackup Core
//!
//! Pure logic behind the stackup build entrypoint: resolving the layered
//! deployment configuration from an environment snapshot, describing the
//! release artifacts and external commands, rendering Terraform backend
//! declarations, and expanding build targets into an ordered step list.

pub mod artifact;
pub mod backend;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
pub mod resolve;
pub mod target;

pub use artifact::Artifact;
pub use backend::{BackendDeclaration, StateLocation};
pub use command::Invocation;
pub use config::Config;
pub use env::Environment;
pub use error::{ConfigError, ConfigResult};
pub use resolve::{EnvOverride, Resolution, resolve};
pub use target::{Action, Step, Target, schedule};
