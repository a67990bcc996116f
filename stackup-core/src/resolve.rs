//! Resolve - Two-pass configuration resolution with environment overrides
//!
//! The first pass only exists to learn the target environment. Its upper-cased
//! name selects overrides (`PRODUCTION_region=eu-west-1` becomes
//! `region=eu-west-1`), which are layered over the snapshot before the record
//! is parsed again from scratch.

use log::info;

use crate::config::Config;
use crate::env::Environment;
use crate::error::{ConfigError, ConfigResult};

/// A variable re-exported under its unprefixed name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvOverride {
    /// Original variable name, including the prefix
    pub source: String,
    /// Name the value is exported under
    pub name: String,
    pub value: String,
}

/// Outcome of resolving an environment snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub config: Config,
    pub overrides: Vec<EnvOverride>,
    pub exports: Vec<(String, String)>,
    layered: Environment,
}

impl Resolution {
    /// Variables to set on child processes: overrides first, then exports
    pub fn child_env(&self) -> impl Iterator<Item = (&str, &str)> {
        self.overrides
            .iter()
            .map(|o| (o.name.as_str(), o.value.as_str()))
            .chain(self.exports.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// The snapshot with overrides and exports applied, as children see it
    pub fn layered_environment(&self) -> &Environment {
        &self.layered
    }
}

/// Resolve the configuration record from an environment snapshot
pub fn resolve(env: &Environment) -> ConfigResult<Resolution> {
    let first = Config::from_env(env)?;

    let overrides = collect_overrides(env, &first.override_prefix())?;
    let mut layered = env.clone();
    for o in &overrides {
        log_export(&o.name, &o.value);
        layered.set(o.name.clone(), o.value.clone());
    }

    let config = Config::from_env(&layered)?;

    let exports: Vec<(String, String)> = config
        .exports()
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    for (name, value) in &exports {
        log_export(name, value);
        layered.set(name.clone(), value.clone());
    }

    Ok(Resolution {
        config,
        overrides,
        exports,
        layered,
    })
}

/// Find every variable starting with `prefix` and strip the prefix from its name
pub fn collect_overrides(env: &Environment, prefix: &str) -> ConfigResult<Vec<EnvOverride>> {
    env.iter()
        .filter_map(|(key, value)| key.strip_prefix(prefix).map(|name| (key, name, value)))
        .map(|(key, name, value)| {
            if name.is_empty() {
                return Err(ConfigError::InvalidOverride {
                    key: key.to_string(),
                });
            }
            Ok(EnvOverride {
                source: key.to_string(),
                name: name.to_string(),
                value: value.to_string(),
            })
        })
        .collect()
}

// Values may be secrets; only the length is logged.
fn log_export(name: &str, value: &str) {
    info!(
        "Exported {} environment variable, value length={}",
        name,
        value.len()
    );
}
