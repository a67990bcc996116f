//! Config - The deployment configuration record read from the environment

use crate::env::Environment;
use crate::error::{ConfigError, ConfigResult};

/// Variable names read from the environment
pub mod vars {
    pub const PROJECT_NAME: &str = "projectName";
    pub const ALERT_EMAIL: &str = "alertEmail";
    pub const APP_ENV: &str = "CIRCLE_BRANCH";
    pub const REGION: &str = "region";
    pub const SAML_PROVIDER_ARN: &str = "SAML_PROVIDER_ARN";
    pub const SECOPS_ACCOUNTS: &str = "secopsAccounts";
    pub const INVENTORY_VERSION: &str = "inventoryVersion";
    pub const ANSIBLE_VERSION: &str = "ansibleVersion";
    pub const NETWORK_VERSION: &str = "networkVersion";
    pub const SECRETS_VERSION: &str = "secretsVersion";
}

pub const DEFAULT_APP_ENV: &str = "sandbox";
pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_INVENTORY_VERSION: &str = "v0.1.7";
pub const DEFAULT_ANSIBLE_VERSION: &str = "v0.0.28";
pub const DEFAULT_NETWORK_VERSION: &str = "v0.6.10";
pub const DEFAULT_SECRETS_VERSION: &str = "v0.0.3rc";

pub const PRODUCTION: &str = "production";
pub const DEVELOPMENT: &str = "development";

/// Resolved deployment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub project_name: String,
    pub alert_email: String,
    /// Always `production` or `development` once normalized
    pub app_env: String,
    pub region: String,
    pub saml_provider_arn: String,
    pub secops_account_ids: Vec<String>,
    pub inventory_version: String,
    pub ansible_version: String,
    pub network_version: String,
    pub secrets_version: String,
}

impl Config {
    /// Parse a fresh record from an environment snapshot and normalize it
    pub fn from_env(env: &Environment) -> ConfigResult<Self> {
        let required = |name: &str| {
            env.get(name)
                .map(str::to_string)
                .ok_or_else(|| ConfigError::missing(name))
        };

        Ok(Self {
            project_name: required(vars::PROJECT_NAME)?,
            alert_email: required(vars::ALERT_EMAIL)?,
            app_env: normalize_app_env(env.get_or(vars::APP_ENV, DEFAULT_APP_ENV)).to_string(),
            region: env.get_or(vars::REGION, DEFAULT_REGION).to_string(),
            saml_provider_arn: env.get_or(vars::SAML_PROVIDER_ARN, "").to_string(),
            secops_account_ids: split_list(env.get_or(vars::SECOPS_ACCOUNTS, "")),
            inventory_version: env
                .get_or(vars::INVENTORY_VERSION, DEFAULT_INVENTORY_VERSION)
                .to_string(),
            ansible_version: env
                .get_or(vars::ANSIBLE_VERSION, DEFAULT_ANSIBLE_VERSION)
                .to_string(),
            network_version: env
                .get_or(vars::NETWORK_VERSION, DEFAULT_NETWORK_VERSION)
                .to_string(),
            secrets_version: env
                .get_or(vars::SECRETS_VERSION, DEFAULT_SECRETS_VERSION)
                .to_string(),
        })
    }

    /// Prefix selecting environment-specific overrides, e.g. `PRODUCTION_`
    pub fn override_prefix(&self) -> String {
        format!("{}_", self.app_env.to_uppercase())
    }

    pub fn is_production(&self) -> bool {
        self.app_env == PRODUCTION
    }

    /// Variables exported to downstream tools, in a fixed order
    pub fn exports(&self) -> Vec<(&'static str, String)> {
        vec![
            ("TF_VAR_env", self.app_env.clone()),
            ("TF_VAR_email_address", self.alert_email.clone()),
            ("TF_VAR_project_name", self.project_name.clone()),
            ("TF_VAR_region", self.region.clone()),
            ("TF_VAR_secops_accounts", self.secops_account_ids.join(",")),
            ("TF_VAR_saml_provider_arn", self.saml_provider_arn.clone()),
            ("AWS_REGION", self.region.clone()),
        ]
    }
}

/// Anything other than a case-insensitive `production` becomes `development`
pub fn normalize_app_env(value: &str) -> &'static str {
    if value.eq_ignore_ascii_case(PRODUCTION) {
        PRODUCTION
    } else {
        DEVELOPMENT
    }
}

fn split_list(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(',').map(str::to_string).collect()
}
