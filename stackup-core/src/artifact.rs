//! Artifact - Versioned Lambda release archives fetched before `terraform init`

use std::fmt;
use std::str::FromStr;

use crate::config::Config;

/// Directory (relative to the working directory) holding downloaded archives
pub const RELEASE_DIR: &str = "release";

/// A prebuilt deployment package published as a release asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    Inventory,
    AnsibleLambda,
    RotateKeyPair,
    Network,
    Secrets,
}

impl Artifact {
    /// All artifacts, in the order `init` fetches them
    pub const ALL: [Artifact; 5] = [
        Artifact::Inventory,
        Artifact::AnsibleLambda,
        Artifact::RotateKeyPair,
        Artifact::Network,
        Artifact::Secrets,
    ];

    /// Name used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Artifact::Inventory => "inventory",
            Artifact::AnsibleLambda => "ansible",
            Artifact::RotateKeyPair => "rotate-keypair",
            Artifact::Network => "network",
            Artifact::Secrets => "secrets",
        }
    }

    /// File name under the release directory
    pub fn file_name(&self) -> &'static str {
        match self {
            Artifact::Inventory => "grace-inventory-lambda.zip",
            Artifact::AnsibleLambda => "grace-ansible-lambda.zip",
            Artifact::RotateKeyPair => "grace-ansible-rotate-keypair.zip",
            Artifact::Network => "grace-paas-associate-zone.zip",
            Artifact::Secrets => "grace-secrets-sync-lambda.zip",
        }
    }

    /// Download URL template; `{version}` is replaced by the release tag
    pub fn url_template(&self) -> &'static str {
        match self {
            Artifact::Inventory => {
                "https://github.com/GSA/grace-inventory/releases/download/{version}/grace-inventory-lambda.zip"
            }
            Artifact::AnsibleLambda => {
                "https://github.com/GSA/grace-ansible-lambda/releases/download/{version}/grace-ansible-lambda.zip"
            }
            Artifact::RotateKeyPair => {
                "https://github.com/GSA/grace-ansible-lambda/releases/download/{version}/grace-ansible-rotate-keypair.zip"
            }
            Artifact::Network => {
                "https://github.com/GSA/grace-paas-network/releases/download/{version}/grace-paas-associate-zone.zip"
            }
            Artifact::Secrets => {
                "https://github.com/GSA/grace-secrets-sync-lambda/releases/download/{version}/grace-secrets-sync-lambda.zip"
            }
        }
    }

    /// The configured release tag for this artifact
    ///
    /// The rotate-keypair archive ships with the ansible lambda release.
    pub fn version<'a>(&self, config: &'a Config) -> &'a str {
        match self {
            Artifact::Inventory => &config.inventory_version,
            Artifact::AnsibleLambda | Artifact::RotateKeyPair => &config.ansible_version,
            Artifact::Network => &config.network_version,
            Artifact::Secrets => &config.secrets_version,
        }
    }

    pub fn url(&self, version: &str) -> String {
        self.url_template().replace("{version}", version)
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Artifact {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Artifact::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| {
                let names: Vec<_> = Artifact::ALL.iter().map(Artifact::name).collect();
                format!("unknown artifact '{}' (expected one of: {})", s, names.join(", "))
            })
    }
}
