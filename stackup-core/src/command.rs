//! Command - External tool invocations with fixed argument templates

use std::fmt;

use crate::config::Config;

/// Plan file written by `terraform plan` and consumed by `terraform apply`
pub const PLAN_FILE: &str = "plan.tfplan";

const ANSIBLE_DIR: &str = "../ansible/";
const ANSIBLE_REQUIREMENTS: &str = "../ansible/requirements.yml";
const ANSIBLE_ROLES: &str = "../ansible/roles";

/// A single external program call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn terraform_init() -> Self {
        Self::new("terraform", ["init"])
    }

    pub fn terraform_validate() -> Self {
        Self::new("terraform", ["validate"])
    }

    pub fn terraform_plan() -> Self {
        Self::new("terraform", ["plan", "-out", PLAN_FILE])
    }

    pub fn terraform_apply() -> Self {
        Self::new("terraform", ["apply", "--auto-approve", PLAN_FILE])
    }

    /// Install the ansible roles listed in the requirements file
    pub fn install_roles() -> Self {
        Self::new(
            "ansible-galaxy",
            [
                "install",
                "-r",
                ANSIBLE_REQUIREMENTS,
                "--roles-path",
                ANSIBLE_ROLES,
            ],
        )
    }

    /// Copy the ansible tree into the environment's ansible lambda bucket
    pub fn upload_ansible(config: &Config) -> Self {
        Self::new(
            "aws",
            [
                "s3".to_string(),
                "cp".to_string(),
                "--region".to_string(),
                config.region.clone(),
                "--recursive".to_string(),
                ANSIBLE_DIR.to_string(),
                ansible_destination(config),
            ],
        )
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// `s3://<project>-<env>-ansible-lambda/ansible/`, lower-cased
pub fn ansible_destination(config: &Config) -> String {
    format!(
        "s3://{}-{}-ansible-lambda/ansible/",
        config.project_name, config.app_env
    )
    .to_lowercase()
}
