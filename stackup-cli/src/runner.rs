//! Sequential execution of external commands

use std::path::PathBuf;

use colored::Colorize;
use log::debug;
use stackup_core::Invocation;
use tokio::process::Command;

use crate::error::{Error, Result};

/// Runs invocations one after another in a working directory
pub struct CommandRunner {
    workdir: PathBuf,
    env: Vec<(String, String)>,
}

impl CommandRunner {
    /// `env` is layered over the inherited environment of every child
    pub fn new(workdir: impl Into<PathBuf>, env: Vec<(String, String)>) -> Self {
        Self {
            workdir: workdir.into(),
            env,
        }
    }

    /// Run each invocation in order, stopping at the first failure
    ///
    /// Children inherit stdout and stderr.
    pub async fn run(&self, invocations: &[Invocation]) -> Result<()> {
        for invocation in invocations {
            self.run_one(invocation).await?;
        }
        Ok(())
    }

    async fn run_one(&self, invocation: &Invocation) -> Result<()> {
        println!("{} {}", "$".dimmed(), invocation.to_string().bold());
        debug!("Running {} in {}", invocation, self.workdir.display());

        let status = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&self.workdir)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .status()
            .await
            .map_err(|source| Error::Command {
                command: invocation.clone(),
                source,
            })?;

        if !status.success() {
            return Err(Error::CommandStatus {
                command: invocation.clone(),
                status,
            });
        }
        Ok(())
    }
}
