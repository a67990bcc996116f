//! Executes scheduled steps

use std::path::{Path, PathBuf};

use colored::Colorize;
use log::error;
use stackup_core::{Action, Config, Resolution, StateLocation, Step};
use stackup_state::{ArchiveOutcome, ObjectStore, archive_state, init_backend};

use crate::error::{Error, Result};
use crate::fetch::Fetcher;
use crate::runner::CommandRunner;

pub struct Executor {
    config: Config,
    workdir: PathBuf,
    store: Box<dyn ObjectStore>,
    runner: CommandRunner,
    fetcher: Fetcher,
}

impl Executor {
    pub fn new(resolution: &Resolution, workdir: &Path, store: Box<dyn ObjectStore>) -> Self {
        let env = resolution
            .child_env()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Self {
            config: resolution.config.clone(),
            workdir: workdir.to_path_buf(),
            store,
            runner: CommandRunner::new(workdir, env),
            fetcher: Fetcher::new(workdir),
        }
    }

    /// Run steps in order, stopping at the first failure
    pub async fn run(&self, steps: &[Step]) -> Result<()> {
        for step in steps {
            match step {
                Step::Action(action) => self.perform(action).await?,
                Step::Scoped { body, cleanup } => self.run_scoped(body, cleanup).await?,
            }
        }
        Ok(())
    }

    /// Run `body`, then `cleanup` regardless of the body's outcome
    ///
    /// A cleanup failure is logged; the body's result is returned.
    async fn run_scoped(&self, body: &[Action], cleanup: &Action) -> Result<()> {
        let mut result = Ok(());
        for action in body {
            result = self.perform(action).await;
            if result.is_err() {
                break;
            }
        }

        if let Err(err) = self.perform(cleanup).await {
            error!("{} failed: {}", cleanup, err);
        }

        result
    }

    async fn perform(&self, action: &Action) -> Result<()> {
        println!("{} {}", "==>".cyan().bold(), action);

        match action {
            Action::Fetch(artifact) => {
                self.fetcher
                    .fetch(*artifact, artifact.version(&self.config))
                    .await?;
            }
            Action::WriteBackend => {
                init_backend(self.store.as_ref(), &self.workdir, &self.config).await?;
            }
            Action::ArchiveState => {
                let location = StateLocation::for_config(&self.config);
                let outcome = archive_state(self.store.as_ref(), &self.workdir, &location).await?;
                if let ArchiveOutcome::Uploaded { bucket, key } = outcome {
                    println!("{}", format!("✓ Archived state to s3://{}/{}", bucket, key).green());
                }
            }
            Action::RequireFile(name) => {
                let path = self.workdir.join(name);
                let exists = tokio::fs::try_exists(&path)
                    .await
                    .map_err(|e| Error::filesystem("failed to check", &path, e))?;
                if !exists {
                    return Err(Error::MissingPlan { path });
                }
            }
            Action::Run(invocation) => {
                self.runner.run(std::slice::from_ref(invocation)).await?;
            }
        }
        Ok(())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use stackup_core::config::vars;
    use stackup_core::{Environment, Invocation, resolve};
    use stackup_state::LocalStore;
    use tempfile::{TempDir, tempdir};

    struct Fixture {
        _dir: TempDir,
        workdir: PathBuf,
        store_root: PathBuf,
        executor: Executor,
    }

    fn fixture() -> Fixture {
        let dir = tempdir().unwrap();
        let workdir = dir.path().join("terraform");
        let store_root = dir.path().join("s3");
        std::fs::create_dir_all(&workdir).unwrap();
        std::fs::create_dir_all(&store_root).unwrap();

        let env = Environment::new()
            .with(vars::PROJECT_NAME, "acme")
            .with(vars::ALERT_EMAIL, "a@x.com");
        let resolution = resolve(&env).unwrap();
        let executor = Executor::new(
            &resolution,
            &workdir,
            Box::new(LocalStore::new(&store_root)),
        );

        Fixture {
            _dir: dir,
            workdir,
            store_root,
            executor,
        }
    }

    fn sh(script: &str) -> Action {
        Action::Run(Invocation::new("sh", ["-c", script]))
    }

    #[tokio::test]
    async fn test_write_backend_local_when_bucket_missing() {
        let f = fixture();
        f.executor
            .run(&[Step::Action(Action::WriteBackend)])
            .await
            .unwrap();

        let backend = std::fs::read_to_string(f.workdir.join("backend.tf")).unwrap();
        assert!(backend.contains("backend \"local\""));
        assert!(backend.contains("acme-development-backend.tfstate"));
    }

    #[tokio::test]
    async fn test_missing_plan_still_archives() {
        let f = fixture();
        std::fs::create_dir(f.store_root.join("acme-development-backend")).unwrap();
        std::fs::write(f.workdir.join("acme-development-backend.tfstate"), "{}").unwrap();

        let result = f
            .executor
            .run(&[Step::Scoped {
                body: vec![Action::RequireFile("plan.tfplan".to_string()), sh("touch applied")],
                cleanup: Action::ArchiveState,
            }])
            .await;

        assert!(matches!(result, Err(Error::MissingPlan { .. })));
        assert!(!f.workdir.join("applied").exists());
        assert!(
            f.store_root
                .join("acme-development-backend")
                .join("acme-development-backend.tfstate")
                .exists()
        );
    }

    #[tokio::test]
    async fn test_failed_body_stops_following_steps() {
        let f = fixture();
        let result = f
            .executor
            .run(&[
                Step::Scoped {
                    body: vec![sh("exit 1")],
                    cleanup: Action::ArchiveState,
                },
                Step::Action(sh("touch after")),
            ])
            .await;

        assert!(matches!(result, Err(Error::CommandStatus { .. })));
        assert!(!f.workdir.join("after").exists());
    }

    #[tokio::test]
    async fn test_commands_see_exports() {
        let f = fixture();
        f.executor
            .run(&[Step::Action(sh("printf '%s' \"$TF_VAR_project_name\" > project"))])
            .await
            .unwrap();

        let project = std::fs::read_to_string(f.workdir.join("project")).unwrap();
        assert_eq!(project, "acme");
    }
}
