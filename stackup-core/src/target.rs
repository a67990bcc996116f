//! Target - Build targets and their expansion into an ordered step list
//!
//! Each target declares the targets it depends on and the actions it performs
//! itself. Expanding a set of targets walks dependencies depth-first and runs
//! every target at most once, so `deploy` (plan, apply) only validates once.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use crate::artifact::Artifact;
use crate::command::{Invocation, PLAN_FILE};
use crate::config::Config;

/// A user-invocable build target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Fetch(Artifact),
    Init,
    Validate,
    InitBackend,
    SaveBackend,
    Plan,
    Apply,
    Test,
    Deploy,
    GetRoles,
    UploadAnsible,
}

impl Target {
    pub const DEFAULT: Target = Target::Validate;

    fn dependencies(&self) -> Vec<Target> {
        match self {
            Target::Init => Artifact::ALL.into_iter().map(Target::Fetch).collect(),
            Target::Validate => vec![Target::Init],
            Target::Plan | Target::Apply => vec![Target::InitBackend, Target::Validate],
            Target::Test => vec![Target::Plan],
            Target::Deploy => vec![Target::Plan, Target::Apply],
            Target::UploadAnsible => vec![Target::GetRoles],
            Target::Fetch(_) | Target::InitBackend | Target::SaveBackend | Target::GetRoles => {
                vec![]
            }
        }
    }

    fn steps(&self, config: &Config) -> Vec<Step> {
        match self {
            Target::Fetch(artifact) => vec![Step::Action(Action::Fetch(*artifact))],
            Target::Init => vec![Step::run(Invocation::terraform_init())],
            Target::Validate => vec![Step::run(Invocation::terraform_validate())],
            Target::InitBackend => vec![Step::Action(Action::WriteBackend)],
            Target::SaveBackend => vec![Step::Action(Action::ArchiveState)],
            Target::Plan => vec![Step::run(Invocation::terraform_plan())],
            Target::Apply => vec![Step::Scoped {
                body: vec![
                    Action::RequireFile(PLAN_FILE.to_string()),
                    Action::Run(Invocation::terraform_apply()),
                ],
                cleanup: Action::ArchiveState,
            }],
            Target::Test | Target::Deploy => vec![],
            Target::GetRoles => vec![Step::run(Invocation::install_roles())],
            Target::UploadAnsible => vec![Step::run(Invocation::upload_ansible(config))],
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Fetch(artifact) => write!(f, "fetch-{}", artifact),
            Target::Init => f.write_str("init"),
            Target::Validate => f.write_str("validate"),
            Target::InitBackend => f.write_str("init-backend"),
            Target::SaveBackend => f.write_str("save-backend"),
            Target::Plan => f.write_str("plan"),
            Target::Apply => f.write_str("apply"),
            Target::Test => f.write_str("test"),
            Target::Deploy => f.write_str("deploy"),
            Target::GetRoles => f.write_str("get-roles"),
            Target::UploadAnsible => f.write_str("upload-ansible"),
        }
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(artifact) = s.strip_prefix("fetch-") {
            return artifact.parse().map(Target::Fetch);
        }
        match s {
            "init" => Ok(Target::Init),
            "validate" => Ok(Target::Validate),
            "init-backend" => Ok(Target::InitBackend),
            "save-backend" => Ok(Target::SaveBackend),
            "plan" => Ok(Target::Plan),
            "apply" => Ok(Target::Apply),
            "test" => Ok(Target::Test),
            "deploy" => Ok(Target::Deploy),
            "get-roles" => Ok(Target::GetRoles),
            "upload-ansible" => Ok(Target::UploadAnsible),
            other => Err(format!("unknown target '{}'", other)),
        }
    }
}

/// A unit of work performed while running a target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Download an artifact into the release directory
    Fetch(Artifact),
    /// Probe the state bucket and write `backend.tf`
    WriteBackend,
    /// Upload a local state file to the state bucket
    ArchiveState,
    /// Fail unless the file exists in the working directory
    RequireFile(String),
    Run(Invocation),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fetch(artifact) => write!(f, "fetch {}", artifact.file_name()),
            Action::WriteBackend => f.write_str("write backend declaration"),
            Action::ArchiveState => f.write_str("archive local state"),
            Action::RequireFile(path) => write!(f, "require {}", path),
            Action::Run(invocation) => write!(f, "run {}", invocation),
        }
    }
}

/// Scheduled step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Action(Action),
    /// Runs `cleanup` after `body` whether or not the body failed
    Scoped { body: Vec<Action>, cleanup: Action },
}

impl Step {
    fn run(invocation: Invocation) -> Self {
        Step::Action(Action::Run(invocation))
    }

    /// All actions in execution order, cleanup included
    pub fn actions(&self) -> Vec<&Action> {
        match self {
            Step::Action(action) => vec![action],
            Step::Scoped { body, cleanup } => body.iter().chain(std::iter::once(cleanup)).collect(),
        }
    }
}

/// Expand targets into the ordered steps that run them
///
/// An empty target list schedules [`Target::DEFAULT`].
pub fn schedule(targets: &[Target], config: &Config) -> Vec<Step> {
    let mut planner = Planner {
        config,
        visited: HashSet::new(),
        steps: Vec::new(),
    };

    if targets.is_empty() {
        planner.visit(Target::DEFAULT);
    }
    for target in targets {
        planner.visit(*target);
    }

    planner.steps
}

struct Planner<'a> {
    config: &'a Config,
    visited: HashSet<Target>,
    steps: Vec<Step>,
}

impl Planner<'_> {
    fn visit(&mut self, target: Target) {
        if !self.visited.insert(target) {
            return;
        }
        for dependency in target.dependencies() {
            self.visit(dependency);
        }
        self.steps.extend(target.steps(self.config));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::vars;
    use crate::env::Environment;

    fn config() -> Config {
        let env = Environment::new()
            .with(vars::PROJECT_NAME, "acme")
            .with(vars::ALERT_EMAIL, "a@x.com");
        Config::from_env(&env).unwrap()
    }

    fn describe(steps: &[Step]) -> Vec<String> {
        steps
            .iter()
            .flat_map(|s| s.actions())
            .map(|a| a.to_string())
            .collect()
    }

    #[test]
    fn test_default_target_is_validate() {
        let config = config();
        assert_eq!(
            schedule(&[], &config),
            schedule(&[Target::Validate], &config)
        );
    }

    #[test]
    fn test_validate_fetches_then_inits() {
        let steps = schedule(&[Target::Validate], &config());
        assert_eq!(
            describe(&steps),
            vec![
                "fetch grace-inventory-lambda.zip",
                "fetch grace-ansible-lambda.zip",
                "fetch grace-ansible-rotate-keypair.zip",
                "fetch grace-paas-associate-zone.zip",
                "fetch grace-secrets-sync-lambda.zip",
                "run terraform init",
                "run terraform validate",
            ]
        );
    }

    #[test]
    fn test_plan_writes_backend_first() {
        let steps = schedule(&[Target::Plan], &config());
        let described = describe(&steps);
        assert_eq!(described.first().unwrap(), "write backend declaration");
        assert_eq!(described.last().unwrap(), "run terraform plan -out plan.tfplan");
        assert_eq!(described.len(), 9);
    }

    #[test]
    fn test_apply_is_scoped_with_archive_cleanup() {
        let steps = schedule(&[Target::Apply], &config());
        let last = steps.last().unwrap();
        assert_eq!(
            last,
            &Step::Scoped {
                body: vec![
                    Action::RequireFile("plan.tfplan".to_string()),
                    Action::Run(Invocation::terraform_apply()),
                ],
                cleanup: Action::ArchiveState,
            }
        );
    }

    #[test]
    fn test_deploy_runs_shared_dependencies_once() {
        let steps = schedule(&[Target::Deploy], &config());
        let described = describe(&steps);

        let count = |needle: &str| described.iter().filter(|d| *d == needle).count();
        assert_eq!(count("write backend declaration"), 1);
        assert_eq!(count("run terraform init"), 1);
        assert_eq!(count("run terraform validate"), 1);
        assert_eq!(count("run terraform plan -out plan.tfplan"), 1);
        assert_eq!(count("run terraform apply --auto-approve plan.tfplan"), 1);

        let plan = described
            .iter()
            .position(|d| d.starts_with("run terraform plan"))
            .unwrap();
        let apply = described
            .iter()
            .position(|d| d.starts_with("run terraform apply"))
            .unwrap();
        assert!(plan < apply);
        assert_eq!(described.last().unwrap(), "archive local state");
    }

    #[test]
    fn test_test_target_is_plan() {
        let config = config();
        assert_eq!(
            schedule(&[Target::Test], &config),
            schedule(&[Target::Plan], &config)
        );
    }

    #[test]
    fn test_repeated_targets_run_once() {
        let config = config();
        let once = schedule(&[Target::Fetch(Artifact::Network)], &config);
        let twice = schedule(
            &[
                Target::Fetch(Artifact::Network),
                Target::Fetch(Artifact::Network),
            ],
            &config,
        );
        assert_eq!(once, twice);
        assert_eq!(once.len(), 1);
    }

    #[test]
    fn test_upload_ansible_installs_roles_first() {
        let steps = schedule(&[Target::UploadAnsible], &config());
        let described = describe(&steps);
        assert_eq!(described.len(), 2);
        assert!(described[0].starts_with("run ansible-galaxy install"));
        assert!(described[1].starts_with("run aws s3 cp"));
    }

    #[test]
    fn test_target_names_round_trip() {
        for name in [
            "init",
            "validate",
            "init-backend",
            "save-backend",
            "plan",
            "apply",
            "test",
            "deploy",
            "get-roles",
            "upload-ansible",
            "fetch-inventory",
            "fetch-rotate-keypair",
        ] {
            let target: Target = name.parse().unwrap();
            assert_eq!(target.to_string(), name);
        }
        assert!("destroy".parse::<Target>().is_err());
    }
}
