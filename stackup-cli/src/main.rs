mod error;
mod executor;
mod fetch;
mod runner;

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use colored::Colorize;
use log::LevelFilter;

use stackup_core::{Environment, Step, Target, resolve, schedule};
use stackup_state::{StoreConfig, create_store};

use crate::error::Result;
use crate::executor::Executor;

const TARGETS_HELP: &str = "\
Targets:
  validate          terraform validate (default)
  init              fetch all artifacts, then terraform init
  init-backend      write backend.tf for the environment's state bucket
  plan              terraform plan -out plan.tfplan
  apply             terraform apply the saved plan, then archive local state
  save-backend      upload a local state file to the state bucket
  test              same as plan
  deploy            plan, then apply
  get-roles         install ansible roles
  upload-ansible    copy the ansible tree to the environment's bucket
  fetch-<artifact>  download one artifact: inventory, ansible, rotate-keypair,
                    network, secrets";

#[derive(Parser)]
#[command(name = "stackup")]
#[command(about = "Build entrypoint for provisioning an environment's infrastructure", long_about = None)]
#[command(after_help = TARGETS_HELP)]
struct Cli {
    /// Targets to run; each runs at most once, after its dependencies
    #[arg(value_name = "TARGET")]
    targets: Vec<Target>,

    /// Directory holding the Terraform configuration
    #[arg(short = 'C', long, default_value = ".")]
    workdir: PathBuf,

    /// Treat subdirectories of DIR as buckets instead of talking to S3
    #[arg(long, value_name = "DIR")]
    local_store: Option<PathBuf>,

    /// Print the scheduled steps without running them
    #[arg(long)]
    dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(e.exit_code());
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Warn,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .format_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    let resolution = resolve(&Environment::capture())?;
    let config = &resolution.config;

    let steps = schedule(&cli.targets, config);

    if cli.dry_run {
        print_steps(&steps);
        return Ok(());
    }

    let store_config = match cli.local_store {
        Some(root) => StoreConfig::Local { root },
        None => StoreConfig::S3 {
            region: config.region.clone(),
        },
    };
    let store = create_store(&store_config, resolution.layered_environment()).await;

    println!(
        "{}",
        format!(
            "Running {} for {} ({})",
            describe_targets(&cli.targets),
            config.project_name,
            config.app_env
        )
        .cyan()
    );

    let executor = Executor::new(&resolution, &cli.workdir, store);
    executor.run(&steps).await?;

    println!("{}", "✓ Done".green().bold());
    Ok(())
}

fn describe_targets(targets: &[Target]) -> String {
    if targets.is_empty() {
        return Target::DEFAULT.to_string();
    }
    targets
        .iter()
        .map(Target::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn print_steps(steps: &[Step]) {
    println!("{}", "Scheduled steps:".bold());
    for step in steps {
        match step {
            Step::Action(action) => println!("  • {}", action),
            Step::Scoped { body, cleanup } => {
                for action in body {
                    println!("  • {}", action);
                }
                println!("  • {} {}", cleanup, "(always)".dimmed());
            }
        }
    }
}
