//! mcpo-deploy: build and run the MCPO container remotely.
//!
//! Two variants of one linear pipeline: `azure` deploys to Azure Container
//! Instances through the az CLI, `publish` pushes to DockerHub through the
//! docker CLI. The orchestrator owns no durable state; re-running a failed
//! pipeline is always the recovery path.

mod commands;
mod probe;
mod prompt;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use mcpo_deploy_azure::AzureProvider;
use mcpo_deploy_container::DockerCli;
use mcpo_deploy_core::{DeployArgs, PipelineError, PublishArgs, WaitConfig};

use crate::probe::HttpProbe;
use crate::prompt::TerminalPrompter;

#[derive(Parser)]
#[command(name = "mcpo-deploy", version)]
#[command(about = "Build and deploy the MCPO container to DockerHub or Azure Container Instances")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy to Azure Container Instances (requires the az CLI)
    ///
    /// The Tavily API key is read from TAVILY_API_KEY and prompted for when
    /// unset.
    Azure {
        /// Resource group name
        resource_group: Option<String>,
        /// Container registry name
        registry: Option<String>,
        /// Container instance name
        container_name: Option<String>,
        /// Azure region
        location: Option<String>,
        /// DNS name label for the public endpoint
        dns_label: Option<String>,
        /// Image tag to build and deploy
        #[arg(short, long)]
        tag: Option<String>,
        /// Docker build context directory
        #[arg(long, default_value = ".")]
        context: PathBuf,
        /// Wall-clock budget for the whole pipeline, in seconds
        #[arg(long, default_value_t = 1800)]
        timeout_secs: u64,
    },
    /// Build the MCPO image and push it to DockerHub (requires docker)
    Publish {
        /// DockerHub username (prompted when omitted)
        username: Option<String>,
        /// Version tag (prompted when omitted; empty answer means latest)
        tag: Option<String>,
        /// Docker build context directory
        #[arg(long, default_value = ".")]
        context: PathBuf,
        /// Wall-clock budget for the whole pipeline, in seconds
        #[arg(long, default_value_t = 1800)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Azure {
            resource_group,
            registry,
            container_name,
            location,
            dns_label,
            tag,
            context,
            timeout_secs,
        } => {
            let args = DeployArgs {
                resource_group,
                registry,
                container_name,
                location,
                dns_label,
                tag,
                context_dir: context,
            };
            let cloud = AzureProvider::new();
            let probe = HttpProbe::new()?;
            let mut prompter = TerminalPrompter;
            let wait = WaitConfig::default();

            with_timeout(
                timeout_secs,
                commands::azure::handle(&cloud, &probe, &mut prompter, args, &wait),
            )
            .await?;
        }
        Commands::Publish {
            username,
            tag,
            context,
            timeout_secs,
        } => {
            let args = PublishArgs {
                username,
                tag,
                context_dir: context,
            };
            let runtime = DockerCli::new();
            let mut prompter = TerminalPrompter;

            with_timeout(
                timeout_secs,
                commands::publish::handle(&runtime, &mut prompter, args),
            )
            .await?;
        }
    }

    Ok(())
}

/// One timeout covers the whole pipeline so a hung external tool cannot
/// block forever.
async fn with_timeout(
    secs: u64,
    pipeline: impl Future<Output = anyhow::Result<()>>,
) -> anyhow::Result<()> {
    match tokio::time::timeout(Duration::from_secs(secs), pipeline).await {
        Ok(result) => result,
        Err(_) => Err(PipelineError::Timeout(secs).into()),
    }
}
