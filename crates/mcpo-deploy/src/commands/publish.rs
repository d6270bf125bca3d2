//! DockerHub publish pipeline.
//!
//! Local `docker build --platform linux/amd64`, then push. When a version
//! tag other than `latest` is given, the image is additionally tagged and
//! pushed as `latest`. The image size report is informational.

use colored::Colorize;
use mcpo_deploy_container::{ContainerError, ContainerRuntime, format_size};
use mcpo_deploy_core::{PipelineError, Prompter, PublishArgs, PublishConfig, defaults};

/// Target platform for DockerHub images; matches what ACI runs.
const PLATFORM: &str = "linux/amd64";

#[derive(Debug, Clone)]
pub struct PublishSummary {
    pub image: mcpo_deploy_core::ImageRef,
    /// Whether a separate `latest` tag was pushed as well.
    pub also_latest: bool,
    pub size_bytes: Option<u64>,
}

pub async fn handle(
    runtime: &dyn ContainerRuntime,
    prompter: &mut dyn Prompter,
    args: PublishArgs,
) -> anyhow::Result<()> {
    let summary = run_pipeline(runtime, prompter, args).await?;
    print_summary(&summary);
    Ok(())
}

pub async fn run_pipeline(
    runtime: &dyn ContainerRuntime,
    prompter: &mut dyn Prompter,
    args: PublishArgs,
) -> Result<PublishSummary, PipelineError> {
    println!("{}", "Checking prerequisites...".blue().bold());
    runtime.check_available().await.map_err(prerequisite_err)?;
    println!("  {} docker is available", "✓".green());

    let config = PublishConfig::resolve(args, prompter)?;
    println!("Publishing {}", config.image.to_string().cyan());

    println!(
        "{}",
        format!("Building {} ({})...", config.image, PLATFORM).blue()
    );
    runtime
        .build(&config.image, &config.context_dir, Some(PLATFORM))
        .await
        .map_err(|e| PipelineError::Build(e.to_string()))?;

    println!("{}", format!("Pushing {}...", config.image).blue());
    runtime
        .push(&config.image)
        .await
        .map_err(|e| PipelineError::Build(e.to_string()))?;

    let also_latest = !config.image.is_latest();
    if also_latest {
        let latest = config.image.with_tag(defaults::TAG);
        println!("{}", format!("Pushing {}...", latest).blue());
        runtime
            .tag(&config.image, &latest)
            .await
            .map_err(|e| PipelineError::Build(e.to_string()))?;
        runtime
            .push(&latest)
            .await
            .map_err(|e| PipelineError::Build(e.to_string()))?;
    }

    // Size report is informational; a failed query is not an error.
    let size_bytes = runtime.image_size(&config.image).await.ok().flatten();

    Ok(PublishSummary {
        image: config.image,
        also_latest,
        size_bytes,
    })
}

fn print_summary(summary: &PublishSummary) {
    println!();
    println!("{}", "Publish complete".green().bold());
    println!("  Image:  {}", summary.image.to_string().cyan());
    if summary.also_latest {
        println!(
            "  Also:   {}",
            summary.image.with_tag("latest").to_string().cyan()
        );
    }
    if let Some(bytes) = summary.size_bytes {
        println!("  Size:   {}", format_size(bytes));
    }
    println!(
        "  Run:    docker run -d -p {port}:{port} --name mcpo {image}",
        port = defaults::PORT,
        image = summary.image
    );
}

fn prerequisite_err(err: ContainerError) -> PipelineError {
    PipelineError::prerequisite("docker", err.to_string())
}
