//! docker CLI wrapper
//!
//! Wraps the docker CLI for the publish pipeline. Long-running commands
//! (build, push) inherit stdio so the user sees the tool's own progress
//! output; queries capture stdout.

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use mcpo_deploy_core::ImageRef;
use tokio::process::Command;

use crate::error::{ContainerError, Result};
use crate::runtime::ContainerRuntime;

/// docker CLI wrapper
#[derive(Debug, Default)]
pub struct DockerCli;

impl DockerCli {
    pub fn new() -> Self {
        Self
    }

    /// Run a docker command with inherited stdio, trusting the exit status.
    async fn run_streaming(&self, args: &[&str]) -> Result<()> {
        tracing::debug!("Running: docker {}", args.join(" "));

        let status = Command::new("docker").args(args).status().await?;
        if !status.success() {
            return Err(ContainerError::CommandFailed(format!(
                "docker {} exited with {}",
                args.join(" "),
                status
            )));
        }
        Ok(())
    }

    /// Run a docker command and return captured stdout.
    async fn run_captured(&self, args: &[&str]) -> Result<String> {
        tracing::debug!("Running: docker {}", args.join(" "));

        let output = Command::new("docker")
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ContainerError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl ContainerRuntime for DockerCli {
    async fn check_available(&self) -> Result<()> {
        let which = Command::new("which")
            .arg("docker")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;
        if !which.success() {
            return Err(ContainerError::DockerNotFound);
        }

        // `docker info` fails when the daemon is not running
        let info = Command::new("docker")
            .arg("info")
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;
        if !info.status.success() {
            let stderr = String::from_utf8_lossy(&info.stderr);
            return Err(ContainerError::DaemonUnavailable(stderr.trim().to_string()));
        }

        Ok(())
    }

    async fn build(
        &self,
        image: &ImageRef,
        context: &Path,
        platform: Option<&str>,
    ) -> Result<()> {
        let image_ref = image.to_string();
        let context_str = context.display().to_string();

        let mut args = vec!["build", "-t", image_ref.as_str()];
        if let Some(platform) = platform {
            args.push("--platform");
            args.push(platform);
        }
        args.push(context_str.as_str());

        self.run_streaming(&args)
            .await
            .map_err(|e| ContainerError::BuildFailed(e.to_string()))
    }

    async fn tag(&self, source: &ImageRef, target: &ImageRef) -> Result<()> {
        let source_ref = source.to_string();
        let target_ref = target.to_string();
        self.run_captured(&["tag", source_ref.as_str(), target_ref.as_str()])
            .await?;
        Ok(())
    }

    async fn push(&self, image: &ImageRef) -> Result<()> {
        let image_ref = image.to_string();
        self.run_streaming(&["push", image_ref.as_str()])
            .await
            .map_err(|e| ContainerError::PushFailed(e.to_string()))
    }

    async fn image_size(&self, image: &ImageRef) -> Result<Option<u64>> {
        let image_ref = image.to_string();
        let output = self
            .run_captured(&[
                "image",
                "inspect",
                image_ref.as_str(),
                "--format",
                "{{.Size}}",
            ])
            .await?;

        Ok(output.trim().parse::<u64>().ok())
    }
}

/// Human-readable image size (`123.4 MB`, `1.2 GB`).
pub fn format_size(bytes: u64) -> String {
    const MB: f64 = 1_000_000.0;
    const GB: f64 = 1_000_000_000.0;

    let bytes = bytes as f64;
    if bytes >= GB {
        format!("{:.1} GB", bytes / GB)
    } else {
        format!("{:.1} MB", bytes / MB)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_size_in_megabytes() {
        assert_eq!(format_size(123_400_000), "123.4 MB");
        assert_eq!(format_size(500_000), "0.5 MB");
    }

    #[test]
    fn format_size_in_gigabytes() {
        assert_eq!(format_size(1_200_000_000), "1.2 GB");
    }
}
