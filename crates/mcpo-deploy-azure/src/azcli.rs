//! az CLI wrapper
//!
//! Wraps the az CLI commands the deployment pipeline needs. Queries use
//! `--output tsv` (one field per line) or `--output json`; mutating calls
//! are trusted on exit status alone.

use std::path::Path;
use std::process::Stdio;

use serde::Deserialize;
use tokio::process::Command;

use crate::error::{AzureError, Result};

/// az CLI wrapper
#[derive(Debug, Default)]
pub struct AzCli;

impl AzCli {
    pub fn new() -> Self {
        Self
    }

    /// Check that az is installed at all.
    pub async fn check_installed(&self) -> Result<()> {
        let which = Command::new("which")
            .arg("az")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;
        if !which.success() {
            return Err(AzureError::AzNotFound);
        }
        Ok(())
    }

    /// The active account, or `NotLoggedIn` when there is no session.
    pub async fn account_show(&self) -> Result<AccountInfo> {
        let output = Command::new("az")
            .args(["account", "show", "--output", "json"])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            return Err(AzureError::NotLoggedIn);
        }

        let account: AccountInfo = serde_json::from_slice(&output.stdout)?;
        Ok(account)
    }

    /// Run an az command and return captured stdout.
    async fn run_command(&self, args: &[&str]) -> Result<String> {
        tracing::debug!("Running: az {}", args.join(" "));

        let output = Command::new("az")
            .args(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AzureError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Run an az command and report only whether it succeeded.
    async fn run_succeeds(&self, args: &[&str]) -> Result<bool> {
        tracing::debug!("Running: az {}", args.join(" "));

        let status = Command::new("az")
            .args(args)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;
        Ok(status.success())
    }

    /// Create a resource group. `az group create` is idempotent.
    pub async fn group_create(&self, name: &str, location: &str) -> Result<()> {
        self.run_command(&[
            "group", "create", "--name", name, "--location", location, "--output", "none",
        ])
        .await?;
        Ok(())
    }

    /// Create a container registry with the admin account enabled.
    /// Re-running with identical parameters succeeds.
    pub async fn acr_create(&self, resource_group: &str, name: &str) -> Result<()> {
        self.run_command(&[
            "acr",
            "create",
            "--resource-group",
            resource_group,
            "--name",
            name,
            "--sku",
            "Basic",
            "--admin-enabled",
            "true",
            "--output",
            "none",
        ])
        .await?;
        Ok(())
    }

    /// Login server of a registry (`<name>.azurecr.io`).
    pub async fn acr_login_server(&self, name: &str) -> Result<String> {
        let output = self
            .run_command(&[
                "acr",
                "show",
                "--name",
                name,
                "--query",
                "loginServer",
                "--output",
                "tsv",
            ])
            .await?;

        let server = output.trim();
        if server.is_empty() {
            return Err(AzureError::Parse(format!(
                "registry '{}' reported no login server",
                name
            )));
        }
        Ok(server.to_string())
    }

    /// Admin credentials of a registry.
    pub async fn acr_credentials(&self, name: &str) -> Result<RegistryCredentials> {
        let output = self
            .run_command(&[
                "acr",
                "credential",
                "show",
                "--name",
                name,
                "--query",
                "[username, passwords[0].value]",
                "--output",
                "tsv",
            ])
            .await?;

        let (username, password) = parse_two_fields(&output);
        match (username, password) {
            (Some(username), Some(password)) => Ok(RegistryCredentials { username, password }),
            _ => Err(AzureError::Parse(format!(
                "incomplete credentials for registry '{}'",
                name
            ))),
        }
    }

    /// Build and push an image remotely with `az acr build`. Inherits stdio
    /// so the user sees the build log.
    pub async fn acr_build(&self, registry: &str, image: &str, context: &Path) -> Result<()> {
        let context_str = context.display().to_string();
        let args = [
            "acr",
            "build",
            "--registry",
            registry,
            "--image",
            image,
            context_str.as_str(),
        ];

        tracing::debug!("Running: az {}", args.join(" "));
        let status = Command::new("az").args(args).status().await?;
        if !status.success() {
            return Err(AzureError::BuildFailed(format!(
                "az acr build exited with {}",
                status
            )));
        }
        Ok(())
    }

    /// Whether a container instance with this identity exists.
    pub async fn container_exists(&self, resource_group: &str, name: &str) -> Result<bool> {
        self.run_succeeds(&[
            "container",
            "show",
            "--resource-group",
            resource_group,
            "--name",
            name,
        ])
        .await
    }

    /// Delete a container instance.
    pub async fn container_delete(&self, resource_group: &str, name: &str) -> Result<()> {
        self.run_command(&[
            "container",
            "delete",
            "--resource-group",
            resource_group,
            "--name",
            name,
            "--yes",
            "--output",
            "none",
        ])
        .await?;
        Ok(())
    }

    /// Create a container instance from the given spec.
    pub async fn container_create(&self, spec: &InstanceSpec) -> Result<()> {
        let port_str = spec.port.to_string();
        let cpu_str = spec.cpu.to_string();
        let memory_str = spec.memory_gb.to_string();
        let secure_env: Vec<String> = spec
            .secure_env
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect();

        let mut args = vec![
            "container",
            "create",
            "--resource-group",
            spec.resource_group.as_str(),
            "--name",
            spec.name.as_str(),
            "--image",
            spec.image.as_str(),
            "--registry-login-server",
            spec.registry_login_server.as_str(),
            "--registry-username",
            spec.registry_username.as_str(),
            "--registry-password",
            spec.registry_password.as_str(),
            "--dns-name-label",
            spec.dns_label.as_str(),
            "--os-type",
            "Linux",
            "--ports",
            port_str.as_str(),
            "--cpu",
            cpu_str.as_str(),
            "--memory",
            memory_str.as_str(),
            "--restart-policy",
            "Always",
            "--output",
            "none",
        ];

        if !secure_env.is_empty() {
            args.push("--secure-environment-variables");
            for pair in &secure_env {
                args.push(pair.as_str());
            }
        }

        self.run_command(&args).await?;
        Ok(())
    }

    /// FQDN and lifecycle state of a container instance.
    pub async fn container_status(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<InstanceStatus> {
        let output = self
            .run_command(&[
                "container",
                "show",
                "--resource-group",
                resource_group,
                "--name",
                name,
                "--query",
                "[ipAddress.fqdn, instanceView.state]",
                "--output",
                "tsv",
            ])
            .await?;

        let (fqdn, state) = parse_two_fields(&output);
        Ok(InstanceStatus { fqdn, state })
    }
}

/// Parse a two-element TSV array query (one field per line; null fields
/// come back as empty lines).
fn parse_two_fields(output: &str) -> (Option<String>, Option<String>) {
    let mut lines = output.split('\n');
    let first = lines
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let second = lines
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    (first, second)
}

/// Active account from `az account show`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountInfo {
    pub name: String,
    #[serde(default)]
    pub user: Option<AccountUser>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountUser {
    pub name: String,
}

/// Admin credentials of a container registry.
#[derive(Debug, Clone)]
pub struct RegistryCredentials {
    pub username: String,
    pub password: String,
}

/// Everything `az container create` needs.
#[derive(Debug, Clone)]
pub struct InstanceSpec {
    pub resource_group: String,
    pub name: String,
    /// Fully-qualified image reference (`<login-server>/mcpo:<tag>`).
    pub image: String,
    pub registry_login_server: String,
    pub registry_username: String,
    pub registry_password: String,
    pub dns_label: String,
    pub port: u16,
    pub cpu: f64,
    pub memory_gb: f64,
    /// Injected as secure environment variables.
    pub secure_env: Vec<(String, String)>,
}

/// Reported address and lifecycle state of an instance.
#[derive(Debug, Clone, Default)]
pub struct InstanceStatus {
    pub fqdn: Option<String>,
    pub state: Option<String>,
}

impl InstanceStatus {
    pub fn is_running(&self) -> bool {
        self.state.as_deref() == Some("Running")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_two_fields_both_present() {
        let (a, b) = parse_two_fields("mcpoacr\ns3cret\n");
        assert_eq!(a.as_deref(), Some("mcpoacr"));
        assert_eq!(b.as_deref(), Some("s3cret"));
    }

    #[test]
    fn parse_two_fields_null_first_field() {
        // fqdn not assigned yet: az prints an empty line for null
        let (fqdn, state) = parse_two_fields("\nPending\n");
        assert_eq!(fqdn, None);
        assert_eq!(state.as_deref(), Some("Pending"));
    }

    #[test]
    fn parse_two_fields_empty_output() {
        let (a, b) = parse_two_fields("");
        assert_eq!(a, None);
        assert_eq!(b, None);
    }

    #[test]
    fn instance_status_running() {
        let status = InstanceStatus {
            fqdn: Some("mcpo-app.eastus.azurecontainer.io".into()),
            state: Some("Running".into()),
        };
        assert!(status.is_running());

        let pending = InstanceStatus {
            fqdn: None,
            state: Some("Pending".into()),
        };
        assert!(!pending.is_running());
    }

    #[test]
    fn account_info_parses_az_json() {
        let json = r#"{"name": "Pay-As-You-Go", "user": {"name": "dev@example.com", "type": "user"}}"#;
        let account: AccountInfo = serde_json::from_str(json).unwrap();
        assert_eq!(account.name, "Pay-As-You-Go");
        assert_eq!(account.user.unwrap().name, "dev@example.com");
    }
}
