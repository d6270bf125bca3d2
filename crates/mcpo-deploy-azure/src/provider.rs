//! Cloud backend trait and the Azure implementation.

use std::path::Path;

use async_trait::async_trait;
use mcpo_deploy_core::ImageRef;

use crate::azcli::{AzCli, InstanceSpec, InstanceStatus};
use crate::error::Result;

/// The cloud operations the Azure deployment pipeline depends on.
///
/// Implemented by [`AzureProvider`] on top of the az CLI; the pipeline
/// tests supply a recording fake.
#[async_trait]
pub trait ContainerCloud: Send + Sync {
    /// Check that the cloud CLI is installed and has an active session.
    async fn check_auth(&self) -> Result<AuthStatus>;

    /// Create the resource group; relied upon to be idempotent.
    async fn ensure_resource_group(&self, name: &str, location: &str) -> Result<()>;

    /// Create the registry (admin enabled); relied upon to be idempotent.
    /// Returns the registry's login server.
    async fn ensure_registry(&self, resource_group: &str, name: &str) -> Result<RegistryInfo>;

    /// Admin credentials used by the instance to pull the image.
    async fn registry_credentials(&self, name: &str) -> Result<crate::azcli::RegistryCredentials>;

    /// Build and push the image remotely inside the registry.
    async fn build_image(&self, registry: &str, image: &ImageRef, context: &Path) -> Result<()>;

    async fn instance_exists(&self, resource_group: &str, name: &str) -> Result<bool>;

    async fn delete_instance(&self, resource_group: &str, name: &str) -> Result<()>;

    async fn create_instance(&self, spec: &InstanceSpec) -> Result<()>;

    async fn instance_status(&self, resource_group: &str, name: &str)
    -> Result<InstanceStatus>;
}

/// Authentication status
#[derive(Debug, Clone)]
pub struct AuthStatus {
    pub authenticated: bool,
    /// Account/user information if available
    pub account_info: Option<String>,
    /// Error message if not authenticated
    pub error: Option<String>,
}

impl AuthStatus {
    pub fn ok(account_info: impl Into<String>) -> Self {
        Self {
            authenticated: true,
            account_info: Some(account_info.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            authenticated: false,
            account_info: None,
            error: Some(error.into()),
        }
    }
}

/// Registry identity as reported by the cloud.
#[derive(Debug, Clone)]
pub struct RegistryInfo {
    pub login_server: String,
}

/// Azure provider backed by the az CLI.
#[derive(Debug, Default)]
pub struct AzureProvider {
    az: AzCli,
}

impl AzureProvider {
    pub fn new() -> Self {
        Self { az: AzCli::new() }
    }
}

#[async_trait]
impl ContainerCloud for AzureProvider {
    async fn check_auth(&self) -> Result<AuthStatus> {
        self.az.check_installed().await?;

        match self.az.account_show().await {
            Ok(account) => {
                let user = account
                    .user
                    .map(|u| u.name)
                    .unwrap_or_else(|| account.name.clone());
                Ok(AuthStatus::ok(format!("{} ({})", user, account.name)))
            }
            Err(e) => Ok(AuthStatus::failed(e.to_string())),
        }
    }

    async fn ensure_resource_group(&self, name: &str, location: &str) -> Result<()> {
        self.az.group_create(name, location).await
    }

    async fn ensure_registry(&self, resource_group: &str, name: &str) -> Result<RegistryInfo> {
        self.az.acr_create(resource_group, name).await?;
        let login_server = self.az.acr_login_server(name).await?;
        Ok(RegistryInfo { login_server })
    }

    async fn registry_credentials(&self, name: &str) -> Result<crate::azcli::RegistryCredentials> {
        self.az.acr_credentials(name).await
    }

    async fn build_image(&self, registry: &str, image: &ImageRef, context: &Path) -> Result<()> {
        self.az
            .acr_build(registry, &image.to_string(), context)
            .await
    }

    async fn instance_exists(&self, resource_group: &str, name: &str) -> Result<bool> {
        self.az.container_exists(resource_group, name).await
    }

    async fn delete_instance(&self, resource_group: &str, name: &str) -> Result<()> {
        self.az.container_delete(resource_group, name).await
    }

    async fn create_instance(&self, spec: &InstanceSpec) -> Result<()> {
        self.az.container_create(spec).await
    }

    async fn instance_status(
        &self,
        resource_group: &str,
        name: &str,
    ) -> Result<InstanceStatus> {
        self.az.container_status(resource_group, name).await
    }
}
