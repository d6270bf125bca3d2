//! Azure backend for mcpo-deploy
//!
//! Implements the cloud side of the deployment pipeline by shelling out to
//! the `az` CLI: resource groups, Azure Container Registry (including
//! remote `az acr build`), and Azure Container Instances.
//!
//! # Requirements
//!
//! - the `az` CLI must be installed and logged in (`az login`)
//!
//! The orchestrator trusts `az` exit codes and parses only the documented
//! query output (JSON for `az account show`, TSV for field queries).

pub mod azcli;
pub mod error;
pub mod provider;

pub use azcli::{AccountInfo, AzCli, InstanceSpec, InstanceStatus, RegistryCredentials};
pub use error::{AzureError, Result};
pub use provider::{AuthStatus, AzureProvider, ContainerCloud, RegistryInfo};
