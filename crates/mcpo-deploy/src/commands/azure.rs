//! Azure deployment pipeline.
//!
//! Fixed linear sequence: prerequisites → configuration → resource group →
//! registry → remote build → instance (delete-if-exists, then create) →
//! readiness → smoke test → summary. Fatal errors halt the pipeline where
//! they occur; partially created resources are left for the next run to
//! reconcile. The readiness stage degrades to a warning.

use std::time::Duration;

use colored::Colorize;
use mcpo_deploy_azure::{AzureError, ContainerCloud, InstanceSpec, InstanceStatus};
use mcpo_deploy_core::servers::{self, ServersFileStatus};
use mcpo_deploy_core::{
    DeployArgs, DeployConfig, PipelineError, PipelineStage, Prompter, WaitConfig, defaults,
};
use tokio::time::sleep;

use crate::probe::HealthProbe;

/// What the pipeline produced, for the final report.
#[derive(Debug, Clone)]
pub struct DeploySummary {
    pub resource_group: String,
    pub container_name: String,
    /// Reported FQDN, or the expected one when readiness was not confirmed.
    pub fqdn: String,
    pub confirmed_ready: bool,
    /// `None` when the smoke test could not run.
    pub smoke_passed: Option<bool>,
}

impl DeploySummary {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.fqdn, defaults::PORT)
    }

    pub fn docs_url(&self) -> String {
        format!("{}{}", self.base_url(), defaults::HEALTH_PATH)
    }
}

pub async fn handle(
    cloud: &dyn ContainerCloud,
    probe: &dyn HealthProbe,
    prompter: &mut dyn Prompter,
    args: DeployArgs,
    wait: &WaitConfig,
) -> anyhow::Result<()> {
    let summary = run_pipeline(cloud, probe, prompter, args, wait).await?;
    print_summary(&summary);
    Ok(())
}

/// Run the whole pipeline and return the summary.
///
/// The only non-fatal outcome is an unconfirmed readiness check; every
/// other error aborts and is surfaced to the caller.
pub async fn run_pipeline(
    cloud: &dyn ContainerCloud,
    probe: &dyn HealthProbe,
    prompter: &mut dyn Prompter,
    args: DeployArgs,
    wait: &WaitConfig,
) -> Result<DeploySummary, PipelineError> {
    let mut stage = PipelineStage::NotStarted;

    // Prerequisites: az installed and logged in. Fatal, no retry.
    println!("{}", "Checking prerequisites...".blue().bold());
    let auth = cloud.check_auth().await.map_err(prerequisite_err)?;
    if !auth.authenticated {
        return Err(PipelineError::prerequisite(
            "az",
            format!(
                "no active session ({}). Run: az login",
                auth.error.unwrap_or_else(|| "unknown".into())
            ),
        ));
    }
    if let Some(account) = &auth.account_info {
        println!("  {} az logged in as {}", "✓".green(), account.cyan());
    }
    stage = stage.next();
    tracing::debug!(stage = %stage, "stage complete");

    // Configuration, fully resolved before any mutating call.
    let config = DeployConfig::resolve(args, prompter)?;
    println!(
        "Deploying {} to resource group {} ({})",
        config.image.to_string().cyan(),
        config.resource_group.cyan(),
        config.location
    );

    match servers::ensure_servers_file(&config.context_dir)? {
        ServersFileStatus::CreatedDefault => {
            println!(
                "  {} created default {} in the build context",
                "✓".green(),
                servers::SERVERS_FILE
            );
        }
        ServersFileStatus::Existing => {}
    }
    if servers::has_placeholder_secret(&config.context_dir)? {
        println!(
            "  {} {} still contains the placeholder Tavily key",
            "⚠".yellow(),
            servers::SERVERS_FILE
        );
    }
    stage = stage.next();
    tracing::debug!(stage = %stage, "stage complete");

    // Resource group and registry: unconditional create, the tool is
    // idempotent for identical parameters.
    println!(
        "{}",
        format!("Ensuring resource group '{}'...", config.resource_group).blue()
    );
    cloud
        .ensure_resource_group(&config.resource_group, &config.location)
        .await
        .map_err(deployment_err)?;

    println!(
        "{}",
        format!("Ensuring container registry '{}'...", config.registry).blue()
    );
    let registry = cloud
        .ensure_registry(&config.resource_group, &config.registry)
        .await
        .map_err(deployment_err)?;
    println!("  {} login server {}", "✓".green(), registry.login_server);
    stage = stage.next();
    tracing::debug!(stage = %stage, "stage complete");

    // Remote build+push inside the registry.
    println!(
        "{}",
        format!("Building {} with az acr build...", config.image).blue()
    );
    cloud
        .build_image(&config.registry, &config.image, &config.context_dir)
        .await
        .map_err(|e| PipelineError::Build(e.to_string()))?;
    println!("  {} image published", "✓".green());
    stage = stage.next();
    tracing::debug!(stage = %stage, "stage complete");

    let credentials = cloud
        .registry_credentials(&config.registry)
        .await
        .map_err(deployment_err)?;

    // A container instance is not idempotent to create over; delete first
    // so recreation is deterministic.
    if cloud
        .instance_exists(&config.resource_group, &config.container_name)
        .await
        .map_err(deployment_err)?
    {
        println!(
            "  {} container instance '{}' already exists, deleting it first",
            "⚠".yellow(),
            config.container_name
        );
        cloud
            .delete_instance(&config.resource_group, &config.container_name)
            .await
            .map_err(deployment_err)?;
    }

    println!(
        "{}",
        format!("Creating container instance '{}'...", config.container_name).blue()
    );
    let spec = instance_spec(&config, &registry.login_server, &credentials);
    cloud.create_instance(&spec).await.map_err(deployment_err)?;
    println!("  {} instance created", "✓".green());
    stage = stage.next();
    tracing::debug!(stage = %stage, "stage complete");

    // Readiness: bounded backoff polling; exhaustion is a warning only.
    println!("{}", "Waiting for the instance to come up...".blue());
    let readiness = await_ready(cloud, &config, wait).await;
    stage = stage.next();
    tracing::debug!(stage = %stage, "stage complete");

    let (fqdn, confirmed_ready) = match readiness {
        Ok(status) => {
            let fqdn = status.fqdn.clone().unwrap_or_else(|| config.expected_fqdn());
            println!(
                "  {} instance is {} at {}",
                "✓".green(),
                status.state.as_deref().unwrap_or("up"),
                fqdn
            );
            (fqdn, true)
        }
        Err(e) => {
            println!("  {} {}", "⚠".yellow(), e.to_string().yellow());
            println!(
                "  {} check manually: az container show --resource-group {} --name {}",
                "⚠".yellow(),
                config.resource_group,
                config.container_name
            );
            (config.expected_fqdn(), false)
        }
    };

    // Smoke test: informational only.
    let smoke_passed = if confirmed_ready {
        let url = format!("http://{}:{}{}", fqdn, defaults::PORT, defaults::HEALTH_PATH);
        let passed = probe.probe(&url).await;
        if passed {
            println!("  {} smoke test passed ({})", "✓".green(), url);
        } else {
            println!("  {} smoke test failed ({})", "⚠".yellow(), url);
        }
        Some(passed)
    } else {
        None
    };

    stage = stage.next();
    debug_assert_eq!(stage, PipelineStage::Done);

    Ok(DeploySummary {
        resource_group: config.resource_group,
        container_name: config.container_name,
        fqdn,
        confirmed_ready,
        smoke_passed,
    })
}

/// Sleep, query, repeat, up to the wait policy's attempt limit.
async fn await_ready(
    cloud: &dyn ContainerCloud,
    config: &DeployConfig,
    wait: &WaitConfig,
) -> Result<InstanceStatus, PipelineError> {
    for attempt in 0..wait.max_attempts {
        sleep(Duration::from_millis(wait.delay_for_attempt(attempt))).await;

        match cloud
            .instance_status(&config.resource_group, &config.container_name)
            .await
        {
            Ok(status) if status.fqdn.is_some() => return Ok(status),
            Ok(_) => tracing::debug!("attempt {}: no FQDN reported yet", attempt + 1),
            Err(e) => tracing::debug!("attempt {}: status query failed: {}", attempt + 1, e),
        }
    }

    Err(PipelineError::Readiness(format!(
        "could not confirm the instance address after {} attempts",
        wait.max_attempts
    )))
}

fn instance_spec(
    config: &DeployConfig,
    login_server: &str,
    credentials: &mcpo_deploy_azure::RegistryCredentials,
) -> InstanceSpec {
    let mut secure_env = Vec::new();
    if let Some(key) = &config.tavily_api_key {
        secure_env.push((defaults::SECRET_ENV.to_string(), key.clone()));
    }

    InstanceSpec {
        resource_group: config.resource_group.clone(),
        name: config.container_name.clone(),
        image: config.image.qualified(login_server).to_string(),
        registry_login_server: login_server.to_string(),
        registry_username: credentials.username.clone(),
        registry_password: credentials.password.clone(),
        dns_label: config.dns_label.clone(),
        port: defaults::PORT,
        cpu: defaults::CPU,
        memory_gb: defaults::MEMORY_GB,
        secure_env,
    }
}

fn print_summary(summary: &DeploySummary) {
    println!();
    println!("{}", "Deployment complete".green().bold());
    println!("  Endpoint:  {}", summary.base_url().cyan());
    println!("  API docs:  {}", summary.docs_url().cyan());
    println!(
        "  Logs:      az container logs --resource-group {} --name {} --follow",
        summary.resource_group, summary.container_name
    );
    if !summary.confirmed_ready {
        println!(
            "  {} readiness was not confirmed; the instance may still be starting",
            "⚠".yellow()
        );
    }
}

fn prerequisite_err(err: AzureError) -> PipelineError {
    PipelineError::prerequisite("az", err.to_string())
}

fn deployment_err(err: AzureError) -> PipelineError {
    PipelineError::Deployment(err.to_string())
}
