//! Deployment configuration resolution.
//!
//! Every configurable value is described by a [`ValueSpec`] and resolved
//! through a fixed priority order: positional argument, environment
//! variable, interactive prompt, hardcoded default. Resolution returns a
//! tagged [`Resolution`] instead of branching inline, so the pipelines can
//! be tested with a scripted [`Prompter`].
//!
//! The resolved configurations ([`DeployConfig`], [`PublishConfig`]) are
//! immutable after construction; every required key is validated non-empty
//! before any mutating external call is issued.

use std::io;
use std::path::PathBuf;

use crate::error::{PipelineError, Result};
use crate::image::ImageRef;

/// Hardcoded fallbacks for the Azure deployment variant.
pub mod defaults {
    pub const RESOURCE_GROUP: &str = "mcpo-rg";
    pub const REGISTRY: &str = "mcpoacr";
    pub const CONTAINER_NAME: &str = "mcpo";
    pub const LOCATION: &str = "eastus";
    pub const DNS_LABEL: &str = "mcpo-app";
    pub const IMAGE_REPOSITORY: &str = "mcpo";
    pub const TAG: &str = "latest";

    /// Port MCPO listens on inside the container.
    pub const PORT: u16 = 8000;
    pub const CPU: f64 = 1.0;
    pub const MEMORY_GB: f64 = 1.5;

    /// Environment variable carrying the Tavily API key.
    pub const SECRET_ENV: &str = "TAVILY_API_KEY";

    /// Health path probed by the smoke test (MCPO's OpenAPI docs page).
    pub const HEALTH_PATH: &str = "/docs";
}

/// Interactive input abstraction.
///
/// The terminal implementation lives in the binary; tests use a scripted
/// one. An empty answer means the user declined to supply the value.
pub trait Prompter: Send {
    fn input(&mut self, message: &str) -> io::Result<String>;
    fn secret(&mut self, message: &str) -> io::Result<String>;
    fn confirm(&mut self, message: &str, default: bool) -> io::Result<bool>;
}

/// Where a resolved value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    Argument,
    Environment,
    Prompt,
    Default,
}

/// Outcome of resolving a single configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found { value: String, source: ValueSource },
    Missing,
}

impl Resolution {
    fn found(value: impl Into<String>, source: ValueSource) -> Self {
        Self::Found {
            value: value.into(),
            source,
        }
    }

    /// The value, or a `ConfigurationError` naming the missing key.
    pub fn required(self, key: &str) -> Result<String> {
        match self {
            Self::Found { value, .. } => Ok(value),
            Self::Missing => Err(PipelineError::Configuration(format!(
                "required value '{}' was not supplied",
                key
            ))),
        }
    }
}

/// Declarative description of one configuration value.
pub struct ValueSpec<'a> {
    pub key: &'a str,
    /// Positional argument, when given on the command line.
    pub argument: Option<String>,
    /// Environment variable consulted when the argument is absent.
    pub env_var: Option<&'a str>,
    /// Prompt message; prompting only happens when this is set.
    pub prompt: Option<&'a str>,
    /// Fallback when everything above yields nothing.
    pub default: Option<&'a str>,
    /// Hidden input when prompting.
    pub hidden: bool,
}

impl<'a> ValueSpec<'a> {
    pub fn new(key: &'a str) -> Self {
        Self {
            key,
            argument: None,
            env_var: None,
            prompt: None,
            default: None,
            hidden: false,
        }
    }

    pub fn argument(mut self, value: Option<String>) -> Self {
        self.argument = value;
        self
    }

    pub fn env(mut self, var: &'a str) -> Self {
        self.env_var = Some(var);
        self
    }

    pub fn prompt(mut self, message: &'a str) -> Self {
        self.prompt = Some(message);
        self
    }

    pub fn default(mut self, value: &'a str) -> Self {
        self.default = Some(value);
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }
}

/// Resolve one value through the fixed priority order.
pub fn resolve_value(spec: &ValueSpec<'_>, prompter: &mut dyn Prompter) -> Result<Resolution> {
    if let Some(value) = spec.argument.as_deref().filter(|v| !v.is_empty()) {
        return Ok(Resolution::found(value, ValueSource::Argument));
    }

    if let Some(var) = spec.env_var {
        if let Ok(value) = std::env::var(var) {
            if !value.is_empty() {
                return Ok(Resolution::found(value, ValueSource::Environment));
            }
        }
    }

    if let Some(message) = spec.prompt {
        let answer = if spec.hidden {
            prompter.secret(message)?
        } else {
            prompter.input(message)?
        };
        let answer = answer.trim().to_string();
        if !answer.is_empty() {
            return Ok(Resolution::found(answer, ValueSource::Prompt));
        }
    }

    if let Some(value) = spec.default {
        return Ok(Resolution::found(value, ValueSource::Default));
    }

    Ok(Resolution::Missing)
}

/// Resolved configuration for the Azure deployment variant.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub resource_group: String,
    pub registry: String,
    pub container_name: String,
    pub location: String,
    pub dns_label: String,
    /// Registry-relative image reference (`mcpo:<tag>`).
    pub image: ImageRef,
    /// `None` when the user confirmed deploying without the secret.
    pub tavily_api_key: Option<String>,
    pub context_dir: PathBuf,
}

/// Positional arguments of the `azure` subcommand, all optional.
#[derive(Debug, Clone, Default)]
pub struct DeployArgs {
    pub resource_group: Option<String>,
    pub registry: Option<String>,
    pub container_name: Option<String>,
    pub location: Option<String>,
    pub dns_label: Option<String>,
    pub tag: Option<String>,
    pub context_dir: PathBuf,
}

impl DeployConfig {
    /// Resolve the full Azure deployment configuration.
    ///
    /// The Tavily key is taken from `TAVILY_API_KEY`, then prompted for. An
    /// empty answer asks for explicit confirmation to continue without it;
    /// declining is a `ConfigurationError` and nothing has been mutated yet.
    pub fn resolve(args: DeployArgs, prompter: &mut dyn Prompter) -> Result<Self> {
        let resource_group = resolve_value(
            &ValueSpec::new("resource-group")
                .argument(args.resource_group)
                .default(defaults::RESOURCE_GROUP),
            prompter,
        )?
        .required("resource-group")?;

        let registry = resolve_value(
            &ValueSpec::new("registry")
                .argument(args.registry)
                .default(defaults::REGISTRY),
            prompter,
        )?
        .required("registry")?;

        let container_name = resolve_value(
            &ValueSpec::new("container-name")
                .argument(args.container_name)
                .default(defaults::CONTAINER_NAME),
            prompter,
        )?
        .required("container-name")?;

        let location = resolve_value(
            &ValueSpec::new("location")
                .argument(args.location)
                .default(defaults::LOCATION),
            prompter,
        )?
        .required("location")?;

        let dns_label = resolve_value(
            &ValueSpec::new("dns-label")
                .argument(args.dns_label)
                .default(defaults::DNS_LABEL),
            prompter,
        )?
        .required("dns-label")?;

        let tag = resolve_value(
            &ValueSpec::new("tag").argument(args.tag).default(defaults::TAG),
            prompter,
        )?
        .required("tag")?;

        let tavily_api_key = resolve_secret(prompter)?;

        Ok(Self {
            resource_group,
            registry,
            container_name,
            location,
            dns_label,
            image: ImageRef::new(defaults::IMAGE_REPOSITORY, tag),
            tavily_api_key,
            context_dir: args.context_dir,
        })
    }

    /// The FQDN Azure will assign: `<dns-label>.<location>.azurecontainer.io`.
    pub fn expected_fqdn(&self) -> String {
        format!("{}.{}.azurecontainer.io", self.dns_label, self.location)
    }
}

fn resolve_secret(prompter: &mut dyn Prompter) -> Result<Option<String>> {
    let resolution = resolve_value(
        &ValueSpec::new(defaults::SECRET_ENV)
            .env(defaults::SECRET_ENV)
            .prompt("Tavily API key (leave empty to skip)")
            .hidden(),
        prompter,
    )?;

    match resolution {
        Resolution::Found { value, .. } => Ok(Some(value)),
        Resolution::Missing => {
            let proceed = prompter.confirm(
                "TAVILY_API_KEY is not set; the tavily server will not work. Continue anyway?",
                false,
            )?;
            if proceed {
                Ok(None)
            } else {
                Err(PipelineError::Configuration(format!(
                    "{} was not supplied and the deployment was cancelled",
                    defaults::SECRET_ENV
                )))
            }
        }
    }
}

/// Resolved configuration for the DockerHub publish variant.
#[derive(Debug, Clone)]
pub struct PublishConfig {
    pub username: String,
    /// `<username>/mcpo:<tag>`.
    pub image: ImageRef,
    pub context_dir: PathBuf,
}

/// Positional arguments of the `publish` subcommand.
#[derive(Debug, Clone, Default)]
pub struct PublishArgs {
    pub username: Option<String>,
    pub tag: Option<String>,
    pub context_dir: PathBuf,
}

impl PublishConfig {
    /// Resolve the publish configuration, prompting for anything omitted.
    /// An empty tag answer falls back to `latest`; an empty username is a
    /// `ConfigurationError`.
    pub fn resolve(args: PublishArgs, prompter: &mut dyn Prompter) -> Result<Self> {
        let username = resolve_value(
            &ValueSpec::new("username")
                .argument(args.username)
                .prompt("DockerHub username"),
            prompter,
        )?
        .required("username")?;

        let tag = resolve_value(
            &ValueSpec::new("tag")
                .argument(args.tag)
                .prompt("Version tag (empty for latest)")
                .default(defaults::TAG),
            prompter,
        )?
        .required("tag")?;

        let image = ImageRef::new(
            format!("{}/{}", username, defaults::IMAGE_REPOSITORY),
            tag,
        );

        Ok(Self {
            username,
            image,
            context_dir: args.context_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Prompter replaying canned answers; records every message it was
    /// asked. Used across the config tests.
    pub struct ScriptedPrompter {
        answers: Vec<String>,
        confirms: Vec<bool>,
        pub messages: Vec<String>,
    }

    impl ScriptedPrompter {
        pub fn new(answers: &[&str], confirms: &[bool]) -> Self {
            Self {
                answers: answers.iter().rev().map(|s| s.to_string()).collect(),
                confirms: confirms.iter().rev().copied().collect(),
                messages: Vec::new(),
            }
        }
    }

    impl Prompter for ScriptedPrompter {
        fn input(&mut self, message: &str) -> io::Result<String> {
            self.messages.push(message.to_string());
            Ok(self.answers.pop().unwrap_or_default())
        }

        fn secret(&mut self, message: &str) -> io::Result<String> {
            self.input(message)
        }

        fn confirm(&mut self, message: &str, default: bool) -> io::Result<bool> {
            self.messages.push(message.to_string());
            Ok(self.confirms.pop().unwrap_or(default))
        }
    }

    #[test]
    fn argument_wins_over_everything() {
        let mut prompter = ScriptedPrompter::new(&["from-prompt"], &[]);
        let resolution = temp_env::with_var("MCPO_TEST_REGION", Some("from-env"), || {
            resolve_value(
                &ValueSpec::new("region")
                    .argument(Some("from-arg".into()))
                    .env("MCPO_TEST_REGION")
                    .prompt("Region")
                    .default("from-default"),
                &mut prompter,
            )
        })
        .unwrap();

        assert_eq!(
            resolution,
            Resolution::Found {
                value: "from-arg".into(),
                source: ValueSource::Argument
            }
        );
        assert!(prompter.messages.is_empty(), "must not prompt");
    }

    #[test]
    fn environment_wins_over_prompt_and_default() {
        let mut prompter = ScriptedPrompter::new(&[], &[]);
        let resolution = temp_env::with_var("MCPO_TEST_KEY", Some("sekrit"), || {
            resolve_value(
                &ValueSpec::new("key")
                    .env("MCPO_TEST_KEY")
                    .prompt("Key")
                    .default("nope"),
                &mut prompter,
            )
        })
        .unwrap();

        assert_eq!(
            resolution,
            Resolution::Found {
                value: "sekrit".into(),
                source: ValueSource::Environment
            }
        );
    }

    #[test]
    fn empty_environment_value_falls_through() {
        let mut prompter = ScriptedPrompter::new(&[], &[]);
        let resolution = temp_env::with_var("MCPO_TEST_EMPTY", Some(""), || {
            resolve_value(
                &ValueSpec::new("key").env("MCPO_TEST_EMPTY").default("dflt"),
                &mut prompter,
            )
        })
        .unwrap();

        assert_eq!(
            resolution,
            Resolution::Found {
                value: "dflt".into(),
                source: ValueSource::Default
            }
        );
    }

    #[test]
    fn empty_prompt_answer_falls_back_to_default() {
        let mut prompter = ScriptedPrompter::new(&[""], &[]);
        let resolution = resolve_value(
            &ValueSpec::new("tag").prompt("Version tag").default("latest"),
            &mut prompter,
        )
        .unwrap();

        assert_eq!(
            resolution,
            Resolution::Found {
                value: "latest".into(),
                source: ValueSource::Default
            }
        );
    }

    #[test]
    fn missing_without_default_is_tagged_missing() {
        let mut prompter = ScriptedPrompter::new(&[""], &[]);
        let resolution = resolve_value(
            &ValueSpec::new("username").prompt("Username"),
            &mut prompter,
        )
        .unwrap();
        assert_eq!(resolution, Resolution::Missing);
        assert!(resolution.required("username").is_err());
    }

    #[test]
    fn deploy_config_uses_fixed_defaults() {
        let mut prompter = ScriptedPrompter::new(&[""], &[true]);
        let config = temp_env::with_var(defaults::SECRET_ENV, None::<&str>, || {
            DeployConfig::resolve(DeployArgs::default(), &mut prompter)
        })
        .unwrap();

        assert_eq!(config.resource_group, "mcpo-rg");
        assert_eq!(config.registry, "mcpoacr");
        assert_eq!(config.container_name, "mcpo");
        assert_eq!(config.location, "eastus");
        assert_eq!(config.dns_label, "mcpo-app");
        assert_eq!(config.image.to_string(), "mcpo:latest");
        assert_eq!(config.tavily_api_key, None);
        assert_eq!(config.expected_fqdn(), "mcpo-app.eastus.azurecontainer.io");
    }

    #[test]
    fn deploy_config_reads_secret_from_environment() {
        let mut prompter = ScriptedPrompter::new(&[], &[]);
        let config = temp_env::with_var(defaults::SECRET_ENV, Some("tvly-123"), || {
            DeployConfig::resolve(DeployArgs::default(), &mut prompter)
        })
        .unwrap();

        assert_eq!(config.tavily_api_key.as_deref(), Some("tvly-123"));
        assert!(prompter.messages.is_empty());
    }

    #[test]
    fn declined_secret_is_a_configuration_error() {
        let mut prompter = ScriptedPrompter::new(&[""], &[false]);
        let result = temp_env::with_var(defaults::SECRET_ENV, None::<&str>, || {
            DeployConfig::resolve(DeployArgs::default(), &mut prompter)
        });

        assert!(matches!(result, Err(PipelineError::Configuration(_))));
    }

    #[test]
    fn publish_config_defaults_tag_to_latest() {
        let mut prompter = ScriptedPrompter::new(&["acme", ""], &[]);
        let config = PublishConfig::resolve(PublishArgs::default(), &mut prompter).unwrap();
        assert_eq!(config.username, "acme");
        assert_eq!(config.image.to_string(), "acme/mcpo:latest");
    }

    #[test]
    fn publish_config_requires_a_username() {
        let mut prompter = ScriptedPrompter::new(&[""], &[]);
        let result = PublishConfig::resolve(PublishArgs::default(), &mut prompter);
        assert!(matches!(result, Err(PipelineError::Configuration(_))));
    }
}
