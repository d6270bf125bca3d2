//! Pipeline error taxonomy.
//!
//! Every stage of the deployment pipeline reports one of these variants.
//! All variants except [`PipelineError::Readiness`] are fatal: the pipeline
//! halts at the failing stage and nothing after it runs. A readiness failure
//! degrades to a warning because the instance may simply still be starting.

use thiserror::Error;

/// Errors raised by the deployment pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A required external tool is missing or not authenticated.
    #[error("{tool} is not available: {hint}")]
    PrerequisiteMissing { tool: String, hint: String },

    /// A required configuration value could not be resolved.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The external build/publish step reported failure.
    #[error("image build failed: {0}")]
    Build(String),

    /// The external instance-creation step reported failure.
    #[error("deployment failed: {0}")]
    Deployment(String),

    /// The instance address/state could not be confirmed in time.
    /// Non-fatal; reported as a warning.
    #[error("readiness check failed: {0}")]
    Readiness(String),

    /// The whole pipeline exceeded its wall-clock budget.
    #[error("pipeline timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Whether this error aborts the pipeline.
    pub const fn is_fatal(&self) -> bool {
        !matches!(self, Self::Readiness(_))
    }

    pub fn prerequisite(tool: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::PrerequisiteMissing {
            tool: tool.into(),
            hint: hint.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readiness_is_the_only_non_fatal_variant() {
        assert!(!PipelineError::Readiness("no fqdn".into()).is_fatal());
        assert!(PipelineError::Configuration("missing".into()).is_fatal());
        assert!(PipelineError::Build("boom".into()).is_fatal());
        assert!(PipelineError::Timeout(900).is_fatal());
        assert!(PipelineError::prerequisite("az", "run az login").is_fatal());
    }

    #[test]
    fn prerequisite_message_names_tool_and_hint() {
        let err = PipelineError::prerequisite("docker", "install Docker Desktop");
        let msg = err.to_string();
        assert!(msg.contains("docker"));
        assert!(msg.contains("install Docker Desktop"));
    }
}
