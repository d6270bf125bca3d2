//! Core primitives for the MCPO deployment orchestrator.
//!
//! This crate owns everything that is not an external-tool call: the
//! deployment configuration and how it is resolved (argument, environment,
//! prompt, default), the pipeline error taxonomy, the linear pipeline stage
//! machine, image references, the readiness wait policy, and the MCPO
//! server-definition file that ships inside the build context.
//!
//! All durable state lives in the external services; nothing here persists
//! beyond a single invocation.

pub mod config;
pub mod error;
pub mod image;
pub mod servers;
pub mod stage;
pub mod wait;

// Re-exports
pub use config::{
    DeployArgs, DeployConfig, Prompter, PublishArgs, PublishConfig, Resolution, ValueSource,
    ValueSpec, defaults, resolve_value,
};
pub use error::{PipelineError, Result};
pub use image::ImageRef;
pub use servers::ServersFileStatus;
pub use stage::PipelineStage;
pub use wait::WaitConfig;
