//! Container runtime abstraction for mcpo-deploy.
//!
//! The orchestrator only needs a handful of image operations (build, tag,
//! push, size query) and trusts the runtime's exit status for everything
//! else. [`ContainerRuntime`] is the seam; [`DockerCli`] implements it by
//! shelling out to the `docker` CLI.

pub mod docker;
pub mod error;
pub mod runtime;

pub use docker::{DockerCli, format_size};
pub use error::{ContainerError, Result};
pub use runtime::ContainerRuntime;
