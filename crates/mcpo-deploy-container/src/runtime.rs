//! Container runtime trait definition

use std::path::Path;

use async_trait::async_trait;
use mcpo_deploy_core::ImageRef;

use crate::error::Result;

/// The image operations the publish pipeline depends on.
///
/// Implemented by [`crate::DockerCli`]; tests supply a fake.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Check that the runtime is installed and its daemon is reachable.
    async fn check_available(&self) -> Result<()>;

    /// Build an image from the given context directory.
    async fn build(&self, image: &ImageRef, context: &Path, platform: Option<&str>)
    -> Result<()>;

    /// Apply an additional tag to an existing local image.
    async fn tag(&self, source: &ImageRef, target: &ImageRef) -> Result<()>;

    /// Push an image to its registry.
    async fn push(&self, image: &ImageRef) -> Result<()>;

    /// Size of a local image in bytes, when the runtime reports one.
    async fn image_size(&self, image: &ImageRef) -> Result<Option<u64>>;
}
