//! Container runtime error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("docker not found. Please install Docker: https://docs.docker.com/get-docker/")]
    DockerNotFound,

    #[error("docker daemon is not reachable: {0}")]
    DaemonUnavailable(String),

    #[error("docker build failed: {0}")]
    BuildFailed(String),

    #[error("docker push failed: {0}")]
    PushFailed(String),

    #[error("docker command failed: {0}")]
    CommandFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ContainerError>;
