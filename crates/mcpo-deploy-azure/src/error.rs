//! Azure backend error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AzureError {
    #[error(
        "az CLI not found. Please install: https://learn.microsoft.com/cli/azure/install-azure-cli"
    )]
    AzNotFound,

    #[error("not logged in to Azure. Run: az login")]
    NotLoggedIn,

    #[error("az command failed: {0}")]
    CommandFailed(String),

    #[error("remote image build failed: {0}")]
    BuildFailed(String),

    #[error("unexpected az output: {0}")]
    Parse(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AzureError>;
