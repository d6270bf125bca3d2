//! Container image references.

use std::fmt;
use std::str::FromStr;

use crate::error::PipelineError;

/// A `repository:tag` image reference.
///
/// The repository part may carry a namespace (`acme/mcpo`) or a registry
/// host (`mcpoacr.azurecr.io/mcpo`); this type does not distinguish them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub repository: String,
    pub tag: String,
}

impl ImageRef {
    pub fn new(repository: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            tag: tag.into(),
        }
    }

    /// The same repository with a different tag.
    pub fn with_tag(&self, tag: impl Into<String>) -> Self {
        Self {
            repository: self.repository.clone(),
            tag: tag.into(),
        }
    }

    /// The same image qualified with a registry login server prefix.
    pub fn qualified(&self, login_server: &str) -> Self {
        Self {
            repository: format!("{}/{}", login_server, self.repository),
            tag: self.tag.clone(),
        }
    }

    pub fn is_latest(&self) -> bool {
        self.tag == "latest"
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.repository, self.tag)
    }
}

impl FromStr for ImageRef {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (repository, tag) = match s.rsplit_once(':') {
            // A colon inside a registry host (localhost:5000/mcpo) is not a tag
            Some((repo, tag)) if !tag.contains('/') => (repo, tag),
            _ => (s, "latest"),
        };

        if repository.is_empty() {
            return Err(PipelineError::Configuration(format!(
                "invalid image reference '{}'",
                s
            )));
        }

        Ok(Self::new(repository, tag))
    }
}
