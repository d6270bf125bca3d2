//! HTTP smoke probe.
//!
//! A single GET against the deployed service's docs page. Informational
//! only; the pipeline never aborts on a failed probe.

use std::time::Duration;

use async_trait::async_trait;

#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// `true` when the endpoint answered with a success status.
    async fn probe(&self, url: &str) -> bool;
}

/// Probe using a real HTTP client.
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HealthProbe for HttpProbe {
    async fn probe(&self, url: &str) -> bool {
        match self.client.get(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("smoke probe against {} failed: {}", url, e);
                false
            }
        }
    }
}
