//! HTTP probe implementation.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{ProbeError, ProbeOutcome, Prober};

/// Single-shot GET prober backed by one shared, pooled client.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    /// Build a prober whose requests are each capped at `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, target: &str) -> ProbeOutcome {
        let response = match self.client.get(target).send().await {
            Ok(response) => response,
            Err(e) => {
                debug!("GET {} failed: {}", target, e);
                return ProbeOutcome::TransportFailure;
            }
        };

        let status_code = response.status().as_u16();

        // Body read failures count as transport failures too
        match response.text().await {
            Ok(body) => ProbeOutcome::Responded {
                status_code,
                body: body.to_lowercase(),
            },
            Err(e) => {
                debug!("Reading body of {} failed: {}", target, e);
                ProbeOutcome::TransportFailure
            }
        }
    }
}
