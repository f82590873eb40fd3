use crate::application::ports::connectivity::LivenessProbe;
use crate::shared::error::{AppError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use tracing::debug;

/// HEAD probe against the server's liveness endpoint. The request timeout is
/// the probe's cancellation mechanism; an ambiguous result reads as offline.
pub struct HttpLivenessProbe {
    client: reqwest::Client,
    ping_url: String,
}

impl HttpLivenessProbe {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build probe client: {e}")))?;

        Ok(Self {
            client,
            ping_url: format!("{}/api/ping", base_url.trim_end_matches('/')),
        })
    }
}

#[async_trait]
impl LivenessProbe for HttpLivenessProbe {
    async fn ping(&self) -> bool {
        // Cache-busting parameter so intermediaries cannot answer for the server.
        let bust = Utc::now().timestamp_millis().to_string();
        match self
            .client
            .head(&self.ping_url)
            .query(&[("_", bust.as_str())])
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("Connectivity probe failed: {e}");
                false
            }
        }
    }
}
