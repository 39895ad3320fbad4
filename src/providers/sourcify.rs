//! Sourcify Verification Client
//!
//! Checks whether a contract's source is verified on Sourcify. A missing
//! verification is a mild signal; an unreachable Sourcify is no signal at
//! all.
//!
//! API: https://sourcify.dev/server/check-by-addresses

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{Signal, SourcifyApi};
use crate::utils::constants::USER_AGENT;

#[derive(Debug, Deserialize)]
struct CheckEntry {
    #[serde(default)]
    status: Option<String>,
}

/// Sourcify HTTP client
pub struct SourcifyClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl SourcifyClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "https://sourcify.dev/server".to_string(),
            timeout,
        }
    }

    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl SourcifyApi for SourcifyClient {
    async fn verification_status(&self, address: &str, chain_id: u64) -> Signal<bool> {
        let url = format!(
            "{}/check-by-addresses?addresses={}&chainIds={}",
            self.base_url, address, chain_id
        );
        debug!(chain_id, "Sourcify: verification lookup");

        let response = match self
            .client
            .get(&url)
            .header("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!("Sourcify request failed: {}", e);
                return Signal::Unavailable(format!("Sourcify request failed: {}", e));
            }
        };

        if !response.status().is_success() {
            return Signal::Unavailable(format!("Sourcify API error: {}", response.status()));
        }

        match response.json::<Vec<CheckEntry>>().await {
            Ok(entries) => {
                let verified = entries.first().and_then(|e| e.status.as_deref()).map(|s| {
                    matches!(s, "perfect" | "partial")
                });
                match verified {
                    Some(v) => Signal::Ok(v),
                    None => Signal::Ok(false),
                }
            }
            Err(e) => Signal::Unavailable(format!("Sourcify response unparseable: {}", e)),
        }
    }
}
