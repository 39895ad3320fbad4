//! ENS Resolver Client
//!
//! Resolves an ENS name to its registered address. Resolution failure is a
//! normal outcome (unregistered or expired names), reported verbatim so
//! the ENS scanner can quote it.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::EnsResolve;
use crate::utils::constants::USER_AGENT;

/// Resolver outcome: exactly one of `address` / `error` is set.
#[derive(Debug, Clone)]
pub struct EnsResolution {
    pub address: Option<String>,
    pub error: Option<String>,
}

impl EnsResolution {
    pub fn resolved(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            address: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ResolveResponse {
    #[serde(default)]
    address: Option<String>,
}

/// ENS HTTP resolver client
pub struct EnsClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl EnsClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "https://api.ensideas.com/ens/resolve".to_string(),
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
impl EnsResolve for EnsClient {
    async fn resolve(&self, name: &str) -> EnsResolution {
        let url = format!("{}/{}", self.base_url, name);
        debug!("ENS: resolving name");

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
                warn!("ENS resolver request failed: {}", e);
                return EnsResolution::failed(format!("resolver unreachable: {}", e));
            }
        };

        if !response.status().is_success() {
            return EnsResolution::failed(format!("resolver returned {}", response.status()));
        }

        match response.json::<ResolveResponse>().await {
            Ok(body) => match body.address.filter(|a| !a.is_empty() && a != "0x0000000000000000000000000000000000000000") {
                Some(address) => EnsResolution::resolved(address),
                None => EnsResolution::failed("name is not registered or has no address record"),
            },
            Err(e) => EnsResolution::failed(format!("resolver response unparseable: {}", e)),
        }
    }
}
