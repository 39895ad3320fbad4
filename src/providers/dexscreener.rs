//! DexScreener API Client
//!
//! Market-structure signals only: liquidity, volume, FDV, pair age. Never
//! used as a security verdict on its own - thin liquidity or a day-old pair
//! is a warning sign, not proof of a scam.
//!
//! API: https://api.dexscreener.com/latest/dex/tokens/{tokenAddress}
//! Free, no API key required

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{DexScreenerApi, Signal};
use crate::utils::constants::USER_AGENT;

/// DexScreener API response
#[derive(Debug, Deserialize)]
pub struct DexScreenerResponse {
    #[serde(default)]
    pub pairs: Option<Vec<DexPair>>,
}

/// A trading pair as DexScreener returns it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DexPair {
    /// Chain name (e.g., "ethereum", "bsc", "solana")
    pub chain_id: String,
    /// DEX identifier (e.g., "uniswap", "raydium")
    pub dex_id: String,
    pub pair_address: String,
    pub base_token: DexToken,
    pub liquidity: Option<DexLiquidity>,
    pub price_usd: Option<String>,
    pub volume: Option<DexVolume>,
    pub price_change: Option<DexPriceChange>,
    pub fdv: Option<f64>,
    /// Pair creation time, epoch milliseconds
    pub pair_created_at: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DexToken {
    pub address: String,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DexLiquidity {
    pub usd: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DexVolume {
    pub h24: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DexPriceChange {
    pub h24: Option<f64>,
}

/// Normalized pair snapshot handed to the token scanner.
#[derive(Debug, Clone)]
pub struct PairSnapshot {
    pub chain: String,
    pub dex_id: String,
    pub pair_address: String,
    pub base_symbol: Option<String>,
    pub liquidity_usd: Option<f64>,
    pub volume_24h_usd: Option<f64>,
    pub fdv_usd: Option<f64>,
    pub price_usd: Option<String>,
    pub price_change_24h: Option<f64>,
    pub pair_created_at_ms: Option<i64>,
}

impl From<DexPair> for PairSnapshot {
    fn from(pair: DexPair) -> Self {
        Self {
            chain: pair.chain_id,
            dex_id: pair.dex_id,
            pair_address: pair.pair_address,
            base_symbol: pair.base_token.symbol,
            liquidity_usd: pair.liquidity.as_ref().and_then(|l| l.usd),
            volume_24h_usd: pair.volume.as_ref().and_then(|v| v.h24),
            fdv_usd: pair.fdv,
            price_usd: pair.price_usd,
            price_change_24h: pair.price_change.as_ref().and_then(|p| p.h24),
            pair_created_at_ms: pair.pair_created_at,
        }
    }
}

/// DexScreener HTTP client
pub struct DexScreenerClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl DexScreenerClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "https://api.dexscreener.com/latest/dex".to_string(),
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
impl DexScreenerApi for DexScreenerClient {
    /// Fetch all pairs for a token address, sorted by liquidity
    /// (highest first). Unavailability is returned, never raised.
    async fn pairs_for(&self, address: &str) -> Signal<Vec<PairSnapshot>> {
        let url = format!("{}/tokens/{}", self.base_url, address);
        debug!("DexScreener: fetching pairs");

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
                warn!("DexScreener request failed: {}", e);
                return Signal::Unavailable(format!("DexScreener request failed: {}", e));
            }
        };

        if !response.status().is_success() {
            warn!("DexScreener API error: {}", response.status());
            return Signal::Unavailable(format!("DexScreener API error: {}", response.status()));
        }

        let data: DexScreenerResponse = match response.json().await {
            Ok(d) => d,
            Err(e) => {
                return Signal::Unavailable(format!("DexScreener response unparseable: {}", e))
            }
        };

        let mut pairs: Vec<PairSnapshot> = data
            .pairs
            .unwrap_or_default()
            .into_iter()
            .map(PairSnapshot::from)
            .collect();

        pairs.sort_by(|a, b| {
            let liq_a = a.liquidity_usd.unwrap_or(0.0);
            let liq_b = b.liquidity_usd.unwrap_or(0.0);
            liq_b.partial_cmp(&liq_a).unwrap_or(std::cmp::Ordering::Equal)
        });

        debug!("DexScreener: {} pairs", pairs.len());
        Signal::Ok(pairs)
    }
}
