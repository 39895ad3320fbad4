//! GoPlus Security API Client
//!
//! Token audits, malicious-address reputation and the phishing-site
//! database. GoPlus reports most booleans as "0"/"1" strings and taxes as
//! decimal fractions; everything is normalized here so scanners never see
//! the raw wire format.
//!
//! API: https://api.gopluslabs.io/api/v1
//! Free tier, no API key required

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, warn};

use super::{GoPlusApi, Signal};
use crate::utils::constants::{goplus_chain_segment, USER_AGENT};

// ============================================
// Normalized results
// ============================================

/// Token-security audit, normalized. Every field optional: GoPlus omits
/// fields it has no data for, and absence must not read as a red flag.
#[derive(Debug, Clone, Default)]
pub struct TokenSecurity {
    pub is_honeypot: Option<bool>,
    pub is_open_source: Option<bool>,
    pub is_mintable: Option<bool>,
    pub buy_tax_percent: Option<f64>,
    pub sell_tax_percent: Option<f64>,
    pub hidden_owner: Option<bool>,
    pub is_proxy: Option<bool>,
    pub can_self_destruct: Option<bool>,
    pub is_blacklisted: Option<bool>,
    pub transfer_pausable: Option<bool>,
    pub slippage_modifiable: Option<bool>,
    pub owner_address: Option<String>,
    pub holder_count: Option<u64>,
}

/// Solana token-security audit (subset relevant to mint risk).
#[derive(Debug, Clone, Default)]
pub struct SolanaTokenSecurity {
    pub is_mintable: Option<bool>,
    pub freezable: Option<bool>,
    pub holder_count: Option<u64>,
}

/// Malicious-address reputation: the set of raised flag names.
#[derive(Debug, Clone, Default)]
pub struct AddressSecurity {
    pub flags: Vec<String>,
}

/// Phishing-database verdict for a URL.
#[derive(Debug, Clone)]
pub struct PhishingCheck {
    pub is_phishing: bool,
}

// ============================================
// Wire types
// ============================================

#[derive(Debug, Deserialize)]
struct GoPlusEnvelope<T> {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    result: Option<T>,
}

#[derive(Debug, Deserialize, Default)]
struct RawTokenSecurity {
    is_honeypot: Option<String>,
    is_open_source: Option<String>,
    is_mintable: Option<String>,
    buy_tax: Option<String>,
    sell_tax: Option<String>,
    hidden_owner: Option<String>,
    is_proxy: Option<String>,
    selfdestruct: Option<String>,
    is_blacklisted: Option<String>,
    transfer_pausable: Option<String>,
    slippage_modifiable: Option<String>,
    owner_address: Option<String>,
    holder_count: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawStatusFlag {
    status: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawSolanaSecurity {
    mintable: Option<RawStatusFlag>,
    freezable: Option<RawStatusFlag>,
    holder_count: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct RawPhishing {
    #[serde(default)]
    phishing_site: Option<i64>,
}

/// "1" → true, anything else present → false, absent → unknown
fn flag(raw: &Option<String>) -> Option<bool> {
    raw.as_deref().map(|v| v == "1")
}

/// GoPlus taxes are fractions ("0.05" = 5%)
fn tax_percent(raw: &Option<String>) -> Option<f64> {
    raw.as_deref()
        .and_then(|v| v.parse::<f64>().ok())
        .map(|f| f * 100.0)
}

fn count(raw: &Option<String>) -> Option<u64> {
    raw.as_deref().and_then(|v| v.parse().ok())
}

impl From<RawTokenSecurity> for TokenSecurity {
    fn from(raw: RawTokenSecurity) -> Self {
        Self {
            is_honeypot: flag(&raw.is_honeypot),
            is_open_source: flag(&raw.is_open_source),
            is_mintable: flag(&raw.is_mintable),
            buy_tax_percent: tax_percent(&raw.buy_tax),
            sell_tax_percent: tax_percent(&raw.sell_tax),
            hidden_owner: flag(&raw.hidden_owner),
            is_proxy: flag(&raw.is_proxy),
            can_self_destruct: flag(&raw.selfdestruct),
            is_blacklisted: flag(&raw.is_blacklisted),
            transfer_pausable: flag(&raw.transfer_pausable),
            slippage_modifiable: flag(&raw.slippage_modifiable),
            owner_address: raw.owner_address.filter(|s| !s.is_empty()),
            holder_count: count(&raw.holder_count),
        }
    }
}

// ============================================
// Client
// ============================================

/// GoPlus HTTP client
pub struct GoPlusClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl GoPlusClient {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: "https://api.gopluslabs.io/api/v1".to_string(),
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

    async fn get_envelope<T: DeserializeOwned + Default>(&self, url: &str) -> Result<T, String> {
        let response = self
            .client
            .get(url)
            .header("User-Agent", USER_AGENT)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| format!("GoPlus request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("GoPlus API error: {}", response.status()));
        }

        let envelope: GoPlusEnvelope<T> = response
            .json()
            .await
            .map_err(|e| format!("GoPlus response unparseable: {}", e))?;

        // GoPlus uses code 1 for success; some endpoints omit it
        if let Some(code) = envelope.code {
            if code != 1 && code != 0 {
                return Err(format!("GoPlus returned code {}", code));
            }
        }
        envelope.result.ok_or_else(|| "GoPlus returned an empty result".to_string())
    }
}

#[async_trait]
impl GoPlusApi for GoPlusClient {
    async fn token_security(&self, chain_id: u64, address: &str) -> Signal<TokenSecurity> {
        let Some(chain) = goplus_chain_segment(chain_id) else {
            return Signal::Unavailable(format!("GoPlus does not cover chain {}", chain_id));
        };
        let url = format!(
            "{}/token_security/{}?contract_addresses={}",
            self.base_url, chain, address
        );
        debug!(chain_id, "GoPlus: token security lookup");

        match self
            .get_envelope::<HashMap<String, RawTokenSecurity>>(&url)
            .await
        {
            Ok(map) => {
                let key = address.to_lowercase();
                match map.into_iter().find(|(k, _)| k.to_lowercase() == key) {
                    Some((_, raw)) => Signal::Ok(raw.into()),
                    None => Signal::Unavailable("GoPlus has no audit for this token".to_string()),
                }
            }
            Err(reason) => {
                warn!("{}", reason);
                Signal::Unavailable(reason)
            }
        }
    }

    async fn solana_token_security(&self, mint: &str) -> Signal<SolanaTokenSecurity> {
        let url = format!(
            "{}/solana/token_security?contract_addresses={}",
            self.base_url, mint
        );
        debug!("GoPlus: solana token security lookup");

        match self
            .get_envelope::<HashMap<String, RawSolanaSecurity>>(&url)
            .await
        {
            Ok(map) => match map.into_iter().find(|(k, _)| k == mint) {
                Some((_, raw)) => Signal::Ok(SolanaTokenSecurity {
                    is_mintable: raw.mintable.as_ref().and_then(|f| flag(&f.status)),
                    freezable: raw.freezable.as_ref().and_then(|f| flag(&f.status)),
                    holder_count: count(&raw.holder_count),
                }),
                None => Signal::Unavailable("GoPlus has no audit for this mint".to_string()),
            },
            Err(reason) => {
                warn!("{}", reason);
                Signal::Unavailable(reason)
            }
        }
    }

    /// Cross-chain malicious-address flags. GoPlus aggregates reputation
    /// for a bare address, so one call covers the supported EVM set.
    async fn address_security(&self, address: &str) -> Signal<AddressSecurity> {
        let url = format!("{}/address_security/{}", self.base_url, address);
        debug!("GoPlus: address security lookup");

        match self
            .get_envelope::<HashMap<String, serde_json::Value>>(&url)
            .await
        {
            Ok(map) => {
                let mut flags: Vec<String> = map
                    .into_iter()
                    .filter(|(_, v)| {
                        v.as_str().map(|s| s == "1").unwrap_or(false)
                            || v.as_i64().map(|n| n == 1).unwrap_or(false)
                    })
                    .map(|(k, _)| k)
                    .filter(|k| k != "data_source" && k != "contract_address")
                    .collect();
                flags.sort();
                Signal::Ok(AddressSecurity { flags })
            }
            Err(reason) => {
                warn!("{}", reason);
                Signal::Unavailable(reason)
            }
        }
    }

    async fn phishing_site(&self, url_to_check: &str) -> Signal<PhishingCheck> {
        let url = format!(
            "{}/phishing_site?url={}",
            self.base_url,
            urlencode(url_to_check)
        );
        debug!("GoPlus: phishing site lookup");

        match self.get_envelope::<RawPhishing>(&url).await {
            Ok(raw) => Signal::Ok(PhishingCheck {
                is_phishing: raw.phishing_site == Some(1),
            }),
            Err(reason) => {
                warn!("{}", reason);
                Signal::Unavailable(reason)
            }
        }
    }
}

/// Minimal percent-encoding for a URL passed as a query value.
fn urlencode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_parsing() {
        assert_eq!(flag(&Some("1".to_string())), Some(true));
        assert_eq!(flag(&Some("0".to_string())), Some(false));
        assert_eq!(flag(&None), None);
    }

    #[test]
    fn test_tax_is_fraction_to_percent() {
        assert_eq!(tax_percent(&Some("0.05".to_string())), Some(5.0));
        assert_eq!(tax_percent(&Some("garbage".to_string())), None);
    }

    #[test]
    fn test_token_security_normalization() {
        let raw = RawTokenSecurity {
            is_honeypot: Some("1".to_string()),
            buy_tax: Some("0.1".to_string()),
            holder_count: Some("4210".to_string()),
            owner_address: Some(String::new()),
            ..Default::default()
        };
        let sec: TokenSecurity = raw.into();
        assert_eq!(sec.is_honeypot, Some(true));
        assert_eq!(sec.buy_tax_percent, Some(10.0));
        assert_eq!(sec.holder_count, Some(4210));
        // Empty owner address normalizes to unknown
        assert!(sec.owner_address.is_none());
        // Absent fields stay unknown, never default to a verdict
        assert!(sec.is_blacklisted.is_none());
    }
}
