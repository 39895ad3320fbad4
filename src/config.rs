//! Configuration module for SentinelScan
//!
//! Every tunable threshold the scanners consult lives here, read from
//! environment variables with sensible defaults at startup. Scanner bodies
//! never hardcode threshold values.

use std::collections::HashSet;
use std::time::Duration;

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

fn env_csv(key: &str, defaults: &[&str]) -> HashSet<String> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect(),
        _ => defaults.iter().map(|s| s.to_string()).collect(),
    }
}

/// Scan thresholds and static signal lists.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    // ============================================
    // Token thresholds
    // ============================================
    /// Liquidity below this raises a low-liquidity finding (USD)
    pub min_liquidity_usd: f64,
    /// FDV / liquidity above this raises a finding
    pub max_fdv_liquidity_ratio: f64,
    /// Buy or sell tax above this raises a finding (percent)
    pub max_tax_percent: f64,
    /// Pairs younger than this raise a new-pair finding (days)
    pub new_pair_age_days: f64,

    // ============================================
    // URL heuristics
    // ============================================
    /// TLDs with a disproportionate share of abuse
    pub suspicious_tlds: HashSet<String>,
    /// Keywords common in wallet-drainer and phishing hostnames
    pub scam_keywords: HashSet<String>,
    /// Regulator/blacklist domain set, matched against the host
    pub blocklist_domains: HashSet<String>,
    /// Hostnames with more labels than this look like subdomain spoofing
    pub max_subdomain_depth: usize,

    // ============================================
    // Network
    // ============================================
    /// Maximum redirect hops the resolver will follow
    pub max_redirects: u32,
    /// Per-call timeout for upstream signal sources and resolver hops
    pub upstream_timeout: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            min_liquidity_usd: env_f64("SENTINEL_MIN_LIQUIDITY_USD", 10_000.0),
            max_fdv_liquidity_ratio: env_f64("SENTINEL_MAX_FDV_LIQ_RATIO", 100.0),
            max_tax_percent: env_f64("SENTINEL_MAX_TAX_PERCENT", 10.0),
            new_pair_age_days: env_f64("SENTINEL_NEW_PAIR_AGE_DAYS", 7.0),
            suspicious_tlds: env_csv(
                "SENTINEL_SUSPICIOUS_TLDS",
                &[
                    "zip", "mov", "xyz", "top", "gq", "tk", "ml", "cf", "ga", "icu", "work",
                    "click", "loan", "link", "buzz", "rest", "fit", "cam",
                ],
            ),
            scam_keywords: env_csv(
                "SENTINEL_SCAM_KEYWORDS",
                &[
                    "airdrop",
                    "claim",
                    "giveaway",
                    "free-mint",
                    "freemint",
                    "walletconnect",
                    "wallet-connect",
                    "wallet-validate",
                    "metamask-login",
                    "seedphrase",
                    "seed-phrase",
                    "verify-wallet",
                    "restore-wallet",
                    "revoke-access",
                ],
            ),
            blocklist_domains: env_csv("SENTINEL_BLOCKLIST_DOMAINS", &[]),
            max_subdomain_depth: env_usize("SENTINEL_MAX_SUBDOMAIN_DEPTH", 3),
            max_redirects: env_u64("SENTINEL_MAX_REDIRECTS", 5) as u32,
            upstream_timeout: Duration::from_secs(env_u64("SENTINEL_UPSTREAM_TIMEOUT_SECS", 8)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ScanConfig::default();
        assert!(cfg.min_liquidity_usd > 0.0);
        assert!(cfg.suspicious_tlds.contains("zip"));
        assert!(cfg.scam_keywords.contains("airdrop"));
        assert!(cfg.blocklist_domains.is_empty());
        assert_eq!(cfg.max_redirects, 5);
    }
}
