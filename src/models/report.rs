//! Report Model
//!
//! The normalized output of every scan: a `SafetyReport` with an ordered
//! findings list, a score breakdown and one type-tagged metadata variant.
//! The metadata union is keyed by input type so a wallet report can never
//! carry token fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What the classifier decided the input is. Exactly one per scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InputType {
    Url,
    Token,
    TxHash,
    Wallet,
    BtcWallet,
    SolanaToken,
    Ens,
    InvalidAddress,
    Unknown,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Token => "token",
            Self::TxHash => "txHash",
            Self::Wallet => "wallet",
            Self::BtcWallet => "btcWallet",
            Self::SolanaToken => "solanaToken",
            Self::Ens => "ens",
            Self::InvalidAddress => "invalidAddress",
            Self::Unknown => "unknown",
        }
    }
}

/// Finding severity, ordered from least to most concerning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Danger,
}

/// A single observation contributed by a scanner.
///
/// Order is significant: the first finding conventionally carries
/// resolution/classification context, later findings are scanner-specific.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub message: String,
    pub severity: Severity,
    /// Exact score contribution, replacing the severity weight when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_override: Option<i64>,
}

impl Finding {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
            score_override: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn low(message: impl Into<String>) -> Self {
        Self::new(Severity::Low, message)
    }

    pub fn medium(message: impl Into<String>) -> Self {
        Self::new(Severity::Medium, message)
    }

    pub fn high(message: impl Into<String>) -> Self {
        Self::new(Severity::High, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(Severity::Danger, message)
    }

    pub fn with_override(mut self, score: i64) -> Self {
        self.score_override = Some(score);
        self
    }
}

/// Final risk band. Bands come from the clamped score; danger findings can
/// only push the level up, never down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Safe,
    Suspicious,
    Dangerous,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Safe => "SAFE",
            Self::Suspicious => "SUSPICIOUS",
            Self::Dangerous => "DANGEROUS",
        }
    }
}

/// How much the report can be trusted, driven by how many signal sources
/// actually answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

/// Audit trail of how the final score was built. Impacts sum to the
/// pre-clamp score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdownItem {
    pub label: String,
    pub score_impact: i64,
}

/// One entry of the checks-performed checklist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckItem {
    pub label: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl CheckItem {
    pub fn passed(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            passed: true,
            detail: None,
        }
    }

    pub fn failed(label: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            passed: false,
            detail: Some(detail.into()),
        }
    }
}

// ============================================
// Metadata variants (tagged by input type)
// ============================================

/// Every field is optional: any signal source may be unavailable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquidity_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_24h_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fdv_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_change_24h: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair_age_days: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dex_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_honeypot: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_open_source: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_mintable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buy_tax_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sell_tax_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hidden_owner: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_proxy: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub can_self_destruct: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_blacklisted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transfer_pausable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slippage_modifiable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourcify_verified: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub https: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reachable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_count: Option<u32>,
    /// One of "timeout" | "dns" | "blocked" | "unknown"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flagged_phishing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blacklisted: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub likely_chain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_chains: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_urls: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    /// "evm" | "bitcoin"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    /// "valid" | "valid-no-checksum" | "bad-checksum" | "malformed"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub go_plus_flags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_flagged: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_urls: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolanaMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liquidity_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_24h_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_usd: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair_age_days: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dex_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pair_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_mintable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freezable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explorer_url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ens_name: Option<String>,
    /// "resolved" | "failed"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_error: Option<String>,
    /// Wallet metadata of the resolved address, verbatim from the
    /// delegated wallet scan.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wallet: Option<WalletMetadata>,
}

/// Closed metadata union, tagged so the variant is checkable at the type
/// level and self-describing on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ReportMetadata {
    Url(UrlMetadata),
    Token(TokenMetadata),
    Tx(TxMetadata),
    Wallet(WalletMetadata),
    Solana(SolanaMetadata),
    Ens(EnsMetadata),
}

// ============================================
// SafetyReport
// ============================================

/// The normalized scan result returned to the caller. Created fresh per
/// request, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyReport {
    pub input_type: InputType,
    /// Original input exactly as submitted (whitespace preserved).
    pub input_value: String,
    /// Clamped to [0, 100].
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub confidence: Confidence,
    pub confidence_reason: String,
    pub summary: String,
    pub findings: Vec<Finding>,
    pub recommendations: Vec<String>,
    pub score_breakdown: Vec<ScoreBreakdownItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks_performed: Option<Vec<CheckItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ReportMetadata>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Low);
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Danger);
    }

    #[test]
    fn test_metadata_is_tagged() {
        let meta = ReportMetadata::Wallet(WalletMetadata {
            address: Some("0xabc".into()),
            ..Default::default()
        });
        let json = serde_json::to_value(&meta).unwrap();
        assert_eq!(json["kind"], "wallet");
        assert_eq!(json["address"], "0xabc");
    }

    #[test]
    fn test_input_type_serializes_camel_case() {
        let json = serde_json::to_value(InputType::BtcWallet).unwrap();
        assert_eq!(json, "btcWallet");
        let json = serde_json::to_value(InputType::InvalidAddress).unwrap();
        assert_eq!(json, "invalidAddress");
    }

    #[test]
    fn test_finding_override_skipped_when_absent() {
        let json = serde_json::to_value(Finding::low("no checksum")).unwrap();
        assert!(json.get("scoreOverride").is_none());
        let json = serde_json::to_value(Finding::info("resolves").with_override(0)).unwrap();
        assert_eq!(json["scoreOverride"], 0);
    }
}
