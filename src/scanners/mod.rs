//! Scanners Module - per-type scan pipelines
//!
//! The `Scanner` owns the signal clients and the threshold config, and
//! dispatches a classified input to the matching pipeline. Every pipeline
//! collects findings plus a tally of which sources answered, then hands
//! both to the scoring engine. A scan never fails: upstream trouble
//! degrades confidence instead.

pub mod ens;
pub mod token;
pub mod txhash;
pub mod url;
pub mod wallet;

use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::config::ScanConfig;
use crate::core::score::{assess, SourceTally};
use crate::core::classifier::classify;
use crate::models::{CheckItem, Finding, InputType, ReportMetadata, SafetyReport};
use crate::providers::{
    DexScreenerApi, DexScreenerClient, EnsClient, EnsResolve, GoPlusApi, GoPlusClient,
    SourcifyApi, SourcifyClient, SsrfSafeResolver, UrlResolve,
};

/// Optional caller-supplied refinement: an EVM address is scanned as a
/// wallet unless the caller asks for a token-centric scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeHint {
    Token,
}

impl TypeHint {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "token" => Some(Self::Token),
            _ => None,
        }
    }
}

/// Scan orchestrator: classification, dispatch, aggregation.
pub struct Scanner {
    pub(crate) config: Arc<ScanConfig>,
    pub(crate) ens: Arc<dyn EnsResolve>,
    pub(crate) goplus: Arc<dyn GoPlusApi>,
    pub(crate) dexscreener: Arc<dyn DexScreenerApi>,
    pub(crate) sourcify: Arc<dyn SourcifyApi>,
    pub(crate) resolver: Arc<dyn UrlResolve>,
}

impl Scanner {
    pub fn new(
        config: Arc<ScanConfig>,
        ens: Arc<dyn EnsResolve>,
        goplus: Arc<dyn GoPlusApi>,
        dexscreener: Arc<dyn DexScreenerApi>,
        sourcify: Arc<dyn SourcifyApi>,
        resolver: Arc<dyn UrlResolve>,
    ) -> Self {
        Self {
            config,
            ens,
            goplus,
            dexscreener,
            sourcify,
            resolver,
        }
    }

    /// Wire up the production signal clients.
    pub fn with_default_clients(config: Arc<ScanConfig>) -> Self {
        let timeout = config.upstream_timeout;
        let resolver = SsrfSafeResolver::new(config.max_redirects, timeout);
        Self::new(
            config,
            Arc::new(EnsClient::new(timeout)),
            Arc::new(GoPlusClient::new(timeout)),
            Arc::new(DexScreenerClient::new(timeout)),
            Arc::new(SourcifyClient::new(timeout)),
            Arc::new(resolver),
        )
    }

    /// Run one scan. Classification trims internally; `raw` is preserved
    /// verbatim as the report's `inputValue`.
    pub async fn scan(&self, raw: &str, hint: Option<TypeHint>) -> SafetyReport {
        let mut input_type = classify(raw);
        if hint == Some(TypeHint::Token) && input_type == InputType::Wallet {
            input_type = InputType::Token;
        }
        info!(input_type = input_type.as_str(), "scan dispatched");

        match input_type {
            InputType::Url => self.scan_url(raw).await,
            InputType::Token => self.scan_token(raw).await,
            InputType::SolanaToken => self.scan_solana_token(raw).await,
            InputType::Wallet => self.scan_wallet(raw).await,
            InputType::BtcWallet => self.scan_btc_wallet(raw).await,
            InputType::TxHash => self.scan_txhash(raw),
            InputType::Ens => self.scan_ens(raw).await,
            InputType::InvalidAddress => self.report_invalid(raw),
            InputType::Unknown => self.report_unknown(raw),
        }
    }

    /// Assemble the final report from a pipeline's output.
    pub(crate) fn finish(
        &self,
        input_type: InputType,
        raw: &str,
        findings: Vec<Finding>,
        tally: SourceTally,
        metadata: Option<ReportMetadata>,
        checks: Option<Vec<CheckItem>>,
        next_step: Option<String>,
    ) -> SafetyReport {
        let assessment = assess(input_type, &findings, &tally);
        SafetyReport {
            input_type,
            input_value: raw.to_string(),
            risk_score: assessment.risk_score,
            risk_level: assessment.risk_level,
            confidence: assessment.confidence,
            confidence_reason: assessment.confidence_reason,
            summary: assessment.summary,
            findings,
            recommendations: assessment.recommendations,
            score_breakdown: assessment.score_breakdown,
            next_step,
            checks_performed: checks,
            metadata,
            timestamp: Utc::now(),
        }
    }

    /// Address-shaped input that failed structural checks.
    fn report_invalid(&self, raw: &str) -> SafetyReport {
        let findings = vec![Finding::high(
            "Input resembles a crypto address but fails structural validation; it may be mistyped or deliberately malformed",
        )];
        self.finish(
            InputType::InvalidAddress,
            raw,
            findings,
            SourceTally::new(),
            None,
            None,
            Some("Re-copy the address from the original source and scan again.".to_string()),
        )
    }

    /// Input that matched no known format. Not an error: the report just
    /// carries guidance.
    fn report_unknown(&self, raw: &str) -> SafetyReport {
        let findings = vec![Finding::info(
            "Input did not match any known format (URL, address, transaction hash or ENS name)",
        )
        .with_override(0)];
        self.finish(
            InputType::Unknown,
            raw,
            findings,
            SourceTally::new(),
            None,
            None,
            Some(
                "Paste a URL, a wallet or token address, a transaction hash, or an ENS name."
                    .to_string(),
            ),
        )
    }
}


#[cfg(test)]
mod tests {
    use super::testutil::MockSet;
    use super::*;

    #[tokio::test]
    async fn test_unknown_input_still_produces_report() {
        let mocks = MockSet::default();
        let scanner = mocks.scanner();
        let report = scanner.scan("definitely not an address", None).await;
        assert_eq!(report.input_type, InputType::Unknown);
        assert_eq!(report.risk_score, 0);
        assert!(report.next_step.is_some());
    }

    #[tokio::test]
    async fn test_invalid_address_report() {
        let mocks = MockSet::default();
        let scanner = mocks.scanner();
        let report = scanner
            .scan("0xdAC17F958D2ee523a2206206994597C13D831e", None)
            .await;
        assert_eq!(report.input_type, InputType::InvalidAddress);
        assert_ne!(report.risk_score, 0);
    }

    #[tokio::test]
    async fn test_token_hint_retargets_evm_address() {
        let mocks = MockSet::default();
        let scanner = mocks.scanner();
        let report = scanner
            .scan(
                "0xdAC17F958D2ee523a2206206994597C13D831ec7",
                Some(TypeHint::Token),
            )
            .await;
        assert_eq!(report.input_type, InputType::Token);
    }

    #[tokio::test]
    async fn test_input_value_preserved_verbatim() {
        let mocks = MockSet::default();
        let scanner = mocks.scanner();
        let raw = "  0xdAC17F958D2ee523a2206206994597C13D831ec7  ";
        let report = scanner.scan(raw, None).await;
        assert_eq!(report.input_value, raw);
    }
}
