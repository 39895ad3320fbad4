//! TxHash Scanner
//!
//! Fully static: hex validation, a deterministic chain-detection heuristic
//! and explorer links. A 0x-prefixed 32-byte hash is shared by every EVM
//! network, so the scanner reports a best guess with reduced confidence
//! instead of failing on the ambiguity. No external calls.

use super::Scanner;
use crate::core::score::SourceTally;
use crate::models::{
    CheckItem, Confidence, Finding, InputType, ReportMetadata, SafetyReport, TxMetadata,
};
use crate::utils::constants::{
    explorer_tx_url, get_chain_name, CHAIN_ID_ETHEREUM, SUPPORTED_CHAIN_IDS,
};

impl Scanner {
    pub(crate) fn scan_txhash(&self, raw: &str) -> SafetyReport {
        let trimmed = raw.trim();

        // Classifier guarantees 0x + 64 hex here; the format is common to
        // all EVM networks, so Ethereum is the best guess and the full
        // candidate set is reported alongside.
        let candidates: Vec<String> = SUPPORTED_CHAIN_IDS
            .iter()
            .map(|&id| get_chain_name(id).to_string())
            .collect();

        let findings = vec![
            Finding::info("EVM-family transaction hash detected").with_override(0),
            Finding::info(
                "A transaction hash identifies a past transaction; it cannot itself steal funds",
            )
            .with_override(0),
            Finding::info(
                "If someone sent you this hash as payment proof, verify amount, recipient and token on the explorer rather than trusting a screenshot",
            ),
            Finding::info(
                "If a site asks you to sign an approval referencing this transaction, check the spender address and approval scope before signing",
            )
            .with_override(0),
        ];

        let checks = vec![
            CheckItem::passed("Hash format"),
            CheckItem {
                label: "Chain detection".to_string(),
                passed: true,
                detail: Some(format!(
                    "format shared by {} networks; best guess {}",
                    candidates.len(),
                    get_chain_name(CHAIN_ID_ETHEREUM)
                )),
            },
        ];

        let meta = TxMetadata {
            tx_hash: Some(trimmed.to_string()),
            likely_chain: Some(get_chain_name(CHAIN_ID_ETHEREUM).to_string()),
            candidate_chains: Some(candidates),
            explorer_urls: Some(
                SUPPORTED_CHAIN_IDS
                    .iter()
                    .map(|&id| explorer_tx_url(id, trimmed))
                    .collect(),
            ),
        };

        let mut report = self.finish(
            InputType::TxHash,
            raw,
            findings,
            SourceTally::new(),
            Some(ReportMetadata::Tx(meta)),
            Some(checks),
            Some("Open the transaction on the explorer of the network it belongs to.".to_string()),
        );

        // The hash format alone cannot pin the network.
        report.confidence = Confidence::Medium;
        report.confidence_reason =
            "Chain inferred from hash format alone; the same format is shared by all EVM networks"
                .to_string();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::super::testutil::MockSet;
    use crate::models::{Confidence, InputType, ReportMetadata, RiskLevel};

    const TX: &str = "0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b";

    #[tokio::test]
    async fn test_txhash_static_report() {
        let mocks = MockSet::default();
        let scanner = mocks.scanner();
        let report = scanner.scan(TX, None).await;

        assert_eq!(report.input_type, InputType::TxHash);
        assert_eq!(report.risk_level, RiskLevel::Safe);
        assert_eq!(report.confidence, Confidence::Medium);
        match report.metadata {
            Some(ReportMetadata::Tx(meta)) => {
                assert_eq!(meta.tx_hash.as_deref(), Some(TX));
                assert_eq!(meta.likely_chain.as_deref(), Some("Ethereum"));
                let urls = meta.explorer_urls.unwrap();
                assert_eq!(urls.len(), 7);
                assert!(urls[0].contains("etherscan.io/tx/0x"));
            }
            other => panic!("expected tx metadata, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_txhash_makes_no_network_calls() {
        // All mock sources are "down"; a static scan must not care.
        let mocks = MockSet::default();
        let scanner = mocks.scanner();
        let report = scanner.scan(TX, None).await;
        assert!(!report.confidence_reason.contains("unavailable"));
    }
}
