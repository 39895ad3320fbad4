//! Wallet / BTC-Wallet Scanner
//!
//! Structural checksum validation plus GoPlus malicious-address reputation
//! for EVM addresses. A checksum failure is recorded as a finding, keeping
//! "malformed" distinct from "valid but flagged". Bitcoin addresses get
//! checksum validation and static guidance only - no reputation source
//! covers them.

use super::Scanner;
use crate::core::score::SourceTally;
use crate::core::validators::{validate_btc_address, validate_evm_address, BtcChecksum, EvmChecksum};
use crate::models::{
    CheckItem, Finding, InputType, ReportMetadata, SafetyReport, WalletMetadata,
};
use crate::providers::Signal;
use crate::utils::constants::{
    btc_explorer_address_url, explorer_address_url, get_chain_name, SUPPORTED_CHAIN_IDS,
};

impl Scanner {
    pub(crate) async fn scan_wallet(&self, raw: &str) -> SafetyReport {
        let trimmed = raw.trim();
        let (findings, meta, tally, checks) = self.wallet_scan_parts(trimmed).await;
        self.finish(
            InputType::Wallet,
            raw,
            findings,
            tally,
            Some(ReportMetadata::Wallet(meta)),
            Some(checks),
            None,
        )
    }

    /// The wallet pipeline without report assembly, so the ENS scanner can
    /// delegate and splice the output into its own report.
    pub(crate) async fn wallet_scan_parts(
        &self,
        address: &str,
    ) -> (Vec<Finding>, WalletMetadata, SourceTally, Vec<CheckItem>) {
        let mut findings = Vec::new();
        let mut checks = Vec::new();
        let mut tally = SourceTally::new();

        let checksum = validate_evm_address(address);
        match checksum {
            EvmChecksum::Valid => checks.push(CheckItem::passed("EIP-55 checksum")),
            EvmChecksum::ValidNoChecksum => {
                checks.push(CheckItem::passed("EIP-55 checksum"));
                findings.push(Finding::low(
                    "Address carries no EIP-55 checksum; a single mistyped character cannot be detected",
                ));
            }
            EvmChecksum::BadChecksum => {
                checks.push(CheckItem::failed(
                    "EIP-55 checksum",
                    "mixed-case pattern does not match EIP-55",
                ));
                findings.push(Finding::medium(
                    "Address checksum mismatch: it may be mistyped or a look-alike of a legitimate address",
                ));
            }
            EvmChecksum::Malformed => {
                checks.push(CheckItem::failed("EIP-55 checksum", "not a valid address"));
                findings.push(Finding::high("Address is structurally malformed"));
            }
        }

        let mut meta = WalletMetadata {
            address: Some(address.to_string()),
            network: Some("evm".to_string()),
            checksum_status: Some(checksum.as_str().to_string()),
            explorer_urls: Some(
                SUPPORTED_CHAIN_IDS
                    .iter()
                    .map(|&id| explorer_address_url(id, address))
                    .collect(),
            ),
            ..Default::default()
        };

        match self.goplus.address_security(address).await {
            Signal::Ok(security) => {
                tally.record_critical("GoPlus", true);
                let covered = SUPPORTED_CHAIN_IDS
                    .iter()
                    .map(|&id| get_chain_name(id))
                    .collect::<Vec<_>>()
                    .join(", ");
                if security.flags.is_empty() {
                    meta.is_flagged = Some(false);
                    meta.go_plus_flags = Some(Vec::new());
                    checks.push(CheckItem::passed("Malicious-address flags"));
                    findings.push(Finding::info(
                        "No malicious-activity flags reported for this address",
                    ));
                } else {
                    meta.is_flagged = Some(true);
                    meta.go_plus_flags = Some(security.flags.clone());
                    checks.push(CheckItem::failed(
                        "Malicious-address flags",
                        security.flags.join(", "),
                    ));
                    findings.push(Finding::danger(format!(
                        "GoPlus reports malicious-activity flags for this address: {}",
                        security.flags.join(", ")
                    )));
                }
                checks.push(CheckItem {
                    label: "Chains covered".to_string(),
                    passed: true,
                    detail: Some(covered),
                });
            }
            Signal::Unavailable(_) => {
                tally.record_critical("GoPlus", false);
                findings.push(Finding::low(
                    "Address reputation could not be checked (GoPlus unavailable)",
                ));
            }
        }

        (findings, meta, tally, checks)
    }

    pub(crate) async fn scan_btc_wallet(&self, raw: &str) -> SafetyReport {
        let trimmed = raw.trim();
        let mut findings = Vec::new();
        let mut checks = Vec::new();

        let checksum = validate_btc_address(trimmed);
        match checksum {
            BtcChecksum::Valid(kind) => {
                checks.push(CheckItem {
                    label: "Address checksum".to_string(),
                    passed: true,
                    detail: Some(format!("{:?}", kind).to_lowercase()),
                });
                findings.push(Finding::info("Bitcoin address checksum is valid"));
            }
            BtcChecksum::BadChecksum => {
                checks.push(CheckItem::failed("Address checksum", "checksum mismatch"));
                findings.push(Finding::medium(
                    "Bitcoin address checksum mismatch: the address is mistyped or corrupted",
                ));
            }
            BtcChecksum::Malformed => {
                checks.push(CheckItem::failed("Address checksum", "not a valid address"));
                findings.push(Finding::high("Bitcoin address is structurally malformed"));
            }
        }

        findings.push(Finding::info(
            "Bitcoin transactions are irreversible; verify the address through a second channel before sending",
        ));

        let meta = WalletMetadata {
            address: Some(trimmed.to_string()),
            network: Some("bitcoin".to_string()),
            checksum_status: Some(checksum.as_str().to_string()),
            explorer_urls: Some(vec![btc_explorer_address_url(trimmed)]),
            ..Default::default()
        };

        self.finish(
            InputType::BtcWallet,
            raw,
            findings,
            SourceTally::new(),
            Some(ReportMetadata::Wallet(meta)),
            Some(checks),
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::testutil::{MockGoPlus, MockSet};
    use crate::models::{Confidence, InputType, ReportMetadata, RiskLevel, Severity};

    const USDT: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";

    #[tokio::test]
    async fn test_clean_wallet() {
        let mut mocks = MockSet::default();
        mocks.goplus = Arc::new(MockGoPlus {
            address_flags: Some(vec![]),
            ..Default::default()
        });
        let scanner = mocks.scanner();
        let report = scanner.scan(USDT, None).await;
        assert_eq!(report.input_type, InputType::Wallet);
        assert_eq!(report.risk_level, RiskLevel::Safe);
        assert_eq!(report.confidence, Confidence::High);
        match report.metadata {
            Some(ReportMetadata::Wallet(meta)) => {
                assert_eq!(meta.is_flagged, Some(false));
                assert_eq!(meta.checksum_status.as_deref(), Some("valid"));
                assert_eq!(meta.explorer_urls.map(|u| u.len()), Some(7));
            }
            other => panic!("expected wallet metadata, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_flagged_wallet_is_danger() {
        let mut mocks = MockSet::default();
        mocks.goplus = Arc::new(MockGoPlus {
            address_flags: Some(vec![
                "phishing_activities".to_string(),
                "stealing_attack".to_string(),
            ]),
            ..Default::default()
        });
        let scanner = mocks.scanner();
        let report = scanner.scan(USDT, None).await;
        assert!(report
            .findings
            .iter()
            .any(|f| f.severity == Severity::Danger && f.message.contains("phishing_activities")));
        assert_ne!(report.risk_level, RiskLevel::Safe);
        match report.metadata {
            Some(ReportMetadata::Wallet(meta)) => assert_eq!(meta.is_flagged, Some(true)),
            other => panic!("expected wallet metadata, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_bad_checksum_is_finding_not_failure() {
        let mut mocks = MockSet::default();
        mocks.goplus = Arc::new(MockGoPlus {
            address_flags: Some(vec![]),
            ..Default::default()
        });
        let scanner = mocks.scanner();
        // Case bit flipped in the first hex letter
        let report = scanner
            .scan("0xDAC17F958D2ee523a2206206994597C13D831ec7", None)
            .await;
        assert_eq!(report.input_type, InputType::Wallet);
        assert!(report
            .findings
            .iter()
            .any(|f| f.message.contains("checksum mismatch")));
    }

    #[tokio::test]
    async fn test_goplus_down_is_low_confidence() {
        let mocks = MockSet::default();
        let scanner = mocks.scanner();
        let report = scanner.scan(USDT, None).await;
        assert_eq!(report.confidence, Confidence::Low);
        assert!(report.confidence_reason.contains("GoPlus"));
    }

    #[tokio::test]
    async fn test_btc_wallet_static_scan() {
        let mocks = MockSet::default();
        let scanner = mocks.scanner();
        let report = scanner.scan("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa", None).await;
        assert_eq!(report.input_type, InputType::BtcWallet);
        assert_eq!(report.risk_level, RiskLevel::Safe);
        match report.metadata {
            Some(ReportMetadata::Wallet(meta)) => {
                assert_eq!(meta.network.as_deref(), Some("bitcoin"));
                assert_eq!(meta.checksum_status.as_deref(), Some("valid"));
            }
            other => panic!("expected wallet metadata, got {:?}", other),
        }
    }
}
