//! ENS Scanner
//!
//! Resolves the name, then wraps the wallet pipeline around the resolved
//! address: a context finding is prepended and the wallet scan's findings
//! and metadata are spliced in unchanged. Resolution failure short-circuits
//! into a fixed sentinel report - the one place a report is not produced by
//! the general scoring pass.

use chrono::Utc;

use super::Scanner;
use crate::core::score::SourceTally;
use crate::models::{
    Confidence, EnsMetadata, Finding, InputType, ReportMetadata, RiskLevel, SafetyReport,
    ScoreBreakdownItem, Severity,
};

impl Scanner {
    pub(crate) async fn scan_ens(&self, raw: &str) -> SafetyReport {
        // Normalized for resolution; the original input stays on the report.
        let name = raw.trim().to_lowercase();
        let resolution = self.ens.resolve(&name).await;

        let Some(address) = resolution.address else {
            let error = resolution
                .error
                .unwrap_or_else(|| "no address record".to_string());
            return self.ens_failure_report(raw, &name, &error);
        };

        let (wallet_findings, wallet_meta, wallet_tally, mut checks) =
            self.wallet_scan_parts(&address).await;

        let mut findings = vec![Finding::info(format!(
            "ENS name {} resolves to {}",
            name, address
        ))
        .with_override(0)];
        findings.extend(wallet_findings);

        let mut tally = SourceTally::new();
        tally.record_critical("ENS resolver", true);
        tally.merge(wallet_tally);

        checks.insert(
            0,
            crate::models::CheckItem::passed("ENS resolution"),
        );

        let metadata = ReportMetadata::Ens(EnsMetadata {
            ens_name: Some(name),
            resolution_status: Some("resolved".to_string()),
            resolved_address: Some(address),
            resolution_error: None,
            wallet: Some(wallet_meta),
        });

        let mut report = self.finish(
            InputType::Ens,
            raw,
            findings,
            tally,
            Some(metadata),
            Some(checks),
            None,
        );
        report.recommendations.push(
            "Verify ownership of this name independently via the official ENS app (app.ens.domains)."
                .to_string(),
        );
        report
    }

    /// Fixed sentinel result for a failed resolution. The wallet scanner is
    /// never invoked on this branch.
    fn ens_failure_report(&self, raw: &str, name: &str, error: &str) -> SafetyReport {
        let findings = vec![Finding::new(
            Severity::Medium,
            format!("ENS resolution failed: {}", error),
        )
        .with_override(50)];

        SafetyReport {
            input_type: InputType::Ens,
            input_value: raw.to_string(),
            risk_score: 50,
            risk_level: RiskLevel::Suspicious,
            confidence: Confidence::Low,
            confidence_reason: "ENS resolution failed; nothing further could be verified"
                .to_string(),
            summary: format!(
                "The ENS name could not be resolved to an address ({}).",
                error
            ),
            findings,
            recommendations: vec![
                "Check the spelling of the name; unregistered and expired names do not resolve."
                    .to_string(),
                "Do not send funds to an address claimed for this name without independent proof."
                    .to_string(),
            ],
            score_breakdown: vec![ScoreBreakdownItem {
                label: format!("ENS resolution failed: {}", error),
                score_impact: 50,
            }],
            next_step: Some(
                "Look the name up in the official ENS app before trusting it.".to_string(),
            ),
            checks_performed: Some(vec![crate::models::CheckItem::failed(
                "ENS resolution",
                error.to_string(),
            )]),
            metadata: Some(ReportMetadata::Ens(EnsMetadata {
                ens_name: Some(name.to_string()),
                resolution_status: Some("failed".to_string()),
                resolved_address: None,
                resolution_error: Some(error.to_string()),
                wallet: None,
            })),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    use super::super::testutil::{MockEns, MockGoPlus, MockSet};
    use crate::models::{Confidence, InputType, ReportMetadata, RiskLevel, Severity};

    const RESOLVED: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

    fn resolving_mocks() -> MockSet {
        let mut mocks = MockSet::default();
        mocks.ens = Arc::new(MockEns {
            address: Some(RESOLVED.to_string()),
            ..Default::default()
        });
        mocks.goplus = Arc::new(MockGoPlus {
            address_flags: Some(vec![]),
            ..Default::default()
        });
        mocks
    }

    #[tokio::test]
    async fn test_success_prepends_context_finding() {
        let mocks = resolving_mocks();
        let scanner = mocks.scanner();
        let report = scanner.scan("vitalik.eth", None).await;

        assert_eq!(report.input_type, InputType::Ens);
        assert_eq!(report.findings[0].severity, Severity::Info);
        assert_eq!(report.findings[0].score_override, Some(0));
        assert!(report.findings[0].message.contains("resolves to"));
        assert!(report.findings[0].message.contains(RESOLVED));
        assert!(report.findings.len() > 1);
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.contains("app.ens.domains")));
        assert_eq!(mocks.ens.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_success_carries_wallet_metadata() {
        let mocks = resolving_mocks();
        let scanner = mocks.scanner();
        let report = scanner.scan("vitalik.eth", None).await;
        match report.metadata {
            Some(ReportMetadata::Ens(meta)) => {
                assert_eq!(meta.resolution_status.as_deref(), Some("resolved"));
                assert_eq!(meta.resolved_address.as_deref(), Some(RESOLVED));
                let wallet = meta.wallet.expect("delegated wallet metadata");
                assert_eq!(wallet.address.as_deref(), Some(RESOLVED));
            }
            other => panic!("expected ens metadata, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_name_is_normalized_but_input_preserved() {
        let mocks = resolving_mocks();
        let scanner = mocks.scanner();
        let raw = " UPPERCASE.ETH ";
        let report = scanner.scan(raw, None).await;
        assert_eq!(report.input_value, raw);
        match report.metadata {
            Some(ReportMetadata::Ens(meta)) => {
                assert_eq!(meta.ens_name.as_deref(), Some("uppercase.eth"));
            }
            other => panic!("expected ens metadata, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failure_is_fixed_sentinel_and_skips_wallet_scan() {
        let mut mocks = MockSet::default();
        mocks.ens = Arc::new(MockEns {
            address: None,
            error: Some("name is not registered".to_string()),
            ..Default::default()
        });
        mocks.goplus = Arc::new(MockGoPlus {
            address_flags: Some(vec![]),
            ..Default::default()
        });
        let scanner = mocks.scanner();
        let report = scanner.scan("nosuchname.eth", None).await;

        assert_eq!(report.risk_level, RiskLevel::Suspicious);
        assert_eq!(report.risk_score, 50);
        assert_eq!(report.confidence, Confidence::Low);
        assert!(report
            .findings
            .iter()
            .any(|f| f.message.contains("resolution failed")));
        assert!(report
            .findings
            .iter()
            .any(|f| f.message.contains("name is not registered")));
        // Wallet scanner not invoked: no reputation lookup happened
        assert_eq!(mocks.goplus.address_calls.load(Ordering::SeqCst), 0);
        match report.metadata {
            Some(ReportMetadata::Ens(meta)) => {
                assert_eq!(meta.resolution_status.as_deref(), Some("failed"));
                assert!(meta.wallet.is_none());
            }
            other => panic!("expected ens metadata, got {:?}", other),
        }
    }
}
