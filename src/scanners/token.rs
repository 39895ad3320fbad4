//! Token Scanner
//!
//! Market structure from DexScreener, contract audit from GoPlus,
//! verification from Sourcify. DexScreener doubles as chain auto-detection
//! for EVM tokens; the audit and verification lookups then run
//! concurrently. Missing data from any source is never read as a negative
//! signal - it only lowers confidence.

use chrono::Utc;

use super::Scanner;
use crate::core::score::SourceTally;
use crate::core::validators::{validate_evm_address, EvmChecksum};
use crate::models::{
    CheckItem, Finding, InputType, ReportMetadata, SafetyReport, SolanaMetadata, TokenMetadata,
};
use crate::providers::{PairSnapshot, Signal, TokenSecurity};
use crate::utils::constants::{
    dexscreener_name_to_chain_id, explorer_address_url, get_chain_name,
    solana_explorer_token_url, CHAIN_ID_ETHEREUM,
};

const MS_PER_DAY: f64 = 86_400_000.0;

fn pair_age_days(created_at_ms: Option<i64>) -> Option<f64> {
    created_at_ms.map(|created| {
        let now_ms = Utc::now().timestamp_millis();
        ((now_ms - created) as f64 / MS_PER_DAY).max(0.0)
    })
}

impl Scanner {
    pub(crate) async fn scan_token(&self, raw: &str) -> SafetyReport {
        let trimmed = raw.trim();
        let mut findings = Vec::new();
        let mut checks = Vec::new();
        let mut tally = SourceTally::new();
        let mut meta = TokenMetadata::default();

        if validate_evm_address(trimmed) == EvmChecksum::BadChecksum {
            findings.push(Finding::medium(
                "Token address checksum mismatch: it may be mistyped or a look-alike",
            ));
        }

        // Market structure first: it also tells us which chain to audit.
        let mut chain_id = CHAIN_ID_ETHEREUM;
        match self.dexscreener.pairs_for(trimmed).await {
            Signal::Ok(pairs) => {
                tally.record("DexScreener", true);
                if let Some(best) = pairs.first() {
                    let detected = dexscreener_name_to_chain_id(&best.chain);
                    if detected != 0 {
                        chain_id = detected;
                    }
                    self.market_findings(best, &mut findings, &mut checks);
                    meta.liquidity_usd = best.liquidity_usd;
                    meta.volume_24h_usd = best.volume_24h_usd;
                    meta.fdv_usd = best.fdv_usd;
                    meta.price_usd = best.price_usd.clone();
                    meta.price_change_24h = best.price_change_24h;
                    meta.pair_age_days = pair_age_days(best.pair_created_at_ms);
                    meta.dex_id = Some(best.dex_id.clone());
                    meta.pair_address = Some(best.pair_address.clone());
                } else {
                    findings.push(Finding::low(
                        "Token is not listed on any DEX tracked by DexScreener",
                    ));
                    checks.push(CheckItem::failed("DEX listing", "no pairs found"));
                }
            }
            Signal::Unavailable(_) => {
                tally.record("DexScreener", false);
            }
        }
        meta.chain_id = Some(chain_id);
        meta.chain_name = Some(get_chain_name(chain_id).to_string());
        meta.explorer_url = Some(explorer_address_url(chain_id, trimmed));

        // Contract audit + verification, concurrently.
        let (audit, verification) = tokio::join!(
            self.goplus.token_security(chain_id, trimmed),
            self.sourcify.verification_status(trimmed, chain_id)
        );

        match audit {
            Signal::Ok(security) => {
                tally.record_critical("GoPlus", true);
                self.audit_findings(&security, &mut findings, &mut checks);
                meta.is_honeypot = security.is_honeypot;
                meta.is_open_source = security.is_open_source;
                meta.is_mintable = security.is_mintable;
                meta.buy_tax_percent = security.buy_tax_percent;
                meta.sell_tax_percent = security.sell_tax_percent;
                meta.hidden_owner = security.hidden_owner;
                meta.is_proxy = security.is_proxy;
                meta.can_self_destruct = security.can_self_destruct;
                meta.is_blacklisted = security.is_blacklisted;
                meta.transfer_pausable = security.transfer_pausable;
                meta.slippage_modifiable = security.slippage_modifiable;
                meta.owner_address = security.owner_address;
                meta.holder_count = security.holder_count;
            }
            Signal::Unavailable(_) => {
                tally.record_critical("GoPlus", false);
            }
        }

        match verification {
            Signal::Ok(verified) => {
                tally.record("Sourcify", true);
                meta.sourcify_verified = Some(verified);
                if verified {
                    checks.push(CheckItem::passed("Sourcify verification"));
                } else {
                    checks.push(CheckItem::failed("Sourcify verification", "not verified"));
                    findings.push(Finding::low(
                        "Contract source is not verified on Sourcify",
                    ));
                }
            }
            Signal::Unavailable(_) => {
                tally.record("Sourcify", false);
            }
        }

        let next_step = Some(
            "If you still intend to trade this token, test with a small amount first.".to_string(),
        );

        self.finish(
            InputType::Token,
            raw,
            findings,
            tally,
            Some(ReportMetadata::Token(meta)),
            Some(checks),
            next_step,
        )
    }

    /// Threshold policy over the best (most liquid) pair.
    fn market_findings(
        &self,
        best: &PairSnapshot,
        findings: &mut Vec<Finding>,
        checks: &mut Vec<CheckItem>,
    ) {
        match best.liquidity_usd {
            Some(liquidity) if liquidity < self.config.min_liquidity_usd => {
                checks.push(CheckItem::failed(
                    "Liquidity",
                    format!("${:.0}", liquidity),
                ));
                findings.push(Finding::medium(format!(
                    "Low liquidity (${:.0}): exiting a position may be difficult or costly",
                    liquidity
                )));
            }
            Some(_) => checks.push(CheckItem::passed("Liquidity")),
            None => {}
        }

        if let (Some(fdv), Some(liquidity)) = (best.fdv_usd, best.liquidity_usd) {
            if liquidity > 0.0 && fdv / liquidity > self.config.max_fdv_liquidity_ratio {
                findings.push(Finding::medium(format!(
                    "Valuation is out of proportion to liquidity (FDV/liquidity ratio {:.0})",
                    fdv / liquidity
                )));
                checks.push(CheckItem::failed(
                    "FDV/liquidity ratio",
                    format!("{:.0}", fdv / liquidity),
                ));
            } else {
                checks.push(CheckItem::passed("FDV/liquidity ratio"));
            }
        }

        if let Some(age) = pair_age_days(best.pair_created_at_ms) {
            if age < self.config.new_pair_age_days {
                findings.push(Finding::medium(format!(
                    "Trading pair is only {:.1} days old; most rug pulls happen in a pair's first days",
                    age
                )));
                checks.push(CheckItem::failed("Pair age", format!("{:.1} days", age)));
            } else {
                checks.push(CheckItem::passed("Pair age"));
            }
        }
    }

    /// GoPlus audit flags. Hard rug indicators are danger findings; the
    /// softer control flags accumulate.
    fn audit_findings(
        &self,
        security: &TokenSecurity,
        findings: &mut Vec<Finding>,
        checks: &mut Vec<CheckItem>,
    ) {
        if security.is_honeypot == Some(true) {
            findings.push(Finding::danger(
                "GoPlus flags this token as a honeypot: buyers cannot sell",
            ));
            checks.push(CheckItem::failed("Honeypot", "sell is blocked"));
        } else if security.is_honeypot == Some(false) {
            checks.push(CheckItem::passed("Honeypot"));
        }

        if security.is_blacklisted == Some(true) {
            findings.push(Finding::danger(
                "Contract has a blacklist function that can block specific holders from selling",
            ));
        }
        if security.can_self_destruct == Some(true) {
            findings.push(Finding::danger(
                "Contract can self-destruct, wiping the token and its balances",
            ));
        }
        if security.hidden_owner == Some(true) {
            findings.push(Finding::danger(
                "Contract has a hidden owner able to regain privileged control",
            ));
        }

        let tax_limit = self.config.max_tax_percent;
        for (label, tax) in [
            ("buy", security.buy_tax_percent),
            ("sell", security.sell_tax_percent),
        ] {
            if let Some(tax) = tax {
                if tax > tax_limit {
                    findings.push(Finding::medium(format!(
                        "High {} tax ({:.1}%)",
                        label, tax
                    )));
                }
            }
        }

        if security.is_open_source == Some(false) {
            findings.push(Finding::medium(
                "Contract source is not published; its behavior cannot be audited",
            ));
        }
        if security.is_mintable == Some(true) {
            findings.push(Finding::low(
                "Token supply is mintable; holders can be diluted at will",
            ));
        }
        if security.transfer_pausable == Some(true) {
            findings.push(Finding::medium(
                "Transfers can be paused by the contract owner",
            ));
        }
        if security.slippage_modifiable == Some(true) {
            findings.push(Finding::medium(
                "Trading tax/slippage can be modified after launch",
            ));
        }
        if security.is_proxy == Some(true) {
            findings.push(Finding::low(
                "Contract is an upgradeable proxy; its logic can change after audit",
            ));
        }
    }

    /// Solana mints take the same shape with GoPlus's Solana endpoint and
    /// no Sourcify.
    pub(crate) async fn scan_solana_token(&self, raw: &str) -> SafetyReport {
        let trimmed = raw.trim();
        let mut findings = Vec::new();
        let mut checks = Vec::new();
        let mut tally = SourceTally::new();
        let mut meta = SolanaMetadata {
            mint: Some(trimmed.to_string()),
            explorer_url: Some(solana_explorer_token_url(trimmed)),
            ..Default::default()
        };

        let (pairs, audit) = tokio::join!(
            self.dexscreener.pairs_for(trimmed),
            self.goplus.solana_token_security(trimmed)
        );

        match pairs {
            Signal::Ok(pairs) => {
                tally.record("DexScreener", true);
                if let Some(best) = pairs.first() {
                    self.market_findings(best, &mut findings, &mut checks);
                    meta.liquidity_usd = best.liquidity_usd;
                    meta.volume_24h_usd = best.volume_24h_usd;
                    meta.price_usd = best.price_usd.clone();
                    meta.pair_age_days = pair_age_days(best.pair_created_at_ms);
                    meta.dex_id = Some(best.dex_id.clone());
                    meta.pair_address = Some(best.pair_address.clone());
                } else {
                    findings.push(Finding::low(
                        "Mint is not listed on any DEX tracked by DexScreener",
                    ));
                    checks.push(CheckItem::failed("DEX listing", "no pairs found"));
                }
            }
            Signal::Unavailable(_) => {
                tally.record("DexScreener", false);
            }
        }

        match audit {
            Signal::Ok(security) => {
                tally.record_critical("GoPlus", true);
                meta.is_mintable = security.is_mintable;
                meta.freezable = security.freezable;
                meta.holder_count = security.holder_count;
                if security.is_mintable == Some(true) {
                    findings.push(Finding::medium(
                        "Mint authority is still active; supply can be inflated at will",
                    ));
                    checks.push(CheckItem::failed("Mint authority", "active"));
                } else if security.is_mintable == Some(false) {
                    checks.push(CheckItem::passed("Mint authority"));
                }
                if security.freezable == Some(true) {
                    findings.push(Finding::medium(
                        "Freeze authority is still active; individual holders can be frozen",
                    ));
                    checks.push(CheckItem::failed("Freeze authority", "active"));
                } else if security.freezable == Some(false) {
                    checks.push(CheckItem::passed("Freeze authority"));
                }
            }
            Signal::Unavailable(_) => {
                tally.record_critical("GoPlus", false);
            }
        }

        self.finish(
            InputType::SolanaToken,
            raw,
            findings,
            tally,
            Some(ReportMetadata::Solana(meta)),
            Some(checks),
            None,
        )
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::testutil::{MockDexScreener, MockGoPlus, MockSet, MockSourcify};
    use super::*;
    use crate::models::{Confidence, RiskLevel, Severity};
    use crate::providers::SolanaTokenSecurity;

    const TOKEN: &str = "0xdAC17F958D2ee523a2206206994597C13D831ec7";
    const MINT: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";

    fn healthy_pair() -> PairSnapshot {
        PairSnapshot {
            chain: "ethereum".to_string(),
            dex_id: "uniswap".to_string(),
            pair_address: "0xpair".to_string(),
            base_symbol: Some("TKN".to_string()),
            liquidity_usd: Some(2_000_000.0),
            volume_24h_usd: Some(500_000.0),
            fdv_usd: Some(10_000_000.0),
            price_usd: Some("1.00".to_string()),
            price_change_24h: Some(0.5),
            // ~100 days old
            pair_created_at_ms: Some(Utc::now().timestamp_millis() - 8_640_000_000),
        }
    }

    fn clean_audit() -> TokenSecurity {
        TokenSecurity {
            is_honeypot: Some(false),
            is_open_source: Some(true),
            is_mintable: Some(false),
            buy_tax_percent: Some(0.0),
            sell_tax_percent: Some(0.0),
            hidden_owner: Some(false),
            is_proxy: Some(false),
            can_self_destruct: Some(false),
            is_blacklisted: Some(false),
            transfer_pausable: Some(false),
            slippage_modifiable: Some(false),
            owner_address: None,
            holder_count: Some(100_000),
        }
    }

    fn mocks_with(
        pairs: Option<Vec<PairSnapshot>>,
        token: Option<TokenSecurity>,
        verified: Option<bool>,
    ) -> MockSet {
        let mut mocks = MockSet::default();
        mocks.dexscreener = Arc::new(MockDexScreener { pairs });
        mocks.goplus = Arc::new(MockGoPlus {
            token,
            ..Default::default()
        });
        mocks.sourcify = Arc::new(MockSourcify { verified });
        mocks
    }

    #[tokio::test]
    async fn test_healthy_token_is_safe() {
        let mocks = mocks_with(
            Some(vec![healthy_pair()]),
            Some(clean_audit()),
            Some(true),
        );
        let scanner = mocks.scanner();
        let report = scanner.scan(TOKEN, Some(super::super::TypeHint::Token)).await;
        assert_eq!(report.input_type, InputType::Token);
        assert_eq!(report.risk_level, RiskLevel::Safe);
        assert_eq!(report.confidence, Confidence::High);
        match report.metadata {
            Some(ReportMetadata::Token(meta)) => {
                assert_eq!(meta.chain_id, Some(1));
                assert_eq!(meta.is_honeypot, Some(false));
                assert_eq!(meta.sourcify_verified, Some(true));
            }
            other => panic!("expected token metadata, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_honeypot_is_dangerous() {
        let audit = TokenSecurity {
            is_honeypot: Some(true),
            ..clean_audit()
        };
        let mocks = mocks_with(Some(vec![healthy_pair()]), Some(audit), Some(true));
        let scanner = mocks.scanner();
        let report = scanner.scan(TOKEN, Some(super::super::TypeHint::Token)).await;
        assert_eq!(report.risk_level, RiskLevel::Dangerous);
        assert!(report
            .findings
            .iter()
            .any(|f| f.severity == Severity::Danger && f.message.contains("honeypot")));
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.to_lowercase().contains("do not buy")));
    }

    #[tokio::test]
    async fn test_threshold_findings() {
        let pair = PairSnapshot {
            liquidity_usd: Some(2_500.0),
            fdv_usd: Some(50_000_000.0),
            pair_created_at_ms: Some(Utc::now().timestamp_millis() - 86_400_000), // 1 day
            ..healthy_pair()
        };
        let audit = TokenSecurity {
            buy_tax_percent: Some(15.0),
            sell_tax_percent: Some(25.0),
            ..clean_audit()
        };
        let mocks = mocks_with(Some(vec![pair]), Some(audit), Some(true));
        let scanner = mocks.scanner();
        let report = scanner.scan(TOKEN, Some(super::super::TypeHint::Token)).await;
        let messages: Vec<&str> = report.findings.iter().map(|f| f.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("Low liquidity")), "{:?}", messages);
        assert!(messages.iter().any(|m| m.contains("FDV/liquidity")));
        assert!(messages.iter().any(|m| m.contains("days old")));
        assert!(messages.iter().any(|m| m.contains("buy tax")));
        assert!(messages.iter().any(|m| m.contains("sell tax")));
        assert_ne!(report.risk_level, RiskLevel::Safe);
    }

    #[tokio::test]
    async fn test_missing_sources_lower_confidence_not_score() {
        // Every source down: no findings should appear from their absence
        let mocks = mocks_with(None, None, None);
        let scanner = mocks.scanner();
        let report = scanner.scan(TOKEN, Some(super::super::TypeHint::Token)).await;
        assert_eq!(report.confidence, Confidence::Low);
        assert_eq!(report.risk_level, RiskLevel::Safe);
        assert_eq!(report.risk_score, 0);
    }

    #[tokio::test]
    async fn test_solana_mint_scan() {
        let mut mocks = MockSet::default();
        mocks.dexscreener = Arc::new(MockDexScreener {
            pairs: Some(vec![PairSnapshot {
                chain: "solana".to_string(),
                dex_id: "raydium".to_string(),
                ..healthy_pair()
            }]),
        });
        mocks.goplus = Arc::new(MockGoPlus {
            solana: Some(SolanaTokenSecurity {
                is_mintable: Some(true),
                freezable: Some(false),
                holder_count: Some(5000),
            }),
            ..Default::default()
        });
        let scanner = mocks.scanner();
        let report = scanner.scan(MINT, None).await;
        assert_eq!(report.input_type, InputType::SolanaToken);
        assert!(report
            .findings
            .iter()
            .any(|f| f.message.contains("Mint authority")));
        match report.metadata {
            Some(ReportMetadata::Solana(meta)) => {
                assert_eq!(meta.is_mintable, Some(true));
                assert_eq!(meta.dex_id.as_deref(), Some("raydium"));
            }
            other => panic!("expected solana metadata, got {:?}", other),
        }
    }
}
