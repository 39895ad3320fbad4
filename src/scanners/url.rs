//! URL Scanner
//!
//! Static hostname heuristics, the SSRF-safe resolution walk, the GoPlus
//! phishing database and the configured regulator blacklist. Each step is
//! independent: a step that cannot run contributes no finding and lowers
//! confidence instead.

use url::Url;

use super::Scanner;
use crate::core::score::SourceTally;
use crate::models::{CheckItem, Finding, InputType, ReportMetadata, SafetyReport, UrlMetadata};
use crate::providers::{ResolveErrorType, Signal};

impl Scanner {
    pub(crate) async fn scan_url(&self, raw: &str) -> SafetyReport {
        let trimmed = raw.trim();
        let normalized = if trimmed.to_lowercase().starts_with("http://")
            || trimmed.to_lowercase().starts_with("https://")
        {
            trimmed.to_string()
        } else {
            format!("https://{}", trimmed)
        };

        let mut findings = Vec::new();
        let mut checks = Vec::new();
        let mut tally = SourceTally::new();
        let mut meta = UrlMetadata::default();

        // ============================================
        // (a) Static heuristics
        // ============================================
        if let Ok(parsed) = Url::parse(&normalized) {
            self.host_heuristics(&parsed, &mut findings, &mut checks, &mut meta);
        }

        // ============================================
        // (b) Resolution + (c) phishing DB, concurrently
        // ============================================
        let (resolution, phishing) = tokio::join!(
            self.resolver.resolve(&normalized),
            self.goplus.phishing_site(trimmed)
        );

        meta.redirect_count = Some(resolution.redirect_count);
        meta.reachable = Some(resolution.reachable);
        meta.status_code = resolution.status_code;
        meta.final_url = Some(resolution.final_url.clone());
        meta.error_type = resolution.error_type.map(|e| e.as_str().to_string());

        match resolution.error_type {
            Some(ResolveErrorType::Blocked) => {
                // The resolver did its job; the target itself is the signal.
                tally.record("URL resolver", true);
                checks.push(CheckItem::failed(
                    "Destination address space",
                    "resolved into private or internal address space",
                ));
                findings.push(Finding::danger(
                    "URL resolves into private or internal network address space (blocked)",
                ));
            }
            Some(ResolveErrorType::Timeout) | Some(ResolveErrorType::Dns) => {
                tally.record("URL resolver", false);
                findings.push(Finding::low(format!(
                    "URL could not be reached ({})",
                    resolution
                        .error_type
                        .map(|e| e.as_str())
                        .unwrap_or("unknown")
                )));
            }
            Some(ResolveErrorType::Unknown) => {
                tally.record("URL resolver", false);
                findings.push(Finding::low(
                    "URL could not be fully resolved (redirect loop or malformed response)",
                ));
            }
            None => {
                tally.record("URL resolver", true);
                checks.push(CheckItem::passed("Reachability"));
                meta.https = Some(resolution.final_url.starts_with("https://"));
                if meta.https == Some(false) {
                    findings.push(Finding::medium(
                        "Final URL is served over plain HTTP, not HTTPS",
                    ));
                }
                if resolution.redirect_count > 2 {
                    findings.push(Finding::low(format!(
                        "Long redirect chain ({} hops) before the landing page",
                        resolution.redirect_count
                    )));
                }
            }
        }

        match phishing {
            Signal::Ok(check) => {
                tally.record("GoPlus", true);
                meta.flagged_phishing = Some(check.is_phishing);
                if check.is_phishing {
                    checks.push(CheckItem::failed(
                        "Phishing database",
                        "listed in the GoPlus phishing-site database",
                    ));
                    findings.push(Finding::danger(
                        "URL is listed in the GoPlus phishing-site database",
                    ));
                } else {
                    checks.push(CheckItem::passed("Phishing database"));
                }
            }
            Signal::Unavailable(_) => {
                tally.record("GoPlus", false);
            }
        }

        self.finish(
            InputType::Url,
            raw,
            findings,
            tally,
            Some(ReportMetadata::Url(meta)),
            Some(checks),
            None,
        )
    }

    /// Offline hostname heuristics: TLD, keywords, homoglyphs, IP-literal
    /// hosts, subdomain depth and the configured blacklist.
    fn host_heuristics(
        &self,
        parsed: &Url,
        findings: &mut Vec<Finding>,
        checks: &mut Vec<CheckItem>,
        meta: &mut UrlMetadata,
    ) {
        let Some(host) = parsed.host_str() else {
            return;
        };
        let host_lower = host.to_lowercase();
        let path_lower = parsed.path().to_lowercase();

        // Regulator / curated blacklist
        if self
            .config
            .blocklist_domains
            .iter()
            .any(|d| host_lower == *d || host_lower.ends_with(&format!(".{}", d)))
        {
            meta.blacklisted = Some(true);
            checks.push(CheckItem::failed("Domain blacklist", "domain is blacklisted"));
            findings.push(Finding::danger(
                "Domain appears on a regulator blacklist of known scam sites",
            ));
        } else if !self.config.blocklist_domains.is_empty() {
            meta.blacklisted = Some(false);
            checks.push(CheckItem::passed("Domain blacklist"));
        }

        // IP-literal host
        let is_ip_literal = matches!(
            parsed.host(),
            Some(url::Host::Ipv4(_)) | Some(url::Host::Ipv6(_))
        );
        if is_ip_literal {
            findings.push(Finding::medium(
                "Hostname is a raw IP address instead of a domain name",
            ));
            checks.push(CheckItem::failed("Hostname shape", "IP-literal host"));
            return; // the remaining heuristics are domain-based
        }
        checks.push(CheckItem::passed("Hostname shape"));

        // Suspicious TLD
        if let Some(tld) = host_lower.rsplit('.').next() {
            if self.config.suspicious_tlds.contains(tld) {
                findings.push(Finding::medium(format!(
                    "Domain uses a top-level domain with a high abuse rate (.{})",
                    tld
                )));
                checks.push(CheckItem::failed("Top-level domain", format!(".{}", tld)));
            } else {
                checks.push(CheckItem::passed("Top-level domain"));
            }
        }

        // Scam keywords in host or path
        if let Some(keyword) = self
            .config
            .scam_keywords
            .iter()
            .find(|k| host_lower.contains(*k) || path_lower.contains(*k))
        {
            findings.push(Finding::medium(format!(
                "URL contains a keyword common in scam campaigns (\"{}\")",
                keyword
            )));
            checks.push(CheckItem::failed("Scam keywords", keyword.clone()));
        } else {
            checks.push(CheckItem::passed("Scam keywords"));
        }

        // Homoglyph / punycode hostname
        if host_lower.split('.').any(|l| l.starts_with("xn--"))
            || host.chars().any(|c| !c.is_ascii())
        {
            findings.push(Finding::high(
                "Hostname contains punycode or non-ASCII characters (possible homoglyph attack)",
            ));
            checks.push(CheckItem::failed("Homoglyph characters", "non-ASCII hostname"));
        } else {
            checks.push(CheckItem::passed("Homoglyph characters"));
        }

        // Subdomain depth (brand-in-subdomain spoofing pattern)
        let labels = host_lower.split('.').count();
        let subdomains = labels.saturating_sub(2);
        if subdomains > self.config.max_subdomain_depth {
            findings.push(Finding::medium(format!(
                "Unusually deep subdomain nesting ({} levels), a common spoofing pattern",
                subdomains
            )));
            checks.push(CheckItem::failed(
                "Subdomain depth",
                format!("{} levels", subdomains),
            ));
        } else {
            checks.push(CheckItem::passed("Subdomain depth"));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::testutil::{MockResolver, MockSet};
    use crate::models::{InputType, RiskLevel, Severity};

    #[tokio::test]
    async fn test_clean_url_scan() {
        let mut mocks = MockSet::default();
        mocks.goplus = Arc::new(super::super::testutil::MockGoPlus {
            phishing: Some(false),
            ..Default::default()
        });
        let scanner = mocks.scanner();
        let report = scanner.scan("https://example.com", None).await;
        assert_eq!(report.input_type, InputType::Url);
        assert_eq!(report.risk_level, RiskLevel::Safe);
        let checks = report.checks_performed.unwrap();
        assert!(checks.iter().all(|c| c.passed));
    }

    #[tokio::test]
    async fn test_blocked_target_is_danger() {
        let mut mocks = MockSet::default();
        mocks.resolver = Arc::new(MockResolver::blocked());
        mocks.goplus = Arc::new(super::super::testutil::MockGoPlus {
            phishing: Some(false),
            ..Default::default()
        });
        let scanner = mocks.scanner();
        let report = scanner.scan("http://internal.attacker.example", None).await;
        assert!(report
            .findings
            .iter()
            .any(|f| f.severity == Severity::Danger && f.message.contains("blocked")));
        assert_ne!(report.risk_level, RiskLevel::Safe);
        match report.metadata {
            Some(crate::models::ReportMetadata::Url(meta)) => {
                assert_eq!(meta.error_type.as_deref(), Some("blocked"));
            }
            other => panic!("expected url metadata, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_phishing_listing_is_danger() {
        let mut mocks = MockSet::default();
        mocks.goplus = Arc::new(super::super::testutil::MockGoPlus {
            phishing: Some(true),
            ..Default::default()
        });
        let scanner = mocks.scanner();
        let report = scanner.scan("https://example.com", None).await;
        assert!(report
            .findings
            .iter()
            .any(|f| f.severity == Severity::Danger && f.message.contains("phishing")));
    }

    #[tokio::test]
    async fn test_static_heuristics_fire() {
        let mut mocks = MockSet::default();
        mocks.goplus = Arc::new(super::super::testutil::MockGoPlus {
            phishing: Some(false),
            ..Default::default()
        });
        let scanner = mocks.scanner();
        let report = scanner
            .scan(
                "https://secure.wallet.login.verify.claim-airdrop.xyz/connect",
                None,
            )
            .await;
        let messages: Vec<&str> = report.findings.iter().map(|f| f.message.as_str()).collect();
        assert!(
            messages.iter().any(|m| m.contains("top-level domain")),
            "{:?}",
            messages
        );
        assert!(messages.iter().any(|m| m.contains("keyword")));
        assert!(messages.iter().any(|m| m.contains("subdomain")));
    }

    #[tokio::test]
    async fn test_goplus_unavailable_degrades_confidence() {
        let mocks = MockSet::default(); // goplus mock: everything unavailable
        let scanner = mocks.scanner();
        let report = scanner.scan("https://example.com", None).await;
        assert_eq!(report.confidence, crate::models::Confidence::Medium);
        assert!(report.confidence_reason.contains("GoPlus"));
    }
}
