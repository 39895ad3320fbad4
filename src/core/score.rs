//! Risk Scoring Engine
//!
//! Pure aggregation of a findings list into a 0-100 score, a risk level,
//! a confidence grade and a per-finding breakdown. Scanners collect
//! findings and a tally of which signal sources answered; this module does
//! the arithmetic.

use serde::{Deserialize, Serialize};

use crate::models::{
    Confidence, Finding, InputType, RiskLevel, ScoreBreakdownItem, Severity,
};

/// Fixed positive weight per severity when a finding carries no override.
fn severity_weight(severity: Severity) -> i64 {
    match severity {
        Severity::Info => 2,
        Severity::Low => 10,
        Severity::Medium => 25,
        Severity::High => 40,
        Severity::Danger => 60,
    }
}

/// Level band for a clamped score.
fn band(score: u8) -> RiskLevel {
    match score {
        0..=30 => RiskLevel::Safe,
        31..=60 => RiskLevel::Suspicious,
        _ => RiskLevel::Dangerous,
    }
}

/// Outcome of one external signal source during a scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceOutcome {
    pub name: String,
    pub ok: bool,
    /// A critical source failing drops confidence straight to LOW.
    pub critical: bool,
}

/// Which signal sources a scanner consulted and whether they answered.
#[derive(Debug, Clone, Default)]
pub struct SourceTally {
    outcomes: Vec<SourceOutcome>,
}

impl SourceTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: impl Into<String>, ok: bool) {
        self.outcomes.push(SourceOutcome {
            name: name.into(),
            ok,
            critical: false,
        });
    }

    pub fn record_critical(&mut self, name: impl Into<String>, ok: bool) {
        self.outcomes.push(SourceOutcome {
            name: name.into(),
            ok,
            critical: true,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Splice another tally's outcomes onto this one (delegating scanners).
    pub fn merge(&mut self, other: SourceTally) {
        self.outcomes.extend(other.outcomes);
    }

    fn failed(&self) -> Vec<&SourceOutcome> {
        self.outcomes.iter().filter(|o| !o.ok).collect()
    }
}

/// The engine's output, minus the per-scan fields the scanner owns.
#[derive(Debug, Clone)]
pub struct Assessment {
    pub risk_score: u8,
    pub risk_level: RiskLevel,
    pub confidence: Confidence,
    pub confidence_reason: String,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub score_breakdown: Vec<ScoreBreakdownItem>,
}

/// Aggregate findings + source outcomes into a scored assessment.
pub fn assess(input_type: InputType, findings: &[Finding], tally: &SourceTally) -> Assessment {
    let mut breakdown = Vec::with_capacity(findings.len());
    let mut raw_score: i64 = 0;

    for finding in findings {
        let impact = finding
            .score_override
            .unwrap_or_else(|| severity_weight(finding.severity));
        raw_score += impact;
        breakdown.push(ScoreBreakdownItem {
            label: finding.message.clone(),
            score_impact: impact,
        });
    }

    let risk_score = raw_score.clamp(0, 100) as u8;
    let has_danger = findings.iter().any(|f| f.severity == Severity::Danger);

    let mut risk_level = band(risk_score);
    if has_danger {
        // A danger finding can never yield a SAFE verdict, and combined
        // with a score at the DANGEROUS boundary it forces the top band.
        if risk_level == RiskLevel::Safe {
            risk_level = RiskLevel::Suspicious;
        }
        if risk_score >= 60 {
            risk_level = RiskLevel::Dangerous;
        }
    }

    let (confidence, confidence_reason) = grade_confidence(tally);
    let summary = summarize(input_type, risk_level, findings);
    let recommendations = recommend(risk_level, findings);

    Assessment {
        risk_score,
        risk_level,
        confidence,
        confidence_reason,
        summary,
        recommendations,
        score_breakdown: breakdown,
    }
}

/// HIGH when every expected source answered, MEDIUM when some failed,
/// LOW when a critical source (or all of them) failed.
fn grade_confidence(tally: &SourceTally) -> (Confidence, String) {
    if tally.is_empty() {
        return (
            Confidence::High,
            "Static analysis only; no external sources required".to_string(),
        );
    }

    let failed = tally.failed();
    if failed.is_empty() {
        return (Confidence::High, "All signal sources responded".to_string());
    }

    let names: Vec<&str> = failed.iter().map(|o| o.name.as_str()).collect();
    let reason = format!("{} unavailable; heuristic-only result", names.join(", "));

    if failed.len() == tally.outcomes.len() || failed.iter().any(|o| o.critical) {
        (Confidence::Low, reason)
    } else {
        (Confidence::Medium, reason)
    }
}

fn summarize(input_type: InputType, level: RiskLevel, findings: &[Finding]) -> String {
    let warnings = findings
        .iter()
        .filter(|f| f.severity >= Severity::Medium)
        .count();
    match level {
        RiskLevel::Safe => format!(
            "No significant risk signals detected for this {}.",
            noun(input_type)
        ),
        RiskLevel::Suspicious => format!(
            "{} warning sign{} detected. Proceed with caution.",
            warnings.max(1),
            if warnings == 1 { "" } else { "s" }
        ),
        RiskLevel::Dangerous => format!(
            "Serious risk signals detected. Interacting with this {} is likely to result in loss of funds.",
            noun(input_type)
        ),
    }
}

fn noun(input_type: InputType) -> &'static str {
    match input_type {
        InputType::Url => "link",
        InputType::Token | InputType::SolanaToken => "token",
        InputType::TxHash => "transaction",
        InputType::Wallet | InputType::BtcWallet => "address",
        InputType::Ens => "name",
        InputType::InvalidAddress => "input",
        InputType::Unknown => "input",
    }
}

/// Deterministic recommendation list from the level plus the specific
/// findings present. Content policy, not part of the scoring contract.
fn recommend(level: RiskLevel, findings: &[Finding]) -> Vec<String> {
    let mut out = Vec::new();
    let mentions = |needle: &str| {
        findings
            .iter()
            .any(|f| f.message.to_lowercase().contains(needle))
    };

    if mentions("honeypot") {
        out.push("Do not buy this token: holders appear unable to sell.".to_string());
    }
    if mentions("phishing") {
        out.push("Do not enter a seed phrase or connect a wallet on this site.".to_string());
    }
    if mentions("blocked") {
        out.push(
            "This link targets internal network infrastructure and should not be opened."
                .to_string(),
        );
    }
    if mentions("checksum") {
        out.push("Re-copy the address from the original source before sending funds.".to_string());
    }
    if mentions("blacklist") {
        out.push("This subject appears on a malicious-activity blacklist.".to_string());
    }

    match level {
        RiskLevel::Safe => {
            out.push("No major red flags found, but always verify before transacting.".to_string())
        }
        RiskLevel::Suspicious => out.push(
            "Treat with caution: verify through independent sources before proceeding.".to_string(),
        ),
        RiskLevel::Dangerous => {
            out.push("Avoid interacting with this input entirely.".to_string())
        }
    }
    out
}
