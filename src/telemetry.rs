//! Telemetry Module
//!
//! Aggregate counters for the /stats endpoint. Privacy-first: no inputs,
//! addresses or URLs are ever stored - only counts and latencies.

use dashmap::DashMap;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::models::{InputType, RiskLevel};

/// Aggregated statistics for reporting
#[derive(Debug, Clone, Serialize, Default)]
pub struct TelemetryStats {
    /// Total scans served
    pub total_scans: u64,
    /// Scans that ended SUSPICIOUS or DANGEROUS
    pub flagged_scans: u64,
    /// Scans per input type
    pub scans_by_type: HashMap<String, u64>,
    /// Average scan latency (ms)
    pub avg_latency_ms: f64,
}

/// Lock-free scan counters shared across requests.
#[derive(Default)]
pub struct TelemetryCollector {
    total_scans: AtomicU64,
    flagged_scans: AtomicU64,
    total_latency_ms: AtomicU64,
    by_type: DashMap<&'static str, u64>,
}

impl TelemetryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_scan(&self, input_type: InputType, level: RiskLevel, latency_ms: u64) {
        self.total_scans.fetch_add(1, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
        if level != RiskLevel::Safe {
            self.flagged_scans.fetch_add(1, Ordering::Relaxed);
        }
        *self.by_type.entry(input_type.as_str()).or_insert(0) += 1;
    }

    pub fn get_stats(&self) -> TelemetryStats {
        let total = self.total_scans.load(Ordering::Relaxed);
        let latency = self.total_latency_ms.load(Ordering::Relaxed);
        TelemetryStats {
            total_scans: total,
            flagged_scans: self.flagged_scans.load(Ordering::Relaxed),
            scans_by_type: self
                .by_type
                .iter()
                .map(|e| (e.key().to_string(), *e.value()))
                .collect(),
            avg_latency_ms: if total > 0 {
                latency as f64 / total as f64
            } else {
                0.0
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let telemetry = TelemetryCollector::new();
        telemetry.record_scan(InputType::Url, RiskLevel::Safe, 10);
        telemetry.record_scan(InputType::Url, RiskLevel::Dangerous, 30);
        telemetry.record_scan(InputType::Wallet, RiskLevel::Suspicious, 20);

        let stats = telemetry.get_stats();
        assert_eq!(stats.total_scans, 3);
        assert_eq!(stats.flagged_scans, 2);
        assert_eq!(stats.scans_by_type.get("url"), Some(&2));
        assert!((stats.avg_latency_ms - 20.0).abs() < f64::EPSILON);
    }
}
