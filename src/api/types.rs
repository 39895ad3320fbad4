//! API Request/Response Types

use serde::{Deserialize, Serialize};

use crate::telemetry::TelemetryStats;

/// Error body returned on 4xx/5xx. The message never carries internal
/// detail or the submitted input.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: String,
}

impl ErrorBody {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

// ============================================
// Health Check
// ============================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthData {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

// ============================================
// Stats
// ============================================

#[derive(Debug, Serialize)]
pub struct StatsData {
    #[serde(flatten)]
    pub stats: TelemetryStats,
    pub uptime_seconds: u64,
    pub api_version: String,
}
