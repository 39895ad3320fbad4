//! API Request Handlers

use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use super::types::*;
use crate::config::ScanConfig;
use crate::core::ratelimit::{RateLimitConfig, RateLimiter};
use crate::models::{AppError, SafetyReport};
use crate::scanners::{Scanner, TypeHint};
use crate::telemetry::TelemetryCollector;
use crate::utils::constants::MAX_INPUT_LEN;

/// Shared application state: the scanner, the only process-wide mutable
/// pieces (rate-limit buckets, telemetry counters) and the start time.
/// Constructed once in the binary; nothing else holds ambient globals.
pub struct AppState {
    pub scanner: Arc<Scanner>,
    pub rate_limiter: RateLimiter,
    pub telemetry: TelemetryCollector,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Arc<ScanConfig>) -> Self {
        Self::with_scanner(Scanner::with_default_clients(config))
    }

    /// Inject a scanner (tests wire mock signal clients through here).
    pub fn with_scanner(scanner: Scanner) -> Self {
        Self {
            scanner: Arc::new(scanner),
            rate_limiter: RateLimiter::new(RateLimitConfig::default()),
            telemetry: TelemetryCollector::new(),
            start_time: Instant::now(),
        }
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

type ApiRejection = (StatusCode, Json<ErrorBody>);

/// Map an `AppError` onto the wire: its taxonomy drives the status, its
/// message is the full outward detail.
fn reject(err: AppError) -> ApiRejection {
    let status = StatusCode::from_u16(err.code.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorBody::new(err.code_str(), err.message)))
}

// ============================================
// Scan
// ============================================

/// `POST /scan` - validate, classify, scan, score.
///
/// The body is taken as a raw JSON value so validation failures produce
/// precise 400 messages instead of a generic deserialization error.
pub async fn scan(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<SafetyReport>, ApiRejection> {
    let start = Instant::now();

    let Some(input) = body.get("input").and_then(|v| v.as_str()) else {
        return Err(reject(AppError::invalid_input(
            "Please provide a valid input to scan",
        )));
    };
    if input.trim().is_empty() {
        return Err(reject(AppError::invalid_input(
            "Please provide a valid input to scan",
        )));
    }
    if input.chars().count() > MAX_INPUT_LEN {
        return Err(reject(AppError::input_too_long(MAX_INPUT_LEN)));
    }

    let hint = body
        .get("type")
        .and_then(|v| v.as_str())
        .and_then(TypeHint::parse);

    // The pipeline itself never fails; a panic inside it is the one
    // unanticipated case and maps to a generic 500.
    let scanner = state.scanner.clone();
    let owned_input = input.to_string();
    let result = tokio::spawn(async move { scanner.scan(&owned_input, hint).await }).await;

    match result {
        Ok(report) => {
            let latency = start.elapsed().as_millis() as u64;
            state
                .telemetry
                .record_scan(report.input_type, report.risk_level, latency);
            info!(
                input_type = report.input_type.as_str(),
                risk_level = report.risk_level.as_str(),
                latency_ms = latency,
                "scan completed"
            );
            Ok(Json(report))
        }
        Err(join_error) => {
            // Detail stays server-side; the input is never logged.
            error!(error = %join_error, "scan pipeline panicked");
            Err(reject(AppError::internal(
                "An unexpected error occurred while scanning. Please try again",
            )))
        }
    }
}

// ============================================
// Health Check
// ============================================

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthData> {
    Json(HealthData {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.uptime_seconds(),
    })
}

// ============================================
// Stats
// ============================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsData> {
    Json(StatsData {
        stats: state.telemetry.get_stats(),
        uptime_seconds: state.uptime_seconds(),
        api_version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
