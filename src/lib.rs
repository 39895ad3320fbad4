//! SentinelScan Library
//!
//! Scan orchestration and risk-scoring engine for arbitrary user-supplied
//! strings: URLs, EVM/BTC addresses, transaction hashes, ENS names and
//! token/Solana mints. Combines static heuristics with external reputation
//! signals into a normalized `SafetyReport`:
//! - Input classification and per-type scan pipelines
//! - SSRF-safe bounded-hop URL resolution
//! - Multi-source aggregation with graceful degradation
//! - Sliding-window rate limiting at the API edge

pub mod api;
pub mod config;
pub mod core;
pub mod models;
pub mod providers;
pub mod scanners;
pub mod telemetry;
pub mod utils;

pub use crate::core::classifier::classify;
pub use crate::core::ratelimit::{client_id, RateLimitConfig, RateLimiter};
pub use crate::core::score::{assess, Assessment, SourceTally};
pub use config::ScanConfig;
pub use models::{
    Confidence, Finding, InputType, ReportMetadata, RiskLevel, SafetyReport, Severity,
};
pub use scanners::{Scanner, TypeHint};
pub use telemetry::{TelemetryCollector, TelemetryStats};
