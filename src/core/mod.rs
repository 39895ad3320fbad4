//! Core Module - classification, validation, scoring, admission control

pub mod classifier;
pub mod ratelimit;
pub mod score;
pub mod validators;

pub use classifier::classify;
pub use ratelimit::{client_id, RateLimitConfig, RateLimiter};
pub use score::{assess, Assessment, SourceTally};
pub use validators::{validate_btc_address, validate_evm_address, BtcChecksum, EvmChecksum};
