//! Providers Module - external signal sources
//!
//! Thin clients for the reputation services the scanners consult, plus the
//! SSRF-safe URL resolver. Every client is behind an async trait so
//! scanners can be tested against mocks, and none of them raises past its
//! boundary: unavailability is a first-class return value (`Signal`), not
//! an error the orchestrator has to catch ad hoc.

pub mod dexscreener;
pub mod ens;
pub mod goplus;
pub mod resolver;
pub mod sourcify;

use async_trait::async_trait;

pub use dexscreener::{DexScreenerClient, PairSnapshot};
pub use ens::{EnsClient, EnsResolution};
pub use goplus::{AddressSecurity, GoPlusClient, PhishingCheck, SolanaTokenSecurity, TokenSecurity};
pub use resolver::{ResolveErrorType, SsrfSafeResolver, UrlResolution};
pub use sourcify::SourcifyClient;

/// Two-outcome result for signal sources: data, or "this source could not
/// be reached" with a reason. Distinct from "the source answered and said
/// nothing concerning" - confidence computation depends on the difference.
#[derive(Debug, Clone)]
pub enum Signal<T> {
    Ok(T),
    Unavailable(String),
}

impl<T> Signal<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, Signal::Ok(_))
    }

    pub fn ok(self) -> Option<T> {
        match self {
            Signal::Ok(v) => Some(v),
            Signal::Unavailable(_) => None,
        }
    }

    pub fn as_ref(&self) -> Signal<&T> {
        match self {
            Signal::Ok(v) => Signal::Ok(v),
            Signal::Unavailable(reason) => Signal::Unavailable(reason.clone()),
        }
    }
}

// ============================================
// Collaborator traits (mockable)
// ============================================

/// ENS name resolution. The only collaborator whose failure produces a
/// sentinel report instead of degraded confidence.
#[async_trait]
pub trait EnsResolve: Send + Sync {
    async fn resolve(&self, name: &str) -> EnsResolution;
}

/// GoPlus Security API surface used by the scanners.
#[async_trait]
pub trait GoPlusApi: Send + Sync {
    async fn token_security(&self, chain_id: u64, address: &str) -> Signal<TokenSecurity>;
    async fn solana_token_security(&self, mint: &str) -> Signal<SolanaTokenSecurity>;
    async fn address_security(&self, address: &str) -> Signal<AddressSecurity>;
    async fn phishing_site(&self, url: &str) -> Signal<PhishingCheck>;
}

/// DexScreener pair lookup.
#[async_trait]
pub trait DexScreenerApi: Send + Sync {
    async fn pairs_for(&self, address: &str) -> Signal<Vec<PairSnapshot>>;
}

/// Sourcify contract-verification lookup.
#[async_trait]
pub trait SourcifyApi: Send + Sync {
    async fn verification_status(&self, address: &str, chain_id: u64) -> Signal<bool>;
}

/// SSRF-safe URL resolution (bounded-hop redirect walking).
#[async_trait]
pub trait UrlResolve: Send + Sync {
    async fn resolve(&self, url: &str) -> UrlResolution;
}
