//! Constants Module - Single Source of Truth
//!
//! Chain metadata, explorer URL builders and upstream chain-name mappings
//! used across the scanners. No hardcoded chain data in other modules.

// ============================================
// APPLICATION CONSTANTS
// ============================================

/// Application name
pub const APP_NAME: &str = "SentinelScan";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User-Agent for outbound HTTP requests
pub const USER_AGENT: &str = "SentinelScan/0.1";

/// Maximum accepted scan input length (characters)
pub const MAX_INPUT_LEN: usize = 2000;

// ============================================
// CHAIN IDS - Single Source of Truth
// ============================================

/// Ethereum Mainnet
pub const CHAIN_ID_ETHEREUM: u64 = 1;
/// BNB Smart Chain
pub const CHAIN_ID_BSC: u64 = 56;
/// Polygon
pub const CHAIN_ID_POLYGON: u64 = 137;
/// Arbitrum One
pub const CHAIN_ID_ARBITRUM: u64 = 42161;
/// Optimism
pub const CHAIN_ID_OPTIMISM: u64 = 10;
/// Avalanche C-Chain
pub const CHAIN_ID_AVALANCHE: u64 = 43114;
/// Base
pub const CHAIN_ID_BASE: u64 = 8453;

/// All supported EVM chain IDs
pub const SUPPORTED_CHAIN_IDS: [u64; 7] = [
    CHAIN_ID_ETHEREUM,
    CHAIN_ID_BSC,
    CHAIN_ID_POLYGON,
    CHAIN_ID_ARBITRUM,
    CHAIN_ID_OPTIMISM,
    CHAIN_ID_AVALANCHE,
    CHAIN_ID_BASE,
];

// ============================================
// CHAIN METADATA
// ============================================

/// Get chain name
pub fn get_chain_name(chain_id: u64) -> &'static str {
    match chain_id {
        CHAIN_ID_ETHEREUM => "Ethereum",
        CHAIN_ID_BSC => "BNB Smart Chain",
        CHAIN_ID_POLYGON => "Polygon",
        CHAIN_ID_ARBITRUM => "Arbitrum One",
        CHAIN_ID_OPTIMISM => "Optimism",
        CHAIN_ID_AVALANCHE => "Avalanche C-Chain",
        CHAIN_ID_BASE => "Base",
        _ => "Unknown",
    }
}

/// Get block explorer base URL
pub fn get_explorer_url(chain_id: u64) -> &'static str {
    match chain_id {
        CHAIN_ID_ETHEREUM => "https://etherscan.io",
        CHAIN_ID_BSC => "https://bscscan.com",
        CHAIN_ID_POLYGON => "https://polygonscan.com",
        CHAIN_ID_ARBITRUM => "https://arbiscan.io",
        CHAIN_ID_OPTIMISM => "https://optimistic.etherscan.io",
        CHAIN_ID_AVALANCHE => "https://snowtrace.io",
        CHAIN_ID_BASE => "https://basescan.org",
        _ => "https://etherscan.io",
    }
}

/// Explorer address page for an EVM chain
pub fn explorer_address_url(chain_id: u64, address: &str) -> String {
    format!("{}/address/{}", get_explorer_url(chain_id), address)
}

/// Explorer transaction page for an EVM chain
pub fn explorer_tx_url(chain_id: u64, tx_hash: &str) -> String {
    format!("{}/tx/{}", get_explorer_url(chain_id), tx_hash)
}

/// Bitcoin explorer address page
pub fn btc_explorer_address_url(address: &str) -> String {
    format!("https://mempool.space/address/{}", address)
}

/// Solana explorer token page
pub fn solana_explorer_token_url(mint: &str) -> String {
    format!("https://solscan.io/token/{}", mint)
}

// ============================================
// DEXSCREENER CHAIN MAPPING
// ============================================

/// Convert DexScreener chain name to numeric chain ID (0 = unrecognized)
pub fn dexscreener_name_to_chain_id(name: &str) -> u64 {
    match name.to_lowercase().as_str() {
        "ethereum" => CHAIN_ID_ETHEREUM,
        "bsc" => CHAIN_ID_BSC,
        "polygon" => CHAIN_ID_POLYGON,
        "arbitrum" => CHAIN_ID_ARBITRUM,
        "optimism" => CHAIN_ID_OPTIMISM,
        "avalanche" => CHAIN_ID_AVALANCHE,
        "base" => CHAIN_ID_BASE,
        _ => 0,
    }
}

// ============================================
// GOPLUS CHAIN MAPPING
// ============================================

/// GoPlus API chain-id path segment for an EVM chain
pub fn goplus_chain_segment(chain_id: u64) -> Option<&'static str> {
    match chain_id {
        CHAIN_ID_ETHEREUM => Some("1"),
        CHAIN_ID_BSC => Some("56"),
        CHAIN_ID_POLYGON => Some("137"),
        CHAIN_ID_ARBITRUM => Some("42161"),
        CHAIN_ID_OPTIMISM => Some("10"),
        CHAIN_ID_AVALANCHE => Some("43114"),
        CHAIN_ID_BASE => Some("8453"),
        _ => None,
    }
}

/// Check if chain ID is supported
#[inline]
pub fn is_chain_supported(chain_id: u64) -> bool {
    SUPPORTED_CHAIN_IDS.contains(&chain_id)
}
