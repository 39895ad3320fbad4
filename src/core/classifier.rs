//! Input Classifier
//!
//! Maps a raw user-supplied string to exactly one `InputType`. Total and
//! deterministic: never fails, identical input always yields the same type.
//! Precedence: url > ens > EVM wallet > tx hash > BTC wallet > Solana mint
//! > invalid-address > unknown.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::InputType;

lazy_static! {
    /// Bare domain with optional path: labels + alphabetic TLD of 2+ chars
    static ref DOMAIN_RE: Regex = Regex::new(
        r"^([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,}(:\d{1,5})?(/\S*)?$"
    )
    .expect("domain regex");
}

const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

fn is_base58(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| BASE58_ALPHABET.contains(c))
}

fn is_hex(s: &str) -> bool {
    !s.is_empty() && hex::decode(s).is_ok()
}

/// `http(s)://` URL with a host, or a bare-domain-looking string.
/// `.eth` names are carved out so ENS takes precedence over the bare-domain
/// pattern.
fn is_url_like(s: &str) -> bool {
    if s.contains(char::is_whitespace) {
        return false;
    }
    let lower = s.to_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        return match url::Url::parse(s) {
            Ok(u) => u.host().is_some(),
            Err(_) => false,
        };
    }
    if is_ens_name(s) {
        return false;
    }
    DOMAIN_RE.is_match(s)
}

fn is_ens_name(s: &str) -> bool {
    let lower = s.to_lowercase();
    lower.ends_with(".eth")
        && lower.len() > 4
        && !lower.contains('/')
        && !lower.contains(char::is_whitespace)
}

/// Bitcoin legacy (base58Check) or bech32 address shape. Structural only:
/// checksum verification happens in the wallet scanner.
fn is_btc_shaped(s: &str) -> bool {
    let lower = s.to_lowercase();
    if lower.starts_with("bc1") {
        return s.len() >= 14
            && s.len() <= 74
            && lower[3..].chars().all(|c| BECH32_CHARSET.contains(c));
    }
    (s.starts_with('1') || s.starts_with('3')) && (25..=34).contains(&s.len()) && is_base58(s)
}

/// Classify a raw input string. Trims for classification only; callers keep
/// the original for display.
pub fn classify(raw: &str) -> InputType {
    let s = raw.trim();
    if s.is_empty() {
        return InputType::Unknown;
    }

    if is_url_like(s) {
        return InputType::Url;
    }

    if is_ens_name(s) {
        return InputType::Ens;
    }

    if let Some(hex_part) = s.strip_prefix("0x") {
        return match hex_part.len() {
            40 if is_hex(hex_part) => InputType::Wallet,
            64 if is_hex(hex_part) => InputType::TxHash,
            _ => InputType::InvalidAddress,
        };
    }

    if s.to_lowercase().starts_with("bc1") {
        return if is_btc_shaped(s) {
            InputType::BtcWallet
        } else {
            InputType::InvalidAddress
        };
    }

    if is_btc_shaped(s) {
        return InputType::BtcWallet;
    }

    if is_base58(s) && (32..=44).contains(&s.len()) {
        return InputType::SolanaToken;
    }

    // Address-shaped but structurally broken: base58-ish strings of nearly
    // plausible length, or 0X-prefixed hex.
    if s.to_lowercase().starts_with("0x") {
        return InputType::InvalidAddress;
    }
    if is_base58(s) && (20..=60).contains(&s.len()) {
        return InputType::InvalidAddress;
    }

    InputType::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_schemes() {
        assert_eq!(classify("https://example.com"), InputType::Url);
        assert_eq!(classify("http://example.com/path?q=1"), InputType::Url);
        assert_eq!(classify("example.com"), InputType::Url);
        assert_eq!(classify("sub.example.co.uk/claim"), InputType::Url);
    }

    #[test]
    fn test_ens_beats_bare_domain() {
        assert_eq!(classify("vitalik.eth"), InputType::Ens);
        assert_eq!(classify("UPPERCASE.ETH"), InputType::Ens);
        assert_eq!(classify("  padded.eth  "), InputType::Ens);
    }

    #[test]
    fn test_evm_wallet_and_tx() {
        assert_eq!(
            classify("0xdAC17F958D2ee523a2206206994597C13D831ec7"),
            InputType::Wallet
        );
        assert_eq!(
            classify("0x88df016429689c079f3b2f6ad39fa052532c56795b733da78a91ebe6a713944b"),
            InputType::TxHash
        );
    }

    #[test]
    fn test_btc_addresses() {
        assert_eq!(
            classify("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa"),
            InputType::BtcWallet
        );
        assert_eq!(
            classify("3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy"),
            InputType::BtcWallet
        );
        assert_eq!(
            classify("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"),
            InputType::BtcWallet
        );
    }

    #[test]
    fn test_solana_mint() {
        assert_eq!(
            classify("EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v"),
            InputType::SolanaToken
        );
    }

    #[test]
    fn test_invalid_addresses() {
        // 0x prefix, wrong length
        assert_eq!(
            classify("0xdAC17F958D2ee523a2206206994597C13D831e"),
            InputType::InvalidAddress
        );
        // 0x prefix, non-hex
        assert_eq!(
            classify("0xZZC17F958D2ee523a2206206994597C13D831ec7"),
            InputType::InvalidAddress
        );
        // bc1 with invalid bech32 charset (b, i, o not allowed)
        assert_eq!(classify("bc1bio999999999999"), InputType::InvalidAddress);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(classify(""), InputType::Unknown);
        assert_eq!(classify("   "), InputType::Unknown);
        assert_eq!(classify("hello world"), InputType::Unknown);
        assert_eq!(classify("not an address"), InputType::Unknown);
    }

    #[test]
    fn test_deterministic() {
        let input = "https://example.com";
        assert_eq!(classify(input), classify(input));
    }
}
