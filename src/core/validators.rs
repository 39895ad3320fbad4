//! Address Validators
//!
//! Pure checksum/format validators for EVM (EIP-55 mixed-case) and Bitcoin
//! (base58Check, bech32) addresses. A checksum failure is a verdict, not an
//! error: scanners record it as a finding and keep going.

use alloy_primitives::Address;
use std::str::FromStr;

/// EIP-55 verdict for an EVM address string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvmChecksum {
    /// Mixed-case and the case pattern matches EIP-55
    Valid,
    /// Single-case hex: structurally fine, carries no checksum to verify
    ValidNoChecksum,
    /// Mixed-case but the case pattern does not match EIP-55
    BadChecksum,
    /// Not a 0x-prefixed 20-byte hex string
    Malformed,
}

impl EvmChecksum {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::ValidNoChecksum => "valid-no-checksum",
            Self::BadChecksum => "bad-checksum",
            Self::Malformed => "malformed",
        }
    }
}

/// Validate an EVM address string against EIP-55.
pub fn validate_evm_address(s: &str) -> EvmChecksum {
    let Some(hex_part) = s.strip_prefix("0x") else {
        return EvmChecksum::Malformed;
    };
    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return EvmChecksum::Malformed;
    }
    let Ok(address) = Address::from_str(s) else {
        return EvmChecksum::Malformed;
    };

    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
    if !(has_lower && has_upper) {
        return EvmChecksum::ValidNoChecksum;
    }

    if address.to_checksum(None) == s {
        EvmChecksum::Valid
    } else {
        EvmChecksum::BadChecksum
    }
}

/// Bitcoin address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BtcAddressKind {
    /// Pay-to-pubkey-hash (version byte 0x00, "1…")
    P2pkh,
    /// Pay-to-script-hash (version byte 0x05, "3…")
    P2sh,
    /// Native segwit ("bc1…")
    Bech32,
}

/// Checksum verdict for a Bitcoin address string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BtcChecksum {
    Valid(BtcAddressKind),
    BadChecksum,
    Malformed,
}

impl BtcChecksum {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid(_) => "valid",
            Self::BadChecksum => "bad-checksum",
            Self::Malformed => "malformed",
        }
    }
}

/// Validate a Bitcoin address: base58Check for legacy, bech32 for segwit.
pub fn validate_btc_address(s: &str) -> BtcChecksum {
    if s.to_lowercase().starts_with("bc1") {
        return match bech32::decode(s) {
            Ok((hrp, data, _variant)) => {
                if hrp == "bc" && !data.is_empty() {
                    BtcChecksum::Valid(BtcAddressKind::Bech32)
                } else {
                    BtcChecksum::Malformed
                }
            }
            Err(bech32::Error::InvalidChecksum) => BtcChecksum::BadChecksum,
            Err(_) => BtcChecksum::Malformed,
        };
    }

    match bs58::decode(s).with_check(None).into_vec() {
        Ok(payload) if payload.len() == 21 => match payload[0] {
            0x00 => BtcChecksum::Valid(BtcAddressKind::P2pkh),
            0x05 => BtcChecksum::Valid(BtcAddressKind::P2sh),
            _ => BtcChecksum::Malformed,
        },
        Ok(_) => BtcChecksum::Malformed,
        Err(bs58::decode::Error::InvalidChecksum { .. }) => BtcChecksum::BadChecksum,
        Err(_) => BtcChecksum::Malformed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evm_checksummed() {
        // USDT contract, canonical EIP-55 casing
        assert_eq!(
            validate_evm_address("0xdAC17F958D2ee523a2206206994597C13D831ec7"),
            EvmChecksum::Valid
        );
    }

    #[test]
    fn test_evm_lowercase_has_no_checksum() {
        assert_eq!(
            validate_evm_address("0xdac17f958d2ee523a2206206994597c13d831ec7"),
            EvmChecksum::ValidNoChecksum
        );
    }

    #[test]
    fn test_evm_bad_checksum() {
        // Same address with one case bit flipped
        assert_eq!(
            validate_evm_address("0xDAC17F958D2ee523a2206206994597C13D831ec7"),
            EvmChecksum::BadChecksum
        );
    }

    #[test]
    fn test_evm_malformed() {
        assert_eq!(validate_evm_address("0x1234"), EvmChecksum::Malformed);
        assert_eq!(
            validate_evm_address("dAC17F958D2ee523a2206206994597C13D831ec7"),
            EvmChecksum::Malformed
        );
    }

    #[test]
    fn test_btc_p2pkh_genesis() {
        assert_eq!(
            validate_btc_address("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa"),
            BtcChecksum::Valid(BtcAddressKind::P2pkh)
        );
    }

    #[test]
    fn test_btc_p2sh() {
        assert_eq!(
            validate_btc_address("3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy"),
            BtcChecksum::Valid(BtcAddressKind::P2sh)
        );
    }

    #[test]
    fn test_btc_bech32() {
        assert_eq!(
            validate_btc_address("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4"),
            BtcChecksum::Valid(BtcAddressKind::Bech32)
        );
    }

    #[test]
    fn test_btc_bad_checksum() {
        // Last base58 character swapped
        assert_eq!(
            validate_btc_address("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNb"),
            BtcChecksum::BadChecksum
        );
    }

    #[test]
    fn test_btc_malformed() {
        assert_eq!(validate_btc_address("hello"), BtcChecksum::Malformed);
        assert_eq!(validate_btc_address("bc1"), BtcChecksum::Malformed);
    }
}
