//! Address validation for caller-supplied input.
//!
//! Accepts `0x` + 40 hex digits. All-lowercase and all-uppercase forms are
//! taken as-is; mixed case must carry a valid EIP-55 checksum.

use crate::error::ValidationError;
use alloy::primitives::Address;

pub fn parse_address(input: &str) -> Result<Address, ValidationError> {
    let invalid = || ValidationError::InvalidAddress(input.to_string());

    let hex = input.strip_prefix("0x").ok_or_else(invalid)?;
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }

    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper {
        return Address::parse_checksummed(input, None).map_err(|_| invalid());
    }

    input.parse::<Address>().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    const WETH: Address = address!("C02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");

    #[test]
    fn test_accepts_checksummed_and_lowercase() {
        assert_eq!(
            parse_address("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2").unwrap(),
            WETH
        );
        assert_eq!(
            parse_address("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2").unwrap(),
            WETH
        );
    }

    #[test]
    fn test_rejects_bad_checksum() {
        // last character case flipped
        assert!(parse_address("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756CC2").is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        for input in [
            "",
            "0x",
            "c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
            "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc",
            "0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2ff",
            "0xz02aaa39b223fe8d0a0e5c4f27ead9083c756cc2",
        ] {
            assert_eq!(
                parse_address(input),
                Err(ValidationError::InvalidAddress(input.to_string())),
                "{input:?} should be rejected"
            );
        }
    }
}
