use alloy_primitives::Address;

use crate::error::EthError;

/// Parses a `0x`-prefixed Ethereum address.
///
/// All-lowercase and all-uppercase forms are accepted as-is. Mixed-case input
/// must carry a valid EIP-55 checksum.
pub fn parse_address(address: &str) -> Result<Address, EthError> {
    let hex_part = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .ok_or_else(|| EthError::InvalidAddress("address must start with 0x".into()))?;

    if hex_part.len() != 40 {
        return Err(EthError::InvalidAddress(format!(
            "expected 40 hex characters, got {}",
            hex_part.len()
        )));
    }

    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(EthError::InvalidAddress(
            "address contains non-hex characters".into(),
        ));
    }

    let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());

    if has_lower && has_upper {
        return Address::parse_checksummed(format!("0x{hex_part}"), None)
            .map_err(|e| EthError::InvalidAddress(format!("checksum mismatch: {e}")));
    }

    let bytes = hex::decode(hex_part)
        .map_err(|e| EthError::InvalidAddress(format!("invalid hex: {e}")))?;
    Ok(Address::from_slice(&bytes))
}

/// Renders an address in EIP-55 mixed-case form.
pub fn checksum_address(address: &Address) -> String {
    address.to_checksum(None)
}

/// Returns whether `address` parses as a valid Ethereum address.
pub fn is_valid_address(address: &str) -> bool {
    parse_address(address).is_ok()
}
