//! Scaling between human decimal strings and integer minor units.
//!
//! The scaling itself is `alloy_primitives::utils`; this module adds the
//! stricter input rules and the trimmed output the connector shows.

use alloy_primitives::utils;
use alloy_primitives::U256;

use crate::error::EthError;

/// Decimals of the native asset on every supported EVM chain (wei).
pub const ETHER_DECIMALS: u8 = 18;

/// Formats `value` minor units as a decimal string with trailing zeros
/// removed (`1000000000000000000` wei -> `"1"`, `5 * 10^17` -> `"0.5"`).
///
/// Fails for `decimals` above 77, the largest power of ten a `U256` holds.
pub fn format_units(value: U256, decimals: u8) -> Result<String, EthError> {
    let formatted = utils::format_units(value, decimals)?;
    Ok(match formatted.split_once('.') {
        Some((whole, fraction)) => match fraction.trim_end_matches('0') {
            "" => whole.to_string(),
            fraction => format!("{whole}.{fraction}"),
        },
        None => formatted,
    })
}

/// Parses a non-negative decimal string into minor units.
///
/// Fails when the string is empty, signed, has more fractional digits than
/// `decimals`, or overflows 256 bits.
pub fn parse_units(amount: &str, decimals: u8) -> Result<U256, EthError> {
    let amount = amount.trim();
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));

    if whole.is_empty() && fraction.is_empty() {
        return Err(EthError::InvalidAmount(format!("'{amount}' is not a number")));
    }

    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(EthError::InvalidAmount(format!("'{amount}' is not a decimal number")));
    }

    // Rejected here; alloy would truncate.
    if fraction.len() > decimals as usize {
        return Err(EthError::InvalidAmount(format!(
            "'{amount}' has more than {decimals} fractional digits"
        )));
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let normalized = if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{whole}.{fraction}")
    };
    Ok(utils::parse_units(&normalized, decimals)?.get_absolute())
}

/// [`format_units`] with 18 decimals.
pub fn format_ether(wei: U256) -> Result<String, EthError> {
    format_units(wei, ETHER_DECIMALS)
}

/// [`parse_units`] with 18 decimals.
pub fn parse_ether(amount: &str) -> Result<U256, EthError> {
    parse_units(amount, ETHER_DECIMALS)
}
