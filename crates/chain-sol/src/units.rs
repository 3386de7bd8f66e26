//! Lamport and token base-unit scaling.

use crate::error::SolError;

/// Decimals of native SOL.
pub const SOL_DECIMALS: u8 = 9;

pub const LAMPORTS_PER_SOL: u64 = 1_000_000_000;

/// Formats `amount` base units with `decimals`, trailing zeros trimmed
/// (`1_000_000_000` with 9 decimals -> `"1"`).
pub fn format_amount(amount: u64, decimals: u8) -> String {
    let Some(scale) = 10u64.checked_pow(decimals as u32) else {
        // Wider than any u64 amount: everything is fractional.
        let digits = format!("{amount:0>width$}", width = decimals as usize);
        let trimmed = digits.trim_end_matches('0');
        return if trimmed.is_empty() {
            "0".to_string()
        } else {
            format!("0.{trimmed}")
        };
    };

    let whole = amount / scale;
    let fraction = amount % scale;
    if fraction == 0 {
        return whole.to_string();
    }

    let padded = format!("{fraction:0>width$}", width = decimals as usize);
    format!("{whole}.{}", padded.trim_end_matches('0'))
}

/// Parses a non-negative decimal string into base units.
pub fn parse_amount(amount: &str, decimals: u8) -> Result<u64, SolError> {
    let amount = amount.trim();
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));

    if whole.is_empty() && fraction.is_empty() {
        return Err(SolError::InvalidAmount(format!("'{amount}' is not a number")));
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        return Err(SolError::InvalidAmount(format!("'{amount}' is not a decimal number")));
    }
    if fraction.len() > decimals as usize {
        return Err(SolError::InvalidAmount(format!(
            "'{amount}' has more than {decimals} fractional digits"
        )));
    }

    let digits = format!("{whole}{fraction:0<width$}", width = decimals as usize);
    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(0);
    }

    digits
        .parse::<u64>()
        .map_err(|_| SolError::InvalidAmount(format!("'{amount}' overflows u64 base units")))
}

/// Lamports as SOL.
pub fn format_lamports(lamports: u64) -> String {
    format_amount(lamports, SOL_DECIMALS)
}

/// SOL as lamports.
pub fn parse_sol(amount: &str) -> Result<u64, SolError> {
    parse_amount(amount, SOL_DECIMALS)
}
