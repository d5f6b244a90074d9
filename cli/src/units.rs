//! Fixed-point conversion between display amounts and contract base units.
//!
//! The token declares 6 decimals, so `1.5` FlashCoin is `1_500_000` base
//! units on-chain. Conversion works on the decimal string directly and never
//! goes through `f64`; extra fractional digits are truncated, not rounded.

use thiserror::Error;

/// Number of fractional digits the contract declares.
pub const DECIMALS: u32 = 6;

/// 1 FlashCoin = 1 000 000 base units.
pub const BASE_UNITS_PER_TOKEN: u128 = 10u128.pow(DECIMALS);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("Invalid amount: '{0}'")]
    Malformed(String),

    #[error("Amount too large: '{0}'")]
    Overflow(String),
}

/// Convert a non-negative decimal string to integer base units, truncating
/// any digits past the sixth fractional place.
///
/// `"1.5"` → `1_500_000`, `"0.0000001"` → `0`, `"5."` → `5_000_000`.
pub fn to_base_units(amount: &str) -> Result<u128, AmountError> {
    let s = amount.trim();
    let malformed = || AmountError::Malformed(amount.to_owned());

    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(malformed());
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    let overflow = || AmountError::Overflow(amount.to_owned());

    let whole_units = if whole.is_empty() {
        0
    } else {
        whole
            .parse::<u128>()
            .map_err(|_| overflow())?
            .checked_mul(BASE_UNITS_PER_TOKEN)
            .ok_or_else(overflow)?
    };

    // Keep at most DECIMALS digits, right-pad the rest with zeros.
    let kept = &frac[..frac.len().min(DECIMALS as usize)];
    let frac_units = if kept.is_empty() {
        0
    } else {
        let scale = 10u128.pow(DECIMALS - kept.len() as u32);
        kept.parse::<u128>().map_err(|_| malformed())? * scale
    };

    whole_units.checked_add(frac_units).ok_or_else(overflow)
}

/// Render base units as a display decimal with trailing zeros trimmed.
///
/// `1_500_000` → `"1.5"`, `2_000_000` → `"2"`, `0` → `"0"`.
pub fn to_display(base_units: u128) -> String {
    let whole = base_units / BASE_UNITS_PER_TOKEN;
    let frac = base_units % BASE_UNITS_PER_TOKEN;
    if frac == 0 {
        return whole.to_string();
    }
    let digits = format!("{:0>width$}", frac, width = DECIMALS as usize);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
