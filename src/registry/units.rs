//! Display-unit to base-unit conversion with exact decimal arithmetic

use crate::error::{OrchestratorError, OrchestratorResult};

use rust_decimal::Decimal;

/// Convert a human decimal amount (e.g. `"1.25"`) to integer base units
/// using the asset's exponent. Digits beyond the exponent are rejected,
/// including digits past the 28 that `Decimal` can hold.
pub fn to_base_units(amount: &str, exponent: u32) -> OrchestratorResult<u128> {
    let trimmed = amount.trim();
    let value = Decimal::from_str_exact(trimmed)
        .map_err(|e| OrchestratorError::InvalidAmount(format!("{}: {}", trimmed, e)))?
        .normalize();

    if value.is_sign_negative() && !value.is_zero() {
        return Err(OrchestratorError::InvalidAmount(format!(
            "{} is negative",
            trimmed
        )));
    }

    if value.scale() > exponent {
        return Err(OrchestratorError::InvalidAmount(format!(
            "{} has more than {} decimal places",
            trimmed, exponent
        )));
    }

    let mantissa = u128::try_from(value.mantissa())
        .map_err(|_| OrchestratorError::InvalidAmount(trimmed.to_string()))?;

    10u128
        .checked_pow(exponent - value.scale())
        .and_then(|factor| mantissa.checked_mul(factor))
        .ok_or_else(|| {
            OrchestratorError::InvalidAmount(format!("{} overflows base units", trimmed))
        })
}

/// Convert integer base units back to a display amount string
pub fn to_display_units(base_units: u128, exponent: u32) -> String {
    let digits = base_units.to_string();
    let exponent = exponent as usize;
    if exponent == 0 {
        return digits;
    }

    let padded = format!("{:0>width$}", digits, width = exponent + 1);
    let (whole, fraction) = padded.split_at(padded.len() - exponent);
    let fraction = fraction.trim_end_matches('0');
    if fraction.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, fraction)
    }
}
