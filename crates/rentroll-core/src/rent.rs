//! Rent scaling between the form and storage.
//!
//! Forms take rent in units of 10,000 ("12.3" means 123,000); storage keeps
//! the full integer amount.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use thiserror::Error;

/// One display unit of rent, in stored amount.
pub const RENT_UNIT: i64 = 10_000;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RentError {
    #[error("rent is required")]
    Missing,
    #[error("rent must be a number")]
    NotANumber,
    #[error("rent must not be negative")]
    Negative,
    #[error("rent has too many decimal places")]
    TooPrecise,
    #[error("rent is too large")]
    Overflow,
}

/// Parse a form value in display units into the stored amount.
pub fn to_amount(input: &str) -> Result<i64, RentError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(RentError::Missing);
    }
    let value = Decimal::from_str(input).map_err(|_| RentError::NotANumber)?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(RentError::Negative);
    }
    let scaled = value
        .checked_mul(Decimal::from(RENT_UNIT))
        .ok_or(RentError::Overflow)?
        .normalize();
    if !scaled.fract().is_zero() {
        return Err(RentError::TooPrecise);
    }
    scaled.to_i64().ok_or(RentError::Overflow)
}

/// Stored amount in display units, exact.
pub fn in_units(amount: i64) -> Decimal {
    (Decimal::from(amount) / Decimal::from(RENT_UNIT)).normalize()
}

/// Format a stored amount for a form field, with at least one fractional
/// digit: `123000` -> `"12.3"`, `150000` -> `"15.0"`.
pub fn to_display(amount: i64) -> String {
    let mut value = in_units(amount);
    if value.scale() == 0 {
        value.rescale(1);
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_fractional_digit_scales_exactly() {
        assert_eq!(to_amount("12.3"), Ok(123_000));
        assert_eq!(to_amount("9.9"), Ok(99_000));
        assert_eq!(to_amount(" 15 "), Ok(150_000));
    }

    #[test]
    fn display_inverts_scaling() {
        assert_eq!(to_display(123_000), "12.3");
        assert_eq!(to_display(150_000), "15.0");
        assert_eq!(to_display(12_345), "1.2345");
        assert_eq!(to_display(to_amount("12.3").unwrap()), "12.3");
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(to_amount(""), Err(RentError::Missing));
        assert_eq!(to_amount("twelve"), Err(RentError::NotANumber));
        assert_eq!(to_amount("-1"), Err(RentError::Negative));
        assert_eq!(to_amount("0.00001"), Err(RentError::TooPrecise));
    }

    #[test]
    fn units_are_exact_decimals() {
        assert_eq!(in_units(123_000).to_string(), "12.3");
        assert_eq!(in_units(0).to_string(), "0");
    }
}
