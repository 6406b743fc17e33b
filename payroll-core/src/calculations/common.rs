//! Shared helpers for monetary values.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a value to whole cents using half-up rounding.
///
/// Values exactly halfway between two cents move away from zero. Derived
/// fields are stored unrounded; this is for presenting them.
///
/// # Arguments
///
/// * `value` - The amount to round
///
/// # Returns
///
/// The amount rounded to two decimal places.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use payroll_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(253.1645)), dec!(253.16));
/// assert_eq!(round_half_up(dec!(42.555)), dec!(42.56));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
