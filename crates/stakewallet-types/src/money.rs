//! Scale-2 money helpers
//!
//! Two distinct rounding policies live in this system and must stay distinct:
//! currency conversion rounds twice (10 fraction digits after the divide,
//! then 2 at the end) while the multi-currency aggregate rounds each quotient
//! to 10 digits and only rounds to 2 once, after summing. Unifying them
//! changes observable penny-level results.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round to 2 fraction digits, half-up. The result always carries exactly
/// two fraction digits: rounding alone only caps the scale, and a sum of
/// whole numbers would otherwise serialize as `200.0` instead of `200.00`.
pub fn round2(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// Round to 10 fraction digits, half-up. Used for intermediate quotients.
pub fn round10(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(10, RoundingStrategy::MidpointAwayFromZero)
}
