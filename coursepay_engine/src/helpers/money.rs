use coursepay_common::{MinorUnits, MINOR_UNITS_PER_MAJOR};
use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};

/// Converts a decimal price in major units to integer minor units, rounding half away from zero.
///
/// `99.995` becomes `10000` and `49.99` becomes `4999`. Returns `None` if the result does not fit in an `i64`.
pub fn to_minor_units(price: Decimal) -> Option<MinorUnits> {
    let scaled = price.checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))?;
    scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero).to_i64().map(MinorUnits::from)
}
