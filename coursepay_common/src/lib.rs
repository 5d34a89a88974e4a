mod minor_units;
mod secret;

pub use minor_units::{MinorUnits, DEFAULT_CURRENCY_CODE, MINOR_UNITS_PER_MAJOR};
pub use secret::Secret;
