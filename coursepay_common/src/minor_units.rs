use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sqlx::Type;

pub const DEFAULT_CURRENCY_CODE: &str = "INR";
/// All supported currencies (INR, USD, EUR, ...) have two decimal places.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

//--------------------------------------     MinorUnits       ---------------------------------------------------------
/// A monetary amount expressed in the smallest subdivision of a currency (paise, cents).
///
/// Amounts are always integers. Conversion from a decimal price happens exactly once, when a payment intent is
/// created, so there is no floating-point drift anywhere in the order flow.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize, Hash)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct MinorUnits(i64);

impl From<i64> for MinorUnits {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for MinorUnits {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for MinorUnits {}

impl Display for MinorUnits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_major = MINOR_UNITS_PER_MAJOR.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / per_major, abs % per_major)
    }
}

impl MinorUnits {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}
