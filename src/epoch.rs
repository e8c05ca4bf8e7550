//! Distance from the cosmological origin for a calendar year.
//!
//! The elapsed time is expressed in billions of years (Gyr). CE and BCE
//! years use different offset formulas:
//!
//! - CE (`year > 0`): `span - (present - year) / 1e9`
//! - BCE (`year <= 0`): `span - (|year| + present) / 1e9`
//!
//! The two-formula split, with Year 0 on the BCE branch, is kept as-is so
//! results match the established reference values. Year 0 has offset
//! `present` and Year 1 has offset `present - 1`, so adjacent years stay one
//! calendar year apart across the era boundary.

use serde::{Serialize, Deserialize};

use crate::calendar::Year;

/// Time from the origin event to the present, in billions of years.
pub const ORIGIN_SPAN_GYR: f64 = 13.8;

/// Calendar year treated as "now".
pub const PRESENT_YEAR: i64 = 2025;

/// Calendar years per Gyr.
pub const YEARS_PER_GYR: f64 = 1e9;

/// The two literals the calculator is anchored on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpochConstants {
    /// Origin-to-present span in Gyr (default: 13.8).
    pub origin_span_gyr: f64,

    /// Present calendar year (default: 2025).
    pub present_year: i64,
}

impl Default for EpochConstants {
    fn default() -> Self {
        Self {
            origin_span_gyr: ORIGIN_SPAN_GYR,
            present_year: PRESENT_YEAR,
        }
    }
}

impl EpochConstants {
    /// Offset in calendar years subtracted from the span for `year`.
    ///
    /// Computed in `i128` so every `i64` year/present pair is exact.
    pub fn offset_years(&self, year: Year) -> i128 {
        if year.is_ce() {
            self.present_year as i128 - year.value() as i128
        } else {
            year.magnitude() as i128 + self.present_year as i128
        }
    }

    /// Elapsed time since the origin for `year`, in Gyr. Total and pure.
    pub fn elapsed_gyr(&self, year: Year) -> f64 {
        self.origin_span_gyr - self.offset_years(year) as f64 / YEARS_PER_GYR
    }
}

/// Elapsed time since the origin using the default constants.
pub fn elapsed_since_origin(year: i64) -> f64 {
    EpochConstants::default().elapsed_gyr(Year(year))
}
