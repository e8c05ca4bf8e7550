//! Signed calendar years with a BCE/CE split.
//!
//! Positive years are CE. Zero and negative years are BCE, with the
//! magnitude as written, so Year 0 displays as `0 BCE`.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Era half of the calendar a year falls into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Era {
    Bce,
    Ce,
}

impl Era {
    pub fn suffix(&self) -> &'static str {
        match self {
            Era::Bce => "BCE",
            Era::Ce => "CE",
        }
    }
}

/// A calendar year. Any `i64` is a legal year.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Year(pub i64);

impl Year {
    pub fn value(&self) -> i64 {
        self.0
    }

    /// CE for strictly positive years, BCE otherwise (including zero).
    pub fn era(&self) -> Era {
        if self.0 > 0 { Era::Ce } else { Era::Bce }
    }

    pub fn is_ce(&self) -> bool {
        self.era() == Era::Ce
    }

    /// Number of years counted within the era (5114 for -5114).
    pub fn magnitude(&self) -> u64 {
        self.0.unsigned_abs()
    }

    /// Shift by a signed number of years, saturating at the `i64` limits.
    pub fn offset(&self, delta: i64) -> Self {
        Self(self.0.saturating_add(delta))
    }
}

impl From<i64> for Year {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.magnitude(), self.era().suffix())
    }
}
