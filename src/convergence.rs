//! Named reference years ("convergence points").
//!
//! The table is fixed at construction and read-only afterwards. Entries
//! keep their insertion order for legends; lookups are by year.

use serde::Serialize;

use crate::calendar::Year;

/// A named year of interest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ConvergencePoint {
    pub year: Year,
    pub label: &'static str,
}

impl ConvergencePoint {
    pub const fn new(year: i64, label: &'static str) -> Self {
        Self { year: Year(year), label }
    }
}

/// The reference entries, in legend order.
pub const REFERENCE_POINTS: [ConvergencePoint; 5] = [
    ConvergencePoint::new(-5114, "Rama's Birth"),
    ConvergencePoint::new(-3228, "Krishna's Birth"),
    ConvergencePoint::new(1956, "Suez Crisis"),
    ConvergencePoint::new(1993, "Your Birth"),
    ConvergencePoint::new(2067, "Future Convergence"),
];

/// Ordered, immutable year-to-label table.
#[derive(Clone, Debug, Serialize)]
pub struct ConvergenceTable {
    points: Vec<ConvergencePoint>,
}

impl Default for ConvergenceTable {
    fn default() -> Self {
        Self::reference()
    }
}

impl ConvergenceTable {
    /// The five built-in convergence points.
    pub fn reference() -> Self {
        Self { points: REFERENCE_POINTS.to_vec() }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Label for `year`, or `None` when the year is not in the table.
    pub fn get(&self, year: Year) -> Option<&'static str> {
        self.points.iter().find(|p| p.year == year).map(|p| p.label)
    }

    pub fn contains(&self, year: Year) -> bool {
        self.get(year).is_some()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ConvergencePoint> {
        self.points.iter()
    }

    pub fn years(&self) -> Vec<Year> {
        self.points.iter().map(|p| p.year).collect()
    }

    /// Earliest and latest year in the table.
    pub fn span(&self) -> Option<(Year, Year)> {
        let min = self.points.iter().map(|p| p.year).min()?;
        let max = self.points.iter().map(|p| p.year).max()?;
        Some((min, max))
    }

    /// Closest entry to `year`; ties go to the earlier table entry.
    pub fn nearest(&self, year: Year) -> Option<&ConvergencePoint> {
        self.points
            .iter()
            .min_by_key(|p| (p.year.value() as i128 - year.value() as i128).unsigned_abs())
    }
}
