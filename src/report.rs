//! Text output: the result line and the descriptive captions.

use serde::Serialize;

use crate::calendar::Year;
use crate::epoch::EpochConstants;

pub const TITLE: &str = "Convergence Point Visualizer with Big Bang Reference";

pub const NOTE: &str = "Note: The visualizations are symbolic, with the Big Bang as the first \
convergence point. Scaling ancient dates is speculative, and interpretations may vary due to the \
blend of spiritual and scientific frameworks.";

/// The computed result for one input year.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Reading {
    pub year: Year,
    pub elapsed_gyr: f64,
}

impl Reading {
    pub fn compute(constants: &EpochConstants, year: Year) -> Self {
        Self { year, elapsed_gyr: constants.elapsed_gyr(year) }
    }

    /// "Time since Big Bang for 1993: 13.800000 billion years"
    pub fn result_line(&self) -> String {
        format!(
            "Time since Big Bang for {}: {:.6} billion years",
            self.year.value(),
            self.elapsed_gyr
        )
    }

    pub fn yantra_description(&self) -> String {
        format!(
            "The yantra, with a blue flame at the apex and Sanskrit text, symbolizes the spiritual \
convergence at {} CE. Imagine a triangular design with nodes for Śrī, Bhū, and Nīlā Devī, set \
against a starry background, highlighting the cosmic alignment at {:.6} billion years since the \
Big Bang.",
            self.year.value(),
            self.elapsed_gyr
        )
    }

    /// Title, result, description and note, one paragraph per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(TITLE);
        out.push('\n');
        out.push_str(&"=".repeat(TITLE.len()));
        out.push_str("\n\n");
        out.push_str(&self.result_line());
        out.push_str("\n\n");
        out.push_str(&self.yantra_description());
        out.push_str("\n\n");
        out.push_str(NOTE);
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_line_six_decimals() {
        let r = Reading::compute(&EpochConstants::default(), Year(-5114));
        assert_eq!(r.result_line(), "Time since Big Bang for -5114: 13.799993 billion years");

        let r = Reading::compute(&EpochConstants::default(), Year(1993));
        assert_eq!(r.result_line(), "Time since Big Bang for 1993: 13.800000 billion years");
    }

    #[test]
    fn test_description_mentions_year_and_value() {
        let r = Reading::compute(&EpochConstants::default(), Year(1956));
        let text = r.yantra_description();
        assert!(text.contains("convergence at 1956 CE."));
        assert!(text.contains("alignment at 13.800000 billion years"));
        assert!(text.contains("Śrī, Bhū, and Nīlā Devī"));
    }

    #[test]
    fn test_render_sections_in_order() {
        let r = Reading::compute(&EpochConstants::default(), Year(1993));
        let text = r.render();
        let title = text.find(TITLE).unwrap();
        let result = text.find("Time since Big Bang").unwrap();
        let note = text.find("Note:").unwrap();
        assert!(title < result && result < note);
    }
}
