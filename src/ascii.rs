//! ASCII rendering and export of the convergence timeline
//!
//! Renders the timeline as fixed-width text and writes the full text
//! report to a file.

use std::fs::File;
use std::io::{self, Write};
use chrono::Local;

use crate::calendar::Year;
use crate::convergence::ConvergenceTable;
use crate::epoch::EpochConstants;
use crate::report::Reading;

/// Character for a convergence point on the axis
pub const POINT_CHAR: char = 'o';
/// Character for the input year (drawn over a convergence point)
pub const INPUT_CHAR: char = '@';
/// Axis fill character
pub const AXIS_CHAR: char = '-';

/// Year range covered by the timeline: the table plus the input year.
pub fn timeline_bounds(table: &ConvergenceTable, year: Year) -> (Year, Year) {
    match table.span() {
        Some((lo, hi)) => (lo.min(year), hi.max(year)),
        None => (year, year),
    }
}

/// Column (0-based) a year falls on in a timeline `width` columns wide.
pub fn marker_column(year: Year, min: Year, max: Year, width: usize) -> usize {
    if width <= 1 {
        return 0;
    }
    let span = max.value() as i128 - min.value() as i128;
    if span <= 0 {
        return 0;
    }
    let offset = (year.value() as i128 - min.value() as i128).clamp(0, span);
    let t = offset as f64 / span as f64;
    ((t * (width - 1) as f64).round() as usize).min(width - 1)
}

/// Render the timeline axis, its end labels and a legend.
pub fn render_timeline(table: &ConvergenceTable, year: Year, width: usize) -> String {
    let width = width.max(2);
    let (min, max) = timeline_bounds(table, year);

    let mut axis: Vec<char> = vec![AXIS_CHAR; width];
    for point in table.iter() {
        axis[marker_column(point.year, min, max, width)] = POINT_CHAR;
    }
    axis[marker_column(year, min, max, width)] = INPUT_CHAR;

    let mut out = String::new();
    out.extend(axis.iter());
    out.push('\n');

    let left = min.value().to_string();
    let right = max.value().to_string();
    let gap = width.saturating_sub(left.len() + right.len()).max(1);
    out.push_str(&left);
    out.push_str(&" ".repeat(gap));
    out.push_str(&right);
    out.push('\n');
    out.push('\n');

    for point in table.iter() {
        out.push_str(&format!("  {}  {:>6}  {}\n", POINT_CHAR, point.year.value(), point.label));
    }
    let matched = table
        .get(year)
        .map(|label| format!(" ({})", label))
        .unwrap_or_default();
    out.push_str(&format!("  {}  {:>6}  Input Year{}\n", INPUT_CHAR, year.value(), matched));

    out
}

/// Tabulate every convergence point with its elapsed time and distance
/// from the input year.
pub fn convergence_table_text(
    table: &ConvergenceTable,
    constants: &EpochConstants,
    year: Year,
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<10} {:<22} {:>16} {:>14}\n",
        "Year", "Label", "Elapsed (Gyr)", "From input"
    ));
    out.push_str(&"-".repeat(65));
    out.push('\n');

    for point in table.iter() {
        let delta = point.year.value() as i128 - year.value() as i128;
        out.push_str(&format!(
            "{:<10} {:<22} {:>16.9} {:>+14}\n",
            point.year.to_string(),
            point.label,
            constants.elapsed_gyr(point.year),
            delta
        ));
    }
    out
}

/// Export the report, ASCII timeline and table to a text file
pub fn export_report_file(
    path: &str,
    reading: &Reading,
    table: &ConvergenceTable,
    constants: &EpochConstants,
    width: usize,
) -> io::Result<()> {
    let mut file = File::create(path)?;

    writeln!(file, "=== CONVERGENCE VISUALIZER REPORT ===")?;
    writeln!(file, "Input year: {} ({})", reading.year.value(), reading.year)?;
    writeln!(
        file,
        "Epoch: {} Gyr at year {}",
        constants.origin_span_gyr, constants.present_year
    )?;
    writeln!(file, "Generated: {}", Local::now().format("%Y-%m-%d %H:%M:%S"))?;
    writeln!(file)?;

    write!(file, "{}", reading.render())?;
    writeln!(file)?;

    writeln!(file, "=== TIMELINE ===")?;
    write!(file, "{}", render_timeline(table, reading.year, width))?;
    writeln!(file)?;

    writeln!(file, "=== CONVERGENCE POINTS ===")?;
    write!(file, "{}", convergence_table_text(table, constants, reading.year))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_marker_column_ends() {
        let (min, max) = (Year(-5114), Year(2067));
        assert_eq!(marker_column(min, min, max, 72), 0);
        assert_eq!(marker_column(max, min, max, 72), 71);
        assert_eq!(marker_column(Year(0), Year(5), Year(5), 72), 0);
    }

    #[test]
    fn test_marker_column_extreme_years() {
        let col = marker_column(Year(0), Year(i64::MIN), Year(i64::MAX), 101);
        assert_eq!(col, 50);
    }

    #[test]
    fn test_axis_row_markers() {
        let table = ConvergenceTable::reference();
        let text = render_timeline(&table, Year(1993), 72);
        let axis = text.lines().next().unwrap();
        assert_eq!(axis.chars().count(), 72);
        assert_eq!(axis.chars().next(), Some(POINT_CHAR));
        assert_eq!(axis.chars().last(), Some(POINT_CHAR));
        assert!(axis.contains(INPUT_CHAR));
    }

    #[test]
    fn test_input_outside_table_extends_range() {
        let table = ConvergenceTable::reference();
        let text = render_timeline(&table, Year(-10000), 40);
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with(INPUT_CHAR));
        assert!(lines.next().unwrap().starts_with("-10000"));
    }

    #[test]
    fn test_legend_flags_matching_point() {
        let table = ConvergenceTable::reference();
        let text = render_timeline(&table, Year(1956), 60);
        assert!(text.contains("Input Year (Suez Crisis)"));
        let text = render_timeline(&table, Year(1957), 60);
        assert!(text.contains("Input Year\n"));
    }

    #[test]
    fn test_table_text_rows() {
        let table = ConvergenceTable::reference();
        let text = convergence_table_text(&table, &EpochConstants::default(), Year(1993));
        assert_eq!(text.lines().count(), 7);
        assert!(text.contains("5114 BCE"));
        assert!(text.contains("13.799992861"));
        assert!(text.contains("+74"));
    }

    #[test]
    fn test_export_report_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");
        let constants = EpochConstants::default();
        let reading = Reading::compute(&constants, Year(-3228));
        export_report_file(
            path.to_str().unwrap(),
            &reading,
            &ConvergenceTable::reference(),
            &constants,
            72,
        )
        .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("=== CONVERGENCE VISUALIZER REPORT ==="));
        assert!(content.contains("Input year: -3228 (3228 BCE)"));
        assert!(content.contains("Time since Big Bang for -3228:"));
        assert!(content.contains("=== TIMELINE ==="));
        assert!(content.contains("Krishna's Birth"));
    }
}
