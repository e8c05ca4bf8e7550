//! PNG and JSON export of the convergence figures.
//!
//! Both charts are drawn with `plotters` into an in-memory RGB buffer,
//! which `image` then encodes. Axis ranges always come from the figure
//! data, so every point lands inside the plotting area.
//!
//! Text is rasterized only when the crate is built with the `ttf` feature
//! (system fonts through plotters' font-kit backend). Without it, labels
//! still take up layout space but draw nothing.

use std::fs::File;
use std::io::BufWriter;
use std::ops::Range;

use image::RgbImage;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::{Result, VisualizerError};
use crate::figure::{
    FigureBundle, HelixFigure, MarkerSymbol, NamedColor, TimelineFigure, HELIX_X_TITLE,
    HELIX_Y_TITLE, YEAR_AXIS_TITLE,
};

/// Smallest chart edge in pixels that leaves room for caption and axes.
pub const MIN_CHART_SIZE: u32 = 160;

const FONT: &str = "sans-serif";

/// Camera for the helix chart, in radians.
const VIEW_YAW: f64 = 0.6;
const VIEW_PITCH: f64 = 0.25;

type PlotResult<E> = std::result::Result<(), DrawingAreaErrorKind<E>>;

fn rgb(color: NamedColor) -> RGBColor {
    RGBColor(color.rgb[0], color.rgb[1], color.rgb[2])
}

fn min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Half-width of a symmetric axis holding every value, never below 1.
fn symmetric_half(values: impl Iterator<Item = f64>) -> f64 {
    let max_abs = values.map(f64::abs).fold(0.0, f64::max);
    (max_abs.max(1.0) * 1.1).min(f64::MAX / 4.0)
}

/// Axis ranges for the timeline: every point and annotation, padded, with
/// headroom above for the labels.
pub fn timeline_ranges(fig: &TimelineFigure) -> (Range<f64>, Range<f64>) {
    let xs = fig
        .data
        .iter()
        .flat_map(|t| t.x.iter().copied())
        .chain(fig.layout.annotations.iter().map(|a| a.x));
    let ys = fig
        .data
        .iter()
        .flat_map(|t| t.y.iter().copied())
        .chain(fig.layout.annotations.iter().map(|a| a.y));

    let (x_lo, x_hi) = min_max(xs).unwrap_or((0.0, 1.0));
    let (y_lo, y_hi) = min_max(ys).unwrap_or((0.0, 0.0));
    let x_pad = ((x_hi - x_lo) * 0.05).max(1.0);

    ((x_lo - x_pad)..(x_hi + x_pad), (y_lo - 0.15)..(y_hi + 0.25))
}

/// Axis ranges for the helix chart.
#[derive(Clone, Debug, PartialEq)]
pub struct HelixRanges {
    pub x: Range<f64>,
    pub y: Range<f64>,
    /// Calendar years, drawn as the vertical axis.
    pub year: Range<f64>,
}

pub fn helix_ranges(fig: &HelixFigure) -> HelixRanges {
    let x_half = symmetric_half(fig.data.iter().flat_map(|t| t.x.iter().copied()));
    let y_half = symmetric_half(fig.data.iter().flat_map(|t| t.y.iter().copied()));
    let (z_lo, z_hi) =
        min_max(fig.data.iter().flat_map(|t| t.z.iter().copied())).unwrap_or((-1.0, 1.0));
    let z_pad = ((z_hi - z_lo) * 0.04).max(1.0);

    HelixRanges {
        x: -x_half..x_half,
        y: -y_half..y_half,
        year: (z_lo - z_pad)..(z_hi + z_pad),
    }
}

fn render_error(e: impl std::fmt::Display) -> VisualizerError {
    VisualizerError::Render(e.to_string())
}

/// Run `draw` against a white `width` x `height` bitmap and return it.
fn rasterize<F>(width: u32, height: u32, draw: F) -> Result<RgbImage>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, Shift>) -> std::result::Result<(), String>,
{
    if width < MIN_CHART_SIZE || height < MIN_CHART_SIZE {
        return Err(VisualizerError::Render(format!(
            "chart must be at least {0}x{0} pixels, got {1}x{2}",
            MIN_CHART_SIZE, width, height
        )));
    }

    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw(&root).map_err(VisualizerError::Render)?;
        root.present().map_err(render_error)?;
    }
    RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| VisualizerError::Render("bitmap size mismatch".to_string()))
}

fn draw_timeline<DB: DrawingBackend>(
    fig: &TimelineFigure,
    root: &DrawingArea<DB, Shift>,
) -> PlotResult<DB::ErrorType> {
    root.fill(&WHITE)?;
    let (x_range, y_range) = timeline_ranges(fig);

    let mut chart = ChartBuilder::on(root)
        .caption(&fig.layout.title.text, (FONT, 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    let year_label = |v: &f64| format!("{:.0}", v);
    let mut mesh = chart.configure_mesh();
    mesh.x_desc(fig.layout.xaxis.title.text.as_str())
        .y_desc(fig.layout.yaxis.title.text.as_str())
        .x_labels(8)
        .y_labels(6)
        .x_label_formatter(&year_label);
    if !fig.layout.xaxis.showgrid {
        mesh.disable_x_mesh();
    }
    if !fig.layout.yaxis.showgrid {
        mesh.disable_y_mesh();
    }
    mesh.draw()?;

    chart.draw_series(fig.layout.annotations.iter().map(|note| {
        Text::new(
            note.text.clone(),
            (note.x, note.y),
            (FONT, 12).into_font().color(&BLACK),
        )
    }))?;

    for trace in &fig.data {
        let Some(marker) = trace.marker else { continue };
        let style = rgb(marker.color).filled();
        let radius = (marker.size / 2 + 1) as i32;
        let points = trace.x.iter().copied().zip(trace.y.iter().copied());
        match marker.symbol {
            MarkerSymbol::Circle => chart
                .draw_series(points.map(|p| Circle::new(p, radius, style)))?
                .label(trace.name.as_str())
                .legend(move |(x, y)| Circle::new((x, y), radius, style)),
            MarkerSymbol::X => chart
                .draw_series(points.map(|p| Cross::new(p, radius, style)))?
                .label(trace.name.as_str())
                .legend(move |(x, y)| Cross::new((x, y), radius, style)),
        };
    }

    if fig.layout.showlegend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }
    Ok(())
}

fn draw_helix<DB: DrawingBackend>(
    fig: &HelixFigure,
    root: &DrawingArea<DB, Shift>,
) -> PlotResult<DB::ErrorType> {
    root.fill(&WHITE)?;
    let ranges = helix_ranges(fig);

    // plotters draws its y axis vertically, so years go there and the
    // strand's y becomes depth.
    let mut chart = ChartBuilder::on(root)
        .caption(&fig.layout.title.text, (FONT, 22))
        .margin(10)
        .build_cartesian_3d(ranges.x.clone(), ranges.year.clone(), ranges.y.clone())?;
    chart.with_projection(|mut pb| {
        pb.yaw = VIEW_YAW;
        pb.pitch = VIEW_PITCH;
        pb.scale = 0.8;
        pb.into_matrix()
    });
    chart
        .configure_axes()
        .light_grid_style(BLACK.mix(0.1))
        .max_light_lines(3)
        .draw()?;

    let title_font = (FONT, 13).into_font().color(&BLACK);
    chart.draw_series([
        Text::new(HELIX_X_TITLE, (ranges.x.end, ranges.year.start, 0.0), title_font.clone()),
        Text::new(HELIX_Y_TITLE, (0.0, ranges.year.start, ranges.y.end), title_font.clone()),
        Text::new(YEAR_AXIS_TITLE, (0.0, ranges.year.end, 0.0), title_font),
    ])?;

    for trace in &fig.data {
        let Some(line) = trace.line else { continue };
        let style = ShapeStyle::from(&rgb(line.color)).stroke_width(2);
        let points = trace
            .x
            .iter()
            .zip(&trace.y)
            .zip(&trace.z)
            .map(|((&x, &y), &z)| (x, z, y));
        chart
            .draw_series(LineSeries::new(points, style))?
            .label(trace.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    let label_font = (FONT, 12)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    for trace in &fig.data {
        let Some(marker) = trace.marker else { continue };
        let style = rgb(marker.color).filled();
        let radius = (marker.size / 2) as i32;
        let points: Vec<(f64, f64, f64)> = trace
            .x
            .iter()
            .zip(&trace.y)
            .zip(&trace.z)
            .map(|((&x, &y), &z)| (x, z, y))
            .collect();

        match marker.symbol {
            MarkerSymbol::Circle => chart
                .draw_series(points.iter().map(|&p| Circle::new(p, radius, style)))?
                .label(trace.name.as_str())
                .legend(move |(x, y)| Circle::new((x, y), radius, style)),
            MarkerSymbol::X => chart
                .draw_series(points.iter().map(|&p| Cross::new(p, radius, style)))?
                .label(trace.name.as_str())
                .legend(move |(x, y)| Cross::new((x, y), radius, style)),
        };

        if trace.textposition.is_some() {
            chart.draw_series(
                points
                    .iter()
                    .zip(&trace.text)
                    .map(|(&p, label)| Text::new(label.clone(), p, label_font.clone())),
            )?;
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}

/// Rasterize the 2D timeline.
pub fn render_timeline_png(fig: &TimelineFigure, width: u32, height: u32) -> Result<RgbImage> {
    rasterize(width, height, |root| draw_timeline(fig, root).map_err(|e| e.to_string()))
}

/// Rasterize the 3D helix figure.
pub fn render_helix_png(fig: &HelixFigure, width: u32, height: u32) -> Result<RgbImage> {
    rasterize(width, height, |root| draw_helix(fig, root).map_err(|e| e.to_string()))
}

/// Export the timeline figure as PNG.
pub fn export_timeline_png(fig: &TimelineFigure, width: u32, height: u32, path: &str) -> Result<()> {
    render_timeline_png(fig, width, height)?.save(path)?;
    Ok(())
}

/// Export the helix figure as PNG.
pub fn export_helix_png(fig: &HelixFigure, width: u32, height: u32, path: &str) -> Result<()> {
    render_helix_png(fig, width, height)?.save(path)?;
    Ok(())
}

/// Write both figures and the reading as pretty-printed JSON.
pub fn export_figures_json(bundle: &FigureBundle, path: &str) -> Result<()> {
    let writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(writer, bundle)?;
    Ok(())
}
