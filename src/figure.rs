//! Chart descriptions handed to renderers.
//!
//! Figures use Plotly's trace vocabulary (`scatter3d`, `mode`, `marker`,
//! `textposition`, ...) so the JSON export can be fed straight to
//! plotly.js. The PNG rasterizer in [`crate::export`] reads the same
//! structures.

use serde::{Serialize, Serializer};

use crate::calendar::Year;
use crate::convergence::ConvergenceTable;
use crate::helix::{generate_strands, HelixParams};
use crate::report::Reading;

pub const HELIX_TITLE: &str = "Triple Helix Model with Convergence Points";
pub const HELIX_X_TITLE: &str = "Time Strand (-1 to 1)";
pub const HELIX_Y_TITLE: &str = "Cosmic Flow (-1 to -0.25)";
pub const YEAR_AXIS_TITLE: &str = "Year (BCE/CE)";

pub const TIMELINE_TITLE: &str = "Timeline of Convergence Points";
pub const TIMELINE_Y_TITLE: &str = "Convergence Level";

/// Vertical offset of the timeline labels above/below the axis.
pub const LABEL_OFFSET: f64 = 0.1;

/// A CSS color name with its RGB value. Serializes as the name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NamedColor {
    pub name: &'static str,
    pub rgb: [u8; 3],
}

impl NamedColor {
    pub const RED: NamedColor = NamedColor { name: "red", rgb: [255, 0, 0] };
    pub const BLUE: NamedColor = NamedColor { name: "blue", rgb: [0, 0, 255] };

    pub const fn new(name: &'static str, rgb: [u8; 3]) -> Self {
        Self { name, rgb }
    }
}

impl Serialize for NamedColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerSymbol {
    Circle,
    X,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub symbol: MarkerSymbol,
    pub size: u32,
    pub color: NamedColor,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct LineStyle {
    pub color: NamedColor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceKind {
    Scatter,
    Scatter3d,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TraceMode {
    #[serde(rename = "lines")]
    Lines,
    #[serde(rename = "markers")]
    Markers,
    #[serde(rename = "markers+text")]
    MarkersText,
}

/// A single Plotly-style trace. `z` is empty for 2D traces.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: TraceKind,
    pub name: String,
    pub mode: TraceMode,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub z: Vec<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<LineStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub textposition: Option<&'static str>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
}

impl Title {
    fn new(text: &str) -> Self {
        Self { text: text.to_string() }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
    pub showgrid: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Scene {
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub zaxis: Axis,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HelixLayout {
    pub title: Title,
    pub scene: Scene,
}

/// 3D helix with convergence and input markers along the year axis.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HelixFigure {
    pub data: Vec<Trace>,
    pub layout: HelixLayout,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Font {
    pub size: u32,
}

/// Free text pinned to data coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
    /// Degrees, clockwise positive (Plotly convention).
    pub textangle: f64,
    pub font: Font,
    pub showarrow: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineLayout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub showlegend: bool,
    pub annotations: Vec<Annotation>,
}

/// 2D timeline with every point on the zero line.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineFigure {
    pub data: Vec<Trace>,
    pub layout: TimelineLayout,
}

/// Everything the JSON export carries for one input year.
#[derive(Clone, Debug, Serialize)]
pub struct FigureBundle {
    pub year: Year,
    pub elapsed_gyr: f64,
    /// RFC 3339 timestamp of when the bundle was built.
    pub generated_at: String,
    pub helix: HelixFigure,
    pub timeline: TimelineFigure,
}

impl FigureBundle {
    pub fn new(reading: &Reading, helix: HelixFigure, timeline: TimelineFigure) -> Self {
        Self {
            year: reading.year,
            elapsed_gyr: reading.elapsed_gyr,
            generated_at: chrono::Utc::now().to_rfc3339(),
            helix,
            timeline,
        }
    }
}

fn axis(title: &str) -> Axis {
    Axis { title: Title::new(title), showgrid: true }
}

/// Text attached to the input-year marker.
pub fn input_year_text(year: Year) -> String {
    format!("Year {}", year.value())
}

/// Build the 3D figure: three strands, one `x` per convergence point and
/// a blue circle for the input year, all markers on the z axis.
pub fn build_helix_figure(params: &HelixParams, table: &ConvergenceTable, year: Year) -> HelixFigure {
    let mut data: Vec<Trace> = generate_strands(params)
        .into_iter()
        .map(|s| Trace {
            kind: TraceKind::Scatter3d,
            name: s.name.to_string(),
            mode: TraceMode::Lines,
            x: s.x,
            y: s.y,
            z: s.z,
            line: Some(LineStyle { color: NamedColor::new(s.color, s.rgb) }),
            marker: None,
            text: Vec::new(),
            textposition: None,
        })
        .collect();

    for point in table.iter() {
        data.push(Trace {
            kind: TraceKind::Scatter3d,
            name: point.label.to_string(),
            mode: TraceMode::MarkersText,
            x: vec![0.0],
            y: vec![0.0],
            z: vec![point.year.value() as f64],
            line: None,
            marker: Some(Marker { symbol: MarkerSymbol::X, size: 10, color: NamedColor::RED }),
            text: vec![point.label.to_string()],
            textposition: Some("top center"),
        });
    }

    data.push(Trace {
        kind: TraceKind::Scatter3d,
        name: "Input Year".to_string(),
        mode: TraceMode::MarkersText,
        x: vec![0.0],
        y: vec![0.0],
        z: vec![year.value() as f64],
        line: None,
        marker: Some(Marker { symbol: MarkerSymbol::Circle, size: 10, color: NamedColor::BLUE }),
        text: vec![input_year_text(year)],
        textposition: Some("top center"),
    });

    HelixFigure {
        data,
        layout: HelixLayout {
            title: Title::new(HELIX_TITLE),
            scene: Scene {
                xaxis: axis(HELIX_X_TITLE),
                yaxis: axis(HELIX_Y_TITLE),
                zaxis: axis(YEAR_AXIS_TITLE),
            },
        },
    }
}

/// Build the 2D timeline: red points for the table, a blue point for the
/// input year, labels above the line and the input caption below it.
pub fn build_timeline_figure(table: &ConvergenceTable, year: Year) -> TimelineFigure {
    let years: Vec<f64> = table.iter().map(|p| p.year.value() as f64).collect();
    let zeros = vec![0.0; years.len()];

    let convergence = Trace {
        kind: TraceKind::Scatter,
        name: "Convergence Points".to_string(),
        mode: TraceMode::Markers,
        x: years,
        y: zeros,
        z: Vec::new(),
        line: None,
        marker: Some(Marker { symbol: MarkerSymbol::Circle, size: 6, color: NamedColor::RED }),
        text: Vec::new(),
        textposition: None,
    };

    let input = Trace {
        kind: TraceKind::Scatter,
        name: "Input Year".to_string(),
        mode: TraceMode::Markers,
        x: vec![year.value() as f64],
        y: vec![0.0],
        z: Vec::new(),
        line: None,
        marker: Some(Marker { symbol: MarkerSymbol::Circle, size: 6, color: NamedColor::BLUE }),
        text: Vec::new(),
        textposition: None,
    };

    let mut annotations: Vec<Annotation> = table
        .iter()
        .map(|p| Annotation {
            x: p.year.value() as f64,
            y: LABEL_OFFSET,
            text: p.label.to_string(),
            textangle: -45.0,
            font: Font { size: 8 },
            showarrow: false,
        })
        .collect();
    annotations.push(Annotation {
        x: year.value() as f64,
        y: -LABEL_OFFSET,
        text: input_year_text(year),
        textangle: 0.0,
        font: Font { size: 8 },
        showarrow: false,
    });

    TimelineFigure {
        data: vec![convergence, input],
        layout: TimelineLayout {
            title: Title::new(TIMELINE_TITLE),
            xaxis: axis(YEAR_AXIS_TITLE),
            yaxis: axis(TIMELINE_Y_TITLE),
            showlegend: true,
            annotations,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_helix_trace_layout() {
        let table = ConvergenceTable::reference();
        let fig = build_helix_figure(&HelixParams::default(), &table, Year(1993));
        // 3 strands + 5 convergence markers + input marker
        assert_eq!(fig.data.len(), 9);
        assert!(fig.data[..3].iter().all(|t| t.mode == TraceMode::Lines));
        assert_eq!(fig.data[3].name, "Rama's Birth");
        assert_eq!(fig.data[3].z, vec![-5114.0]);
        assert_eq!(fig.data[3].marker.unwrap().symbol, MarkerSymbol::X);

        let input = fig.data.last().unwrap();
        assert_eq!(input.name, "Input Year");
        assert_eq!(input.z, vec![1993.0]);
        assert_eq!(input.text, vec!["Year 1993".to_string()]);
        assert_eq!(input.marker.unwrap().color, NamedColor::BLUE);
        assert_eq!(fig.layout.title.text, HELIX_TITLE);
        assert_eq!(fig.layout.scene.zaxis.title.text, "Year (BCE/CE)");
    }

    #[test]
    fn test_timeline_points_and_annotations() {
        let table = ConvergenceTable::reference();
        let fig = build_timeline_figure(&table, Year(-100));
        assert_eq!(fig.data.len(), 2);
        assert_eq!(fig.data[0].x, vec![-5114.0, -3228.0, 1956.0, 1993.0, 2067.0]);
        assert!(fig.data[0].y.iter().all(|&y| y == 0.0));
        assert_eq!(fig.data[1].x, vec![-100.0]);

        let notes = &fig.layout.annotations;
        assert_eq!(notes.len(), 6);
        assert_eq!(notes[0].y, 0.1);
        assert_eq!(notes[0].textangle, -45.0);
        assert_eq!(notes[5].text, "Year -100");
        assert_eq!(notes[5].y, -0.1);
    }

    #[test]
    fn test_helix_json_uses_plotly_keys() {
        let table = ConvergenceTable::reference();
        let params = HelixParams { samples: 4, ..Default::default() };
        let fig = build_helix_figure(&params, &table, Year(1993));
        let json = serde_json::to_value(&fig).unwrap();

        assert_eq!(json["data"][0]["type"], "scatter3d");
        assert_eq!(json["data"][0]["mode"], "lines");
        assert_eq!(json["data"][0]["line"]["color"], "yellow");
        assert!(json["data"][0].get("marker").is_none());
        assert_eq!(json["data"][3]["mode"], "markers+text");
        assert_eq!(json["data"][3]["marker"]["symbol"], "x");
        assert_eq!(json["data"][3]["textposition"], "top center");
        assert_eq!(json["layout"]["scene"]["xaxis"]["title"]["text"], HELIX_X_TITLE);
    }

    #[test]
    fn test_bundle_carries_reading() {
        let table = ConvergenceTable::reference();
        let reading = Reading::compute(&Default::default(), Year(-5114));
        let params = HelixParams { samples: 2, ..Default::default() };
        let bundle = FigureBundle::new(
            &reading,
            build_helix_figure(&params, &table, reading.year),
            build_timeline_figure(&table, reading.year),
        );
        let json = serde_json::to_value(&bundle).unwrap();
        assert_eq!(json["year"], -5114);
        assert_eq!(json["elapsed_gyr"].as_f64(), Some(reading.elapsed_gyr));
        assert!(chrono::DateTime::parse_from_rfc3339(json["generated_at"].as_str().unwrap()).is_ok());
        assert_eq!(json["timeline"]["layout"]["title"]["text"], TIMELINE_TITLE);
    }

    #[test]
    fn test_timeline_json_omits_z() {
        let fig = build_timeline_figure(&ConvergenceTable::reference(), Year(1993));
        let json = serde_json::to_value(&fig).unwrap();
        assert_eq!(json["data"][0]["type"], "scatter");
        assert!(json["data"][0].get("z").is_none());
        assert_eq!(json["layout"]["yaxis"]["title"]["text"], TIMELINE_Y_TITLE);
    }
}
