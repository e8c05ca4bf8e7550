//! Three-strand parametric helix drawn behind the convergence markers.
//!
//! Each strand follows
//!
//! ```text
//! x = a_x * sin(f * z + phi)
//! y = a_y * cos(f * z + phi)
//! ```
//!
//! over an evenly spaced z domain measured in calendar years, with the
//! three strands a third of a turn apart.

use std::f64::consts::PI;

use serde::{Serialize, Deserialize};

/// Strand names in phase order.
pub const STRAND_NAMES: [&str; 3] = ["Devi 1", "Devi 2", "Devi 3"];

/// Strand colors in phase order, as (CSS name, RGB).
pub const STRAND_COLORS: [(&str, [u8; 3]); 3] = [
    ("yellow", [255, 255, 0]),
    ("orange", [255, 165, 0]),
    ("red", [255, 0, 0]),
];

/// Parameters for the helix curve.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelixParams {
    /// First z sample, in calendar years (default: -6000).
    pub z_start: f64,

    /// Last z sample, inclusive (default: 2100).
    pub z_end: f64,

    /// Number of samples along z (default: 1000).
    pub samples: usize,

    /// Angular frequency per year (default: 1e-6).
    pub frequency: f64,

    /// Half-width along x (default: 0.5).
    pub x_amplitude: f64,

    /// Half-width along y (default: 0.25).
    pub y_amplitude: f64,
}

impl Default for HelixParams {
    fn default() -> Self {
        Self {
            z_start: -6000.0,
            z_end: 2100.0,
            samples: 1000,
            frequency: 0.000001,
            x_amplitude: 0.5,
            y_amplitude: 0.25,
        }
    }
}

/// One sampled strand of the helix.
#[derive(Clone, Debug, PartialEq)]
pub struct Strand {
    pub name: &'static str,
    pub color: &'static str,
    pub rgb: [u8; 3],
    pub phase: f64,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl Strand {
    pub fn len(&self) -> usize {
        self.z.len()
    }

    pub fn is_empty(&self) -> bool {
        self.z.is_empty()
    }
}

/// `num` evenly spaced values over `[start, end]`, both ends included.
///
/// One sample yields `[start]`; zero samples yield an empty vector.
pub fn linspace(start: f64, end: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (num - 1) as f64;
            let mut values: Vec<f64> = (0..num).map(|i| start + step * i as f64).collect();
            // Pin the last sample so rounding never drifts past the end.
            values[num - 1] = end;
            values
        }
    }
}

/// Phase offsets for the three strands: 0, 2π/3, 4π/3.
pub fn strand_phases() -> [f64; 3] {
    [0.0, 2.0 * PI / 3.0, 4.0 * PI / 3.0]
}

/// Sample all three strands.
pub fn generate_strands(params: &HelixParams) -> Vec<Strand> {
    let z = linspace(params.z_start, params.z_end, params.samples);

    strand_phases()
        .iter()
        .enumerate()
        .map(|(i, &phase)| {
            let x = z
                .iter()
                .map(|&zv| params.x_amplitude * (params.frequency * zv + phase).sin())
                .collect();
            let y = z
                .iter()
                .map(|&zv| params.y_amplitude * (params.frequency * zv + phase).cos())
                .collect();
            let (color, rgb) = STRAND_COLORS[i];
            Strand {
                name: STRAND_NAMES[i],
                color,
                rgb,
                phase,
                x,
                y,
                z: z.clone(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linspace_endpoints() {
        let v = linspace(-6000.0, 2100.0, 1000);
        assert_eq!(v.len(), 1000);
        assert_eq!(v[0], -6000.0);
        assert_eq!(v[999], 2100.0);
        let step = v[1] - v[0];
        assert!((step - 8100.0 / 999.0).abs() < 1e-9);
    }

    #[test]
    fn test_linspace_degenerate() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(3.0, 9.0, 1), vec![3.0]);
        assert_eq!(linspace(0.0, 1.0, 2), vec![0.0, 1.0]);
    }

    #[test]
    fn test_three_strands_share_z() {
        let strands = generate_strands(&HelixParams::default());
        assert_eq!(strands.len(), 3);
        for s in &strands {
            assert_eq!(s.len(), 1000);
            assert_eq!(s.x.len(), 1000);
            assert_eq!(s.y.len(), 1000);
            assert_eq!(s.z, strands[0].z);
        }
        assert_eq!(strands[0].name, "Devi 1");
        assert_eq!(strands[1].color, "orange");
        assert_eq!(strands[2].rgb, [255, 0, 0]);
    }

    #[test]
    fn test_strand_formula_at_origin() {
        let params = HelixParams { z_start: 0.0, z_end: 0.0, samples: 1, ..Default::default() };
        let strands = generate_strands(&params);
        // z = 0: x = 0.5 sin(phi), y = 0.25 cos(phi)
        assert!((strands[0].x[0] - 0.0).abs() < 1e-12);
        assert!((strands[0].y[0] - 0.25).abs() < 1e-12);
        let phi = 2.0 * PI / 3.0;
        assert!((strands[1].x[0] - 0.5 * phi.sin()).abs() < 1e-12);
        assert!((strands[1].y[0] - 0.25 * phi.cos()).abs() < 1e-12);
    }

    #[test]
    fn test_strands_stay_within_amplitude() {
        let params = HelixParams::default();
        for s in generate_strands(&params) {
            for (x, y) in s.x.iter().zip(&s.y) {
                assert!(x.abs() <= params.x_amplitude + 1e-12);
                assert!(y.abs() <= params.y_amplitude + 1e-12);
            }
        }
    }

    #[test]
    fn test_zero_samples_gives_empty_strands() {
        let params = HelixParams { samples: 0, ..Default::default() };
        let strands = generate_strands(&params);
        assert_eq!(strands.len(), 3);
        assert!(strands.iter().all(|s| s.is_empty()));
    }
}
