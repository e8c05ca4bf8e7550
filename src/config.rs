//! Configuration for the visualizer.
//!
//! Every field has a default, so a config file only needs the keys it
//! overrides. The input year itself is never range-checked.

use std::fs;
use std::path::Path;

use serde::{Serialize, Deserialize};
use tracing::info;

use crate::epoch::EpochConstants;
use crate::error::{Result, VisualizerError};
use crate::export::MIN_CHART_SIZE;
use crate::helix::HelixParams;

/// Year shown when none is given on the command line.
pub const DEFAULT_YEAR: i64 = 1993;

/// Upper bound on helix samples per strand.
pub const MAX_HELIX_SAMPLES: usize = 100_000;

/// Output sizes for the rasterized charts and the ASCII timeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Timeline PNG width in pixels (default: 1000).
    pub timeline_width: u32,

    /// Timeline PNG height in pixels (default: 600).
    pub timeline_height: u32,

    /// Helix PNG width in pixels (default: 800).
    pub helix_width: u32,

    /// Helix PNG height in pixels (default: 800).
    pub helix_height: u32,

    /// Width of the ASCII timeline in columns (default: 72).
    pub ascii_width: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            timeline_width: 1000,
            timeline_height: 600,
            helix_width: 800,
            helix_height: 800,
            ascii_width: 72,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Year used when the command line does not supply one.
    pub default_year: i64,

    pub epoch: EpochConstants,

    pub helix: HelixParams,

    pub render: RenderConfig,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            default_year: DEFAULT_YEAR,
            epoch: EpochConstants::default(),
            helix: HelixParams::default(),
            render: RenderConfig::default(),
        }
    }
}

impl VisualizerConfig {
    /// Parse a TOML document and validate it.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| VisualizerError::ConfigParse(origin.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content, path)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Reject settings the renderers cannot work with.
    pub fn validate(&self) -> Result<()> {
        let r = &self.render;
        let min = MIN_CHART_SIZE;
        if r.timeline_width < min || r.timeline_height < min {
            return Err(VisualizerError::InvalidConfig(format!(
                "timeline image must be at least {}x{}, got {}x{}",
                min, min, r.timeline_width, r.timeline_height
            )));
        }
        if r.helix_width < min || r.helix_height < min {
            return Err(VisualizerError::InvalidConfig(format!(
                "helix image must be at least {}x{}, got {}x{}",
                min, min, r.helix_width, r.helix_height
            )));
        }
        if r.ascii_width < 16 {
            return Err(VisualizerError::InvalidConfig(format!(
                "ascii_width must be at least 16, got {}",
                r.ascii_width
            )));
        }

        let h = &self.helix;
        if h.samples > MAX_HELIX_SAMPLES {
            return Err(VisualizerError::InvalidConfig(format!(
                "helix.samples must be at most {}, got {}",
                MAX_HELIX_SAMPLES, h.samples
            )));
        }
        let finite = [h.z_start, h.z_end, h.frequency, h.x_amplitude, h.y_amplitude];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(VisualizerError::InvalidConfig(
                "helix parameters must be finite numbers".to_string(),
            ));
        }
        if !self.epoch.origin_span_gyr.is_finite() {
            return Err(VisualizerError::InvalidConfig(
                "epoch.origin_span_gyr must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Serialize back to TOML.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
