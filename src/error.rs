//! Error type for the I/O facing parts of the visualizer.
//!
//! The calculator and reference table never fail; only drawing,
//! exporting and config loading can.

use std::path::PathBuf;

/// Errors that can occur while loading config or writing outputs.
#[derive(Debug, thiserror::Error)]
pub enum VisualizerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to draw chart: {0}")]
    Render(String),

    #[error("failed to serialize figures: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse config {0:?}: {1}")]
    ConfigParse(PathBuf, #[source] toml::de::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, VisualizerError>;
