//! Convergence point visualizer library
//!
//! Re-exports modules for use by the binary and tests.

pub mod ascii;
pub mod calendar;
pub mod config;
pub mod convergence;
pub mod epoch;
pub mod error;
pub mod explorer;
pub mod export;
pub mod figure;
pub mod helix;
pub mod report;

pub use calendar::Year;
pub use convergence::{ConvergencePoint, ConvergenceTable};
pub use epoch::{elapsed_since_origin, EpochConstants};
pub use error::{Result, VisualizerError};
