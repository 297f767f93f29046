//! ascii-reel library crate.
//!
//! Turns video frames into density-calibrated character grids:
//!
//! - [`capture`] walks a time window of a video and samples each frame to a
//!   small RGBA grid
//! - [`ascii`] calibrates character ramps and tone-maps grids to text
//! - [`playback`] selects frames against wall-clock time
//! - [`project`] ties conversion, re-rendering and export together

pub mod ascii;
pub mod capture;
pub mod cli;
pub mod config;
pub mod export;
pub mod playback;
pub mod project;
pub mod raster;
pub mod settings;
pub mod style;
