//! Session-oriented editing API.

/// Raster jobs and their application outcomes.
pub mod jobs;
/// Session options.
pub mod opts;
/// The editing session.
pub mod studio;
