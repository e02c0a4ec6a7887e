//! Vector artwork preparation and rasterization.

/// Markup clean-up applied before decoding.
pub mod sanitize;
/// `usvg`/`resvg` rasterization with fit strategies.
pub mod svg_raster;
