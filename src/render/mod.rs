//! CPU rendering of the studio scene.

/// Perspective camera and model framing.
pub mod camera;
/// Premultiplied RGBA8 blend helpers.
pub mod composite;
/// Software rasterizer with base and overlay passes.
pub mod cpu;
