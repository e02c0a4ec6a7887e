//! Per-mesh overlay surfaces.

/// Overlay creation, update and texture mapping.
pub mod compositor;
