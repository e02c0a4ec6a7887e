//! Loaded model representation and the glTF loader.

/// glTF import as a load event stream.
pub mod loader;
/// Flattened meshes with transforms and materials.
pub mod model;
