//! Grouping of textured meshes into named pieces.

/// Model-to-registry indexing.
pub mod index;
/// Canonical piece names.
pub mod naming;
/// Pieces, member meshes and attached artwork.
pub mod registry;
