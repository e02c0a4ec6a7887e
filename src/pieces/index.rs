use crate::pieces::naming::canonicalize;
use crate::pieces::registry::{MeshRecord, PieceRegistry};
use crate::scene::model::{MeshId, Model};

/// Group the textured meshes of `model` into pieces by canonical name.
///
/// Meshes without usable texture coordinates are skipped. Members keep traversal order.
#[tracing::instrument(skip(model), fields(meshes = model.meshes().len()))]
pub fn index_meshes(model: &Model) -> PieceRegistry {
    let mut registry = PieceRegistry::new();
    for (i, mesh) in model.meshes().iter().enumerate() {
        let Some(bounds) = mesh.uv_bounds() else {
            tracing::debug!(mesh = %mesh.name, "mesh without texture coordinates skipped");
            continue;
        };
        registry.insert_member(
            &canonicalize(&mesh.name),
            MeshRecord {
                mesh: MeshId(i),
                bounds,
            },
        );
    }
    tracing::debug!(pieces = registry.len(), "meshes indexed");
    registry
}

#[cfg(test)]
#[path = "../../tests/unit/pieces/index.rs"]
mod tests;
