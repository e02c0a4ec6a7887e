use super::*;
use crate::foundation::core::{Vec2, Vec3};
use crate::scene::model::MeshNode;

fn tri(name: &str, uvs: Option<Vec<Vec2>>) -> MeshNode {
    let node = MeshNode::new(name, vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![0, 1, 2]);
    match uvs {
        Some(uvs) => node.with_uvs(uvs),
        None => node,
    }
}

#[test]
fn groups_by_canonical_name_and_skips_untextured_meshes() {
    let model = Model::from_meshes(vec![
        tri(
            "Sleeve_1",
            Some(vec![Vec2::new(0.1, 0.2), Vec2::new(0.3, 0.2), Vec2::new(0.1, 0.4)]),
        ),
        tri("Buttons", None),
        tri(
            "Front",
            Some(vec![Vec2::new(0.5, 0.5), Vec2::new(0.9, 0.5), Vec2::new(0.5, 0.8)]),
        ),
        tri(
            "sleeve-2",
            Some(vec![Vec2::new(0.6, 0.0), Vec2::new(0.7, 0.0), Vec2::new(0.6, 0.1)]),
        ),
    ]);

    let reg = index_meshes(&model);
    assert_eq!(reg.names().collect::<Vec<_>>(), ["SLEEVE", "FRONT"]);

    let sleeve = reg.get("SLEEVE").unwrap();
    assert_eq!(sleeve.members().len(), 2);
    assert_eq!(sleeve.members()[0].mesh, MeshId(0));
    assert_eq!(sleeve.members()[1].mesh, MeshId(3));
    let b = sleeve.members()[1].bounds;
    assert_eq!((b.u_min, b.u_max, b.v_min, b.v_max), (0.6, 0.7, 0.0, 0.1));
    assert!(reg.get("BUTTONS").is_none());
}

#[test]
fn bounds_contain_every_uv_and_are_tight() {
    let uvs = vec![
        Vec2::new(0.31, 0.9),
        Vec2::new(0.05, 0.42),
        Vec2::new(0.77, 0.13),
        Vec2::new(0.5, 0.5),
    ];
    let model = Model::from_meshes(vec![tri("Panel", Some(uvs.clone()))]);
    let reg = index_meshes(&model);
    let b = reg.get("PANEL").unwrap().members()[0].bounds;

    assert!(uvs.iter().all(|uv| b.contains(*uv)));
    assert!(uvs.iter().any(|uv| uv.x == b.u_min));
    assert!(uvs.iter().any(|uv| uv.x == b.u_max));
    assert!(uvs.iter().any(|uv| uv.y == b.v_min));
    assert!(uvs.iter().any(|uv| uv.y == b.v_max));
}

#[test]
fn indexing_leaves_the_model_untouched() {
    let model = Model::from_meshes(vec![tri("A", Some(vec![Vec2::ZERO; 3]))]);
    let before = model.descriptors();
    let _ = index_meshes(&model);
    assert_eq!(model.descriptors(), before);
    assert_eq!(model.overlay_count(), 0);
}
