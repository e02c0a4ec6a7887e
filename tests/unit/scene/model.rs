use super::*;

fn quad(name: &str) -> MeshNode {
    MeshNode::new(
        name,
        vec![
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ],
        vec![0, 1, 2, 0, 2, 3],
    )
}

#[test]
fn descriptors_report_uv_presence_and_bounds() {
    let model = Model::from_meshes(vec![
        quad("Front").with_uvs(vec![
            Vec2::new(0.25, 0.5),
            Vec2::new(0.75, 0.5),
            Vec2::new(0.75, 1.0),
            Vec2::new(0.25, 1.0),
        ]),
        quad("Buttons"),
        quad("Empty").with_uvs(Vec::new()),
    ]);

    let d = model.descriptors();
    assert_eq!(d.len(), 3);
    assert_eq!(d[0].id, MeshId(0));
    assert!(d[0].has_uv);
    let b = d[0].bounds.unwrap();
    assert_eq!((b.u_min, b.u_max, b.v_min, b.v_max), (0.25, 0.75, 0.5, 1.0));
    assert!(!d[1].has_uv);
    assert!(d[1].bounds.is_none());
    assert!(!d[2].has_uv);
    assert!(d[2].bounds.is_none());
}

#[test]
fn bounding_sphere_uses_world_transforms() {
    let model = Model::from_meshes(vec![
        quad("a").with_world(Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0))),
    ]);
    let s = model.bounding_sphere().unwrap();
    assert!((s.center - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-5);
    assert!((s.radius - 2f32.sqrt()).abs() < 1e-5);
}

#[test]
fn empty_model_has_no_bounds() {
    let model = Model::default();
    assert!(model.is_empty());
    assert!(model.world_aabb().is_none());
    assert!(model.bounding_sphere().is_none());
    assert_eq!(model.overlay_count(), 0);
}

#[test]
fn degenerate_model_gets_a_positive_radius() {
    let model = Model::from_meshes(vec![MeshNode::new("dot", vec![Vec3::ONE], vec![])]);
    let s = model.bounding_sphere().unwrap();
    assert_eq!(s.center, Vec3::ONE);
    assert!(s.radius > 0.0);
}
