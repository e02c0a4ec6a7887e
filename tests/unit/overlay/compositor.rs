use super::*;
use crate::foundation::core::{UV_EPSILON, Vec3};

fn mesh() -> MeshNode {
    MeshNode::new(
        "panel",
        vec![Vec3::ZERO, Vec3::X, Vec3::Y],
        vec![0, 1, 2],
    )
    .with_uvs(vec![Vec2::new(0.2, 0.5), Vec2::new(0.6, 0.5), Vec2::new(0.2, 0.75)])
}

fn image(v: u8) -> Arc<PixelBuffer> {
    Arc::new(PixelBuffer::filled(2, 2, [v, v, v, 255]).unwrap())
}

fn assert_close(a: Vec2, b: Vec2) {
    assert!((a - b).length() < 1e-4, "{a:?} != {b:?}");
}

#[test]
fn mapping_stretches_image_over_bounds() {
    let bounds = UvBounds {
        u_min: 0.2,
        u_max: 0.6,
        v_min: 0.5,
        v_max: 0.75,
    };
    let (repeat, offset) = texture_mapping(bounds);
    assert_close(repeat, Vec2::new(2.5, 4.0));
    assert_close(offset, Vec2::new(-0.5, -2.0));

    let mut node = mesh();
    bind(&mut node, bounds, image(10), false);
    let tex = &node.overlay().unwrap().texture;
    assert_close(tex.map_uv(Vec2::new(0.2, 0.5)), Vec2::ZERO);
    assert_close(tex.map_uv(Vec2::new(0.6, 0.75)), Vec2::ONE);
}

#[test]
fn degenerate_bounds_stay_finite() {
    let bounds = UvBounds {
        u_min: 0.5,
        u_max: 0.5,
        v_min: 0.1,
        v_max: 0.1,
    };
    let (repeat, offset) = texture_mapping(bounds);
    assert!(repeat.is_finite());
    assert!(offset.is_finite());
    assert_eq!(repeat, Vec2::splat(1.0 / UV_EPSILON));
}

#[test]
fn rebinding_keeps_one_overlay_and_its_handle() {
    let mut node = mesh();
    let bounds = node.uv_bounds().unwrap();

    assert_eq!(bind(&mut node, bounds, image(10), false), BindOutcome::Created);
    let first = node.overlay().unwrap().texture.handle();

    assert_eq!(bind(&mut node, bounds, image(20), true), BindOutcome::Updated);
    assert_eq!(bind(&mut node, bounds, image(30), false), BindOutcome::Updated);

    let overlay = node.overlay().unwrap();
    assert_eq!(overlay.texture.handle(), first);
    assert_eq!(overlay.texture.generation(), 2);
    assert_eq!(overlay.texture.image().pixel(0, 0), [30, 30, 30, 255]);
    assert_eq!(overlay.material, OverlayMaterial::default());
}

#[test]
fn preserve_mapping_ignores_new_bounds() {
    let mut node = mesh();
    let original = node.uv_bounds().unwrap();
    bind(&mut node, original, image(1), false);
    let before = node.overlay().unwrap().texture.repeat();

    let other = UvBounds {
        u_min: 0.0,
        u_max: 1.0,
        v_min: 0.0,
        v_max: 1.0,
    };
    bind(&mut node, other, image(2), true);
    assert_eq!(node.overlay().unwrap().texture.repeat(), before);

    bind(&mut node, other, image(3), false);
    assert_close(node.overlay().unwrap().texture.repeat(), Vec2::ONE);
}

#[test]
fn material_defaults_match_overlay_pass() {
    let m = OverlayMaterial::default();
    assert_eq!(m.blend, OverlayBlend::Multiply);
    assert!(m.depth_test);
    assert!(!m.depth_write);
    assert_eq!(m.render_order, 999);
    assert_eq!(m.polygon_offset, PolygonOffset { factor: -1.0, units: -1.0 });
    assert!(m.premultiplied_alpha);
}

#[test]
fn distinct_meshes_get_distinct_handles() {
    let mut a = mesh();
    let mut b = mesh();
    let bounds = a.uv_bounds().unwrap();
    bind(&mut a, bounds, image(1), false);
    bind(&mut b, bounds, image(1), false);
    assert_ne!(
        a.overlay().unwrap().texture.handle(),
        b.overlay().unwrap().texture.handle()
    );
}
