use std::sync::Arc;

use super::*;
use crate::foundation::core::UvBounds;
use crate::overlay::compositor::bind;

const SIZE: u32 = 64;

fn target() -> RenderTarget {
    RenderTarget {
        width: SIZE,
        height: SIZE,
        clear_rgba: [0, 0, 0, 0],
    }
}

fn camera() -> Camera {
    Camera {
        position: Vec3::new(0.0, 0.0, 3.0),
        ..Camera::default()
    }
}

fn quad(name: &str, z: f32, half: f32) -> MeshNode {
    MeshNode::new(
        name,
        vec![
            Vec3::new(-half, -half, z),
            Vec3::new(half, -half, z),
            Vec3::new(half, half, z),
            Vec3::new(-half, half, z),
        ],
        vec![0, 1, 2, 0, 2, 3],
    )
    .with_uvs(vec![
        Vec2::new(0.0, 1.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(0.0, 0.0),
    ])
}

fn full_bounds() -> UvBounds {
    UvBounds {
        u_min: 0.0,
        u_max: 1.0,
        v_min: 0.0,
        v_max: 1.0,
    }
}

fn solid(rgba: [u8; 4]) -> Arc<PixelBuffer> {
    Arc::new(PixelBuffer::filled(4, 4, rgba).unwrap())
}

fn render(model: &Model) -> PixelBuffer {
    CpuRenderer::default().render(model, &camera(), target()).unwrap()
}

#[test]
fn front_facing_quad_covers_center_only() {
    let out = render(&Model::from_meshes(vec![quad("q", 0.0, 0.5)]));
    let c = out.pixel(SIZE / 2, SIZE / 2);
    assert_eq!(c[3], 255);
    assert!(c[0] > 0 && c[0] == c[1] && c[1] == c[2]);
    assert_eq!(out.pixel(0, 0), [0, 0, 0, 0]);
    assert_eq!(out.pixel(SIZE - 1, SIZE - 1), [0, 0, 0, 0]);
}

#[test]
fn back_faces_are_culled() {
    let mut q = quad("q", 0.0, 0.5);
    q.indices = vec![0, 2, 1, 0, 3, 2];
    let out = render(&Model::from_meshes(vec![q]));
    assert!(out.is_fully_transparent());
}

#[test]
fn clear_color_fills_background() {
    let out = CpuRenderer::default()
        .render(
            &Model::default(),
            &camera(),
            RenderTarget {
                clear_rgba: [229, 231, 235, 255],
                ..target()
            },
        )
        .unwrap();
    assert_eq!(out.pixel(3, 7), [229, 231, 235, 255]);
}

#[test]
fn multiply_overlay_tints_the_base() {
    let plain = render(&Model::from_meshes(vec![quad("q", 0.0, 0.5)]));

    let mut q = quad("q", 0.0, 0.5);
    bind(&mut q, full_bounds(), solid([255, 0, 0, 255]), false);
    let tinted = render(&Model::from_meshes(vec![q]));

    let (p, t) = (plain.pixel(SIZE / 2, SIZE / 2), tinted.pixel(SIZE / 2, SIZE / 2));
    assert_eq!(t[0], p[0]);
    assert_eq!(t[1], 0);
    assert_eq!(t[2], 0);
    assert_eq!(t[3], 255);
}

#[test]
fn transparent_overlay_texels_are_discarded() {
    let plain = render(&Model::from_meshes(vec![quad("q", 0.0, 0.5)]));

    let mut q = quad("q", 0.0, 0.5);
    bind(&mut q, full_bounds(), solid([0, 0, 0, 0]), false);
    let out = render(&Model::from_meshes(vec![q]));
    assert_eq!(out, plain);
}

#[test]
fn overlays_respect_base_depth() {
    let near = quad("near", 0.5, 0.5);
    let mut far = quad("far", -0.5, 1.0);
    bind(&mut far, full_bounds(), solid([0, 0, 255, 255]), false);

    let out = render(&Model::from_meshes(vec![near, far]));
    let c = out.pixel(SIZE / 2, SIZE / 2);
    assert!(c[0] > 0 && c[0] == c[1], "near quad must hide the overlay: {c:?}");

    // Outside the near quad the far overlay is visible.
    let edge = out.pixel(SIZE / 2, 14);
    assert_eq!(edge[0], 0);
    assert!(edge[2] > 0);
}
