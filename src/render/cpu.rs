use crate::foundation::core::{Mat4, PixelBuffer, Vec2, Vec3};
use crate::foundation::error::StudioResult;
use crate::overlay::compositor::{Overlay, OverlayBlend};
use crate::render::camera::Camera;
use crate::render::composite::{PremulRgba8, multiply, over};
use crate::scene::model::{MeshNode, Model};

/// Output surface of one render call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderTarget {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied clear color.
    pub clear_rgba: [u8; 4],
}

/// Lighting and rasterization knobs of [`CpuRenderer`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CpuRenderSettings {
    /// Skip triangles wound clockwise on screen.
    pub cull_back_faces: bool,
    /// Depth value of one polygon-offset unit.
    pub depth_unit: f32,
    /// Constant light term.
    pub ambient: f32,
    /// Sky/ground hemisphere term, scaled by how much a face points up.
    pub hemisphere: f32,
    /// Directional key light term.
    pub key_light: f32,
    /// Direction towards the key light.
    pub key_light_dir: Vec3,
}

impl Default for CpuRenderSettings {
    fn default() -> Self {
        Self {
            cull_back_faces: true,
            depth_unit: 2e-6,
            ambient: 0.45,
            hemisphere: 0.25,
            key_light: 0.4,
            key_light_dir: Vec3::new(0.5, 1.0, 0.8),
        }
    }
}

/// Software rasterizer for the studio scene: a lit base pass followed by an overlay pass.
#[derive(Clone, Debug, Default)]
pub struct CpuRenderer {
    settings: CpuRenderSettings,
}

#[derive(Clone, Copy, Debug)]
struct ScreenVertex {
    x: f32,
    y: f32,
    z: f32,
    inv_w: f32,
}

struct Frame {
    color: PixelBuffer,
    depth: Vec<f32>,
}

impl CpuRenderer {
    /// Renderer with custom settings.
    pub fn new(settings: CpuRenderSettings) -> Self {
        Self { settings }
    }

    /// Active settings.
    pub fn settings(&self) -> &CpuRenderSettings {
        &self.settings
    }

    /// Render `model` as seen from `camera`.
    #[tracing::instrument(skip(self, model, camera), fields(meshes = model.meshes().len()))]
    pub fn render(
        &self,
        model: &Model,
        camera: &Camera,
        target: RenderTarget,
    ) -> StudioResult<PixelBuffer> {
        let color = PixelBuffer::filled(target.width, target.height, target.clear_rgba)?;
        let mut frame = Frame {
            depth: vec![f32::INFINITY; color.data.len() / 4],
            color,
        };
        let view_proj = camera.view_projection(target.width as f32 / target.height as f32);

        for mesh in model.meshes() {
            self.draw_base(&mut frame, mesh, view_proj);
        }

        let mut overlays: Vec<(&MeshNode, &Overlay)> = model
            .meshes()
            .iter()
            .filter_map(|m| m.overlay().map(|o| (m, o)))
            .collect();
        overlays.sort_by_key(|(_, o)| o.material.render_order);

        let mut stamp = vec![0u32; frame.depth.len()];
        for (seq, (mesh, overlay)) in overlays.into_iter().enumerate() {
            self.draw_overlay(&mut frame, &mut stamp, seq as u32 + 1, mesh, overlay, view_proj);
        }

        Ok(frame.color)
    }

    fn draw_base(&self, frame: &mut Frame, mesh: &MeshNode, view_proj: Mat4) {
        let mvp = view_proj * mesh.world;
        let width = frame.color.width;
        let key_dir = self.settings.key_light_dir.normalize_or_zero();
        let [fr, fg, fb, fa] = mesh.material.base_color;

        for tri in mesh.indices.chunks_exact(3) {
            let Some(idx) = triangle_indices(tri, mesh.positions.len()) else {
                continue;
            };
            let Some(screen) = self.project_triangle(mvp, mesh, idx, &frame.color) else {
                continue;
            };

            let [p0, p1, p2] = idx.map(|i| mesh.world.transform_point3(mesh.positions[i]));
            let n = (p1 - p0).cross(p2 - p0).normalize_or_zero();
            let shade = (self.settings.ambient
                + self.settings.hemisphere * (0.5 + 0.5 * n.y)
                + self.settings.key_light * n.dot(key_dir).max(0.0))
            .clamp(0.0, 1.0);
            let uvs = triangle_uvs(mesh, idx);

            rasterize_triangle(&screen, width, frame.color.height, |x, y, z, bary| {
                let i = (y * width + x) as usize;
                if z >= frame.depth[i] {
                    return;
                }
                let tex = match (&mesh.material.texture, uvs) {
                    (Some(texture), Some(uvs)) => {
                        sample_nearest_repeat(texture, interpolate(uvs, bary))
                    }
                    _ => [1.0; 4],
                };
                let a = (fa * tex[3]).clamp(0.0, 1.0);
                if a <= 0.0 {
                    return;
                }
                let rgb = [fr * tex[0], fg * tex[1], fb * tex[2]].map(|c| c * shade * fa);
                let src = to_rgba8([rgb[0], rgb[1], rgb[2], a]);
                let dst = frame.color.pixel(x, y);
                frame.color.put_pixel(x, y, over(dst, src, 1.0));
                frame.depth[i] = z;
            });
        }
    }

    fn draw_overlay(
        &self,
        frame: &mut Frame,
        stamp: &mut [u32],
        seq: u32,
        mesh: &MeshNode,
        overlay: &Overlay,
        view_proj: Mat4,
    ) {
        let mvp = view_proj * mesh.world;
        let width = frame.color.width;
        let material = overlay.material;
        let texture = &overlay.texture;
        let image = texture.image();

        for tri in mesh.indices.chunks_exact(3) {
            let Some(idx) = triangle_indices(tri, mesh.positions.len()) else {
                continue;
            };
            let Some(uvs) = triangle_uvs(mesh, idx) else {
                continue;
            };
            let Some(screen) = self.project_triangle(mvp, mesh, idx, &frame.color) else {
                continue;
            };
            let bias = material.polygon_offset.units * self.settings.depth_unit
                + material.polygon_offset.factor * depth_slope(&screen);

            rasterize_triangle(&screen, width, frame.color.height, |x, y, z, bary| {
                let i = (y * width + x) as usize;
                if stamp[i] == seq {
                    return;
                }
                let z = z + bias;
                if material.depth_test && z > frame.depth[i] {
                    return;
                }
                let texel = sample_bilinear_clamped(image, texture.map_uv(interpolate(uvs, bary)));
                if texel[3] <= material.alpha_test {
                    return;
                }
                let texel = if material.premultiplied_alpha {
                    texel
                } else {
                    [texel[0] * texel[3], texel[1] * texel[3], texel[2] * texel[3], texel[3]]
                };
                let src = to_rgba8(texel);
                let dst = frame.color.pixel(x, y);
                let out = match material.blend {
                    OverlayBlend::Multiply => multiply(dst, src),
                    OverlayBlend::Normal => over(dst, src, 1.0),
                };
                frame.color.put_pixel(x, y, out);
                stamp[i] = seq;
                if material.depth_write {
                    frame.depth[i] = z;
                }
            });
        }
    }

    // Triangles with a vertex behind the eye are dropped rather than clipped.
    fn project_triangle(
        &self,
        mvp: Mat4,
        mesh: &MeshNode,
        idx: [usize; 3],
        surface: &PixelBuffer,
    ) -> Option<[ScreenVertex; 3]> {
        let (w, h) = (surface.width as f32, surface.height as f32);
        let mut out = [ScreenVertex {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            inv_w: 0.0,
        }; 3];
        for (slot, &i) in out.iter_mut().zip(idx.iter()) {
            let clip = mvp * mesh.positions[i].extend(1.0);
            if clip.w <= 1e-6 || !clip.is_finite() {
                return None;
            }
            let inv_w = 1.0 / clip.w;
            *slot = ScreenVertex {
                x: (clip.x * inv_w * 0.5 + 0.5) * w,
                y: (0.5 - clip.y * inv_w * 0.5) * h,
                z: clip.z * inv_w,
                inv_w,
            };
        }

        // Counter-clockwise in NDC is clockwise once y points down.
        let area = edge(out[0], out[1], out[2].x, out[2].y);
        if area == 0.0 || (self.settings.cull_back_faces && area > 0.0) {
            return None;
        }
        Some(out)
    }
}

fn triangle_indices(tri: &[u32], vertex_count: usize) -> Option<[usize; 3]> {
    let idx = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
    idx.iter().all(|&i| i < vertex_count).then_some(idx)
}

fn triangle_uvs(mesh: &MeshNode, idx: [usize; 3]) -> Option<[Vec2; 3]> {
    let uvs = mesh.uvs.as_deref()?;
    Some([*uvs.get(idx[0])?, *uvs.get(idx[1])?, *uvs.get(idx[2])?])
}

fn interpolate(uvs: [Vec2; 3], bary: [f32; 3]) -> Vec2 {
    uvs[0] * bary[0] + uvs[1] * bary[1] + uvs[2] * bary[2]
}

fn edge(a: ScreenVertex, b: ScreenVertex, px: f32, py: f32) -> f32 {
    (b.x - a.x) * (py - a.y) - (b.y - a.y) * (px - a.x)
}

/// Largest screen-space depth gradient of the triangle.
fn depth_slope(v: &[ScreenVertex; 3]) -> f32 {
    let area = edge(v[0], v[1], v[2].x, v[2].y);
    if area == 0.0 {
        return 0.0;
    }
    let (dz1, dz2) = (v[1].z - v[0].z, v[2].z - v[0].z);
    let dzdx = (dz1 * (v[2].y - v[0].y) - dz2 * (v[1].y - v[0].y)) / area;
    let dzdy = (dz2 * (v[1].x - v[0].x) - dz1 * (v[2].x - v[0].x)) / area;
    dzdx.abs().max(dzdy.abs())
}

/// Visit every pixel center inside the triangle with its depth and perspective-correct
/// barycentric weights.
fn rasterize_triangle(
    v: &[ScreenVertex; 3],
    width: u32,
    height: u32,
    mut visit: impl FnMut(u32, u32, f32, [f32; 3]),
) {
    let area = edge(v[0], v[1], v[2].x, v[2].y);
    if area == 0.0 || width == 0 || height == 0 {
        return;
    }
    let min_x = v.iter().map(|p| p.x).fold(f32::INFINITY, f32::min).floor().max(0.0);
    let max_x = v.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max).ceil();
    let min_y = v.iter().map(|p| p.y).fold(f32::INFINITY, f32::min).floor().max(0.0);
    let max_y = v.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max).ceil();
    if max_x < 0.0 || max_y < 0.0 {
        return;
    }
    let x_end = (max_x as u32).min(width - 1);
    let y_end = (max_y as u32).min(height - 1);

    for y in (min_y as u32)..=y_end {
        let py = y as f32 + 0.5;
        for x in (min_x as u32)..=x_end {
            let px = x as f32 + 0.5;
            let w0 = edge(v[1], v[2], px, py) / area;
            let w1 = edge(v[2], v[0], px, py) / area;
            let w2 = edge(v[0], v[1], px, py) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }
            let z = w0 * v[0].z + w1 * v[1].z + w2 * v[2].z;
            if !(0.0..=1.0).contains(&z) {
                continue;
            }
            let p = [w0 * v[0].inv_w, w1 * v[1].inv_w, w2 * v[2].inv_w];
            let sum = p[0] + p[1] + p[2];
            if sum <= 0.0 {
                continue;
            }
            visit(x, y, z, [p[0] / sum, p[1] / sum, p[2] / sum]);
        }
    }
}

fn texel(img: &PixelBuffer, x: u32, y: u32) -> [f32; 4] {
    img.pixel(x, y).map(|c| f32::from(c) / 255.0)
}

fn sample_nearest_repeat(img: &PixelBuffer, uv: Vec2) -> [f32; 4] {
    if img.width == 0 || img.height == 0 {
        return [1.0; 4];
    }
    let u = uv.x - uv.x.floor();
    let v = uv.y - uv.y.floor();
    let x = ((u * img.width as f32) as u32).min(img.width - 1);
    let y = ((v * img.height as f32) as u32).min(img.height - 1);
    texel(img, x, y)
}

fn sample_bilinear_clamped(img: &PixelBuffer, uv: Vec2) -> [f32; 4] {
    if img.width == 0 || img.height == 0 {
        return [0.0; 4];
    }
    let fx = uv.x.clamp(0.0, 1.0) * img.width as f32 - 0.5;
    let fy = uv.y.clamp(0.0, 1.0) * img.height as f32 - 0.5;
    let (x0, y0) = (fx.floor(), fy.floor());
    let (tx, ty) = (fx - x0, fy - y0);

    let clamp_x = |x: f32| (x.max(0.0) as u32).min(img.width - 1);
    let clamp_y = |y: f32| (y.max(0.0) as u32).min(img.height - 1);
    let (xa, xb) = (clamp_x(x0), clamp_x(x0 + 1.0));
    let (ya, yb) = (clamp_y(y0), clamp_y(y0 + 1.0));

    let (p00, p10) = (texel(img, xa, ya), texel(img, xb, ya));
    let (p01, p11) = (texel(img, xa, yb), texel(img, xb, yb));
    let mut out = [0.0; 4];
    for c in 0..4 {
        let top = p00[c] + (p10[c] - p00[c]) * tx;
        let bottom = p01[c] + (p11[c] - p01[c]) * tx;
        out[c] = top + (bottom - top) * ty;
    }
    out
}

fn to_rgba8(c: [f32; 4]) -> PremulRgba8 {
    c.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
