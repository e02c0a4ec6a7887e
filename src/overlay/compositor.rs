use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::foundation::core::{PixelBuffer, UvBounds, Vec2};
use crate::scene::model::MeshNode;

/// Draw order given to overlays so they land after every base surface.
pub const OVERLAY_RENDER_ORDER: i32 = 999;

/// Texels with alpha at or below this value are discarded.
pub const OVERLAY_ALPHA_TEST: f32 = 0.001;

static NEXT_TEXTURE_HANDLE: AtomicU64 = AtomicU64::new(1);

/// Stable identity of an overlay texture for the lifetime of its mesh binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureHandle(u64);

impl TextureHandle {
    fn fresh() -> Self {
        Self(NEXT_TEXTURE_HANDLE.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw handle value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// How overlay texels combine with the surface underneath.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayBlend {
    /// Source-over.
    Normal,
    /// Tint the base surface: `dst * (src + (1 - src_a))`.
    Multiply,
}

/// Depth bias pulling the overlay towards the camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PolygonOffset {
    /// Slope-scaled component.
    pub factor: f32,
    /// Constant component.
    pub units: f32,
}

/// Fixed render state of an overlay surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlayMaterial {
    /// Blend against the base pass.
    pub blend: OverlayBlend,
    /// Test against the base depth buffer.
    pub depth_test: bool,
    /// Write depth.
    pub depth_write: bool,
    /// Draw order, higher draws later.
    pub render_order: i32,
    /// Forward depth bias.
    pub polygon_offset: PolygonOffset,
    /// Alpha discard threshold.
    pub alpha_test: f32,
    /// Texture colors are premultiplied.
    pub premultiplied_alpha: bool,
}

impl Default for OverlayMaterial {
    fn default() -> Self {
        Self {
            blend: OverlayBlend::Multiply,
            depth_test: true,
            depth_write: false,
            render_order: OVERLAY_RENDER_ORDER,
            polygon_offset: PolygonOffset {
                factor: -1.0,
                units: -1.0,
            },
            alpha_test: OVERLAY_ALPHA_TEST,
            premultiplied_alpha: true,
        }
    }
}

/// Overlay image plus its texture-space mapping.
///
/// Sampling is clamp-to-edge with linear filtering and no vertical flip; a mesh UV maps to
/// `uv * repeat + offset` in image space.
#[derive(Clone, Debug)]
pub struct OverlayTexture {
    handle: TextureHandle,
    image: Arc<PixelBuffer>,
    repeat: Vec2,
    offset: Vec2,
    generation: u64,
}

impl OverlayTexture {
    /// Stable handle.
    pub fn handle(&self) -> TextureHandle {
        self.handle
    }

    /// Current image.
    pub fn image(&self) -> &Arc<PixelBuffer> {
        &self.image
    }

    /// Texture repeat.
    pub fn repeat(&self) -> Vec2 {
        self.repeat
    }

    /// Texture offset.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Content revision; bumped whenever the image is swapped and needs re-upload.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Image-space coordinate of a mesh UV.
    pub fn map_uv(&self, uv: Vec2) -> Vec2 {
        uv * self.repeat + self.offset
    }
}

/// The single overlay carried by a mesh.
#[derive(Clone, Debug)]
pub struct Overlay {
    /// Texture and mapping.
    pub texture: OverlayTexture,
    /// Render state.
    pub material: OverlayMaterial,
}

/// Result of [`bind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindOutcome {
    /// A new overlay was attached to the mesh.
    Created,
    /// The existing overlay received new content.
    Updated,
}

/// `(repeat, offset)` that stretches a full image over `bounds`.
pub fn texture_mapping(bounds: UvBounds) -> (Vec2, Vec2) {
    let extent = bounds.clamped_extent();
    let repeat = Vec2::ONE / extent;
    let offset = Vec2::new(-bounds.u_min / extent.x, -bounds.v_min / extent.y);
    (repeat, offset)
}

/// Create or update the overlay of `node`.
///
/// An existing overlay keeps its handle and material; only the image is swapped and its
/// generation bumped. The mapping is recomputed from `bounds` unless `preserve_mapping` is set.
pub fn bind(
    node: &mut MeshNode,
    bounds: UvBounds,
    image: Arc<PixelBuffer>,
    preserve_mapping: bool,
) -> BindOutcome {
    if let Some(overlay) = node.overlay.as_mut() {
        let tex = &mut overlay.texture;
        tex.image = image;
        tex.generation += 1;
        if !preserve_mapping {
            (tex.repeat, tex.offset) = texture_mapping(bounds);
        }
        tracing::trace!(mesh = %node.name, generation = tex.generation, "overlay updated");
        return BindOutcome::Updated;
    }

    let (repeat, offset) = texture_mapping(bounds);
    node.overlay = Some(Overlay {
        texture: OverlayTexture {
            handle: TextureHandle::fresh(),
            image,
            repeat,
            offset,
            generation: 0,
        },
        material: OverlayMaterial::default(),
    });
    tracing::debug!(mesh = %node.name, "overlay created");
    BindOutcome::Created
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/compositor.rs"]
mod tests;
