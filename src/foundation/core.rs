use std::io::Cursor;
use std::path::Path;

use anyhow::Context;

use crate::foundation::error::{StudioError, StudioResult};
use crate::foundation::math::{premultiply_rgba8_in_place, unpremultiply_rgba8_in_place};

pub use glam::{Mat4, Vec2, Vec3, Vec4};

/// Smallest texture-space extent used as a divisor when mapping overlays.
pub const UV_EPSILON: f32 = 1e-6;

/// Largest raster edge the studio will allocate.
pub const MAX_RASTER_DIM: u32 = 16_384;

/// An RGBA8 image buffer.
///
/// Pixels are **premultiplied alpha**, row-major, tightly packed. Row 0 is the top of the image,
/// which is also texture-space `v = 0` (glTF convention, no vertical flip).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a fully transparent buffer.
    pub fn transparent(width: u32, height: u32) -> StudioResult<Self> {
        Self::filled(width, height, [0, 0, 0, 0])
    }

    /// Allocate a buffer where every pixel is `rgba_premul`.
    pub fn filled(width: u32, height: u32, rgba_premul: [u8; 4]) -> StudioResult<Self> {
        let len = checked_len(width, height)?;
        let mut data = Vec::with_capacity(len);
        for _ in 0..(len / 4) {
            data.extend_from_slice(&rgba_premul);
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Wrap existing premultiplied bytes, validating their length.
    pub fn from_premul(width: u32, height: u32, data: Vec<u8>) -> StudioResult<Self> {
        let len = checked_len(width, height)?;
        if data.len() != len {
            return Err(StudioError::validation(format!(
                "pixel buffer expects {len} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Build from a straight-alpha `image` buffer.
    pub fn from_rgba_image(img: &image::RgbaImage) -> StudioResult<Self> {
        let (width, height) = img.dimensions();
        let mut data = img.as_raw().clone();
        premultiply_rgba8_in_place(&mut data);
        Self::from_premul(width, height, data)
    }

    /// Premultiplied pixel at `(x, y)`, or transparent outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        if x >= self.width || y >= self.height {
            return [0, 0, 0, 0];
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    /// Overwrite the pixel at `(x, y)`; out-of-range writes are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, rgba_premul: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        self.data[i..i + 4].copy_from_slice(&rgba_premul);
    }

    /// `true` when every pixel has zero alpha.
    pub fn is_fully_transparent(&self) -> bool {
        self.data.chunks_exact(4).all(|px| px[3] == 0)
    }

    /// Convert to a straight-alpha `image` buffer.
    pub fn to_rgba_image(&self) -> StudioResult<image::RgbaImage> {
        let mut straight = self.data.clone();
        unpremultiply_rgba8_in_place(&mut straight);
        image::RgbaImage::from_raw(self.width, self.height, straight)
            .ok_or_else(|| StudioError::render("pixel buffer length does not match dimensions"))
    }

    /// Encode as PNG bytes (straight alpha).
    pub fn encode_png(&self) -> StudioResult<Vec<u8>> {
        let img = self.to_rgba_image()?;
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .context("encode png")?;
        Ok(out)
    }

    /// Write a PNG file, creating parent directories as needed.
    pub fn save_png(&self, path: &Path) -> StudioResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create output dir '{}'", parent.display()))?;
        }
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes).with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

fn checked_len(width: u32, height: u32) -> StudioResult<usize> {
    if width == 0 || height == 0 {
        return Err(StudioError::validation(format!(
            "pixel buffer dimensions must be non-zero, got {width}x{height}"
        )));
    }
    if width > MAX_RASTER_DIM || height > MAX_RASTER_DIM {
        return Err(StudioError::validation(format!(
            "pixel buffer too large: {width}x{height} (max {MAX_RASTER_DIM}x{MAX_RASTER_DIM})"
        )));
    }
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(4))
        .ok_or_else(|| StudioError::validation("pixel buffer size overflow"))
}

/// Axis-aligned bounding box of a mesh's texture coordinates.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct UvBounds {
    /// Minimum `u`.
    pub u_min: f32,
    /// Maximum `u`.
    pub u_max: f32,
    /// Minimum `v`.
    pub v_min: f32,
    /// Maximum `v`.
    pub v_max: f32,
}

impl UvBounds {
    /// Tightest box around `uvs`.
    ///
    /// Returns `None` for an empty slice or when any coordinate is not finite.
    pub fn from_uvs(uvs: &[Vec2]) -> Option<Self> {
        let first = uvs.first()?;
        let mut out = Self {
            u_min: first.x,
            u_max: first.x,
            v_min: first.y,
            v_max: first.y,
        };
        for uv in uvs {
            if !uv.is_finite() {
                return None;
            }
            out.u_min = out.u_min.min(uv.x);
            out.u_max = out.u_max.max(uv.x);
            out.v_min = out.v_min.min(uv.y);
            out.v_max = out.v_max.max(uv.y);
        }
        Some(out)
    }

    /// `(Δu, Δv)` with each axis clamped to at least [`UV_EPSILON`].
    pub fn clamped_extent(self) -> Vec2 {
        Vec2::new(
            (self.u_max - self.u_min).max(UV_EPSILON),
            (self.v_max - self.v_min).max(UV_EPSILON),
        )
    }

    /// Inclusive containment test.
    pub fn contains(self, uv: Vec2) -> bool {
        uv.x >= self.u_min && uv.x <= self.u_max && uv.y >= self.v_min && uv.y <= self.v_max
    }
}

/// Sphere enclosing a model in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingSphere {
    /// Sphere center.
    pub center: Vec3,
    /// Sphere radius, always `> 0`.
    pub radius: f32,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
