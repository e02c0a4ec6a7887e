use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use anyhow::Context;

use crate::assets::sanitize::{ensure_svg_root, sanitize_svg};
use crate::foundation::core::PixelBuffer;
use crate::foundation::error::{StudioError, StudioResult};

/// Policy for placing a vector document's intrinsic size into a fixed destination buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    /// Source height maps to destination height, centered horizontally (may crop or letterbox).
    #[default]
    FitHeight,
    /// Source maps onto the full destination, ignoring aspect ratio.
    Stretch,
    /// Uniform `min` scale, centered on both axes.
    Contain,
    /// Uniform `max` scale, centered on both axes.
    Cover,
}

impl FromStr for FitMode {
    type Err = StudioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "fit_height" | "fitheight" => Ok(Self::FitHeight),
            "stretch" => Ok(Self::Stretch),
            "contain" => Ok(Self::Contain),
            "cover" => Ok(Self::Cover),
            other => Err(StudioError::validation(format!("unknown fit mode '{other}'"))),
        }
    }
}

impl FitMode {
    /// Destination rectangle for a `src_w`×`src_h` source inside `dst_w`×`dst_h`.
    ///
    /// Offsets and scaled sizes are rounded to whole pixels (half rounds up), so the image
    /// lands on pixel boundaries.
    pub fn placement(self, src_w: f64, src_h: f64, dst_w: u32, dst_h: u32) -> kurbo::Rect {
        let (ow, oh) = (f64::from(dst_w), f64::from(dst_h));
        let src_w = src_w.max(f64::EPSILON);
        let src_h = src_h.max(f64::EPSILON);

        match self {
            Self::FitHeight => {
                let s = oh / src_h;
                let dw = round_half_up(src_w * s);
                let dx = round_half_up((ow - dw) / 2.0);
                kurbo::Rect::new(dx, 0.0, dx + dw, oh)
            }
            Self::Stretch => kurbo::Rect::new(0.0, 0.0, ow, oh),
            Self::Contain | Self::Cover => {
                let (sx, sy) = (ow / src_w, oh / src_h);
                let s = if self == Self::Contain {
                    sx.min(sy)
                } else {
                    sx.max(sy)
                };
                let dw = round_half_up(src_w * s);
                let dh = round_half_up(src_h * s);
                let dx = round_half_up((ow - dw) / 2.0);
                let dy = round_half_up((oh - dh) / 2.0);
                kurbo::Rect::new(dx, dy, dx + dw, dy + dh)
            }
        }
    }
}

fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

static SVG_FONTDB: LazyLock<Arc<usvg::fontdb::Database>> = LazyLock::new(|| {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    Arc::new(db)
});

/// Parse an SVG document into a `usvg` tree using the shared system font database.
pub fn parse_svg(bytes: &[u8]) -> StudioResult<usvg::Tree> {
    let opts = usvg::Options {
        fontdb: Arc::clone(&SVG_FONTDB),
        ..Default::default()
    };
    usvg::Tree::from_data(bytes, &opts)
        .context("parse svg tree")
        .map_err(|e| StudioError::decode(format!("{e:#}")))
}

/// Rasterize vector markup into a transparent `width`×`height` buffer.
///
/// Returns `None` on any decode or allocation failure; callers keep whatever they displayed
/// before. The failure is logged.
#[tracing::instrument(skip(markup), fields(markup_len = markup.len()))]
pub fn rasterize(markup: &str, width: u32, height: u32, fit: FitMode) -> Option<PixelBuffer> {
    match try_rasterize(markup, width, height, fit) {
        Ok(buf) => Some(buf),
        Err(err) => {
            tracing::warn!(error = %err, "svg rasterization failed");
            None
        }
    }
}

/// Fallible form of [`rasterize`].
pub fn try_rasterize(
    markup: &str,
    width: u32,
    height: u32,
    fit: FitMode,
) -> StudioResult<PixelBuffer> {
    // Validates the destination size before any decoding work.
    PixelBuffer::transparent(width, height)?;

    let cleaned = sanitize_svg(markup);
    let document = ensure_svg_root(&cleaned, width, height);
    let tree = parse_svg(document.as_bytes())?;

    let size = tree.size();
    let (iw, ih) = (f64::from(size.width()), f64::from(size.height()));
    let dst = fit.placement(iw, ih, width, height);

    let affine = kurbo::Affine::translate((dst.x0, dst.y0))
        * kurbo::Affine::scale_non_uniform(dst.width() / iw, dst.height() / ih);
    let [a, b, c, d, e, f] = affine.as_coeffs();
    let xform = resvg::tiny_skia::Transform::from_row(
        a as f32, b as f32, c as f32, d as f32, e as f32, f as f32,
    );

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| StudioError::render("failed to allocate svg pixmap"))?;
    resvg::render(&tree, xform, &mut pixmap.as_mut());

    tracing::debug!(
        width,
        height,
        dx = dst.x0,
        dy = dst.y0,
        dw = dst.width(),
        dh = dst.height(),
        "rasterized svg"
    );
    PixelBuffer::from_premul(width, height, pixmap.take())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
