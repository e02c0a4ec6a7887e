use std::path::{Path, PathBuf};

use crate::foundation::core::{PixelBuffer, Vec3};
use crate::foundation::error::StudioResult;
use crate::render::camera::{Camera, FitData};
use crate::render::cpu::{CpuRenderer, RenderTarget};
use crate::scene::model::Model;

/// Extra distance applied to the fit distance when capturing.
pub const CAPTURE_DISTANCE_FACTOR: f32 = 1.07;

/// Viewer background `#e5e7eb`.
pub const VIEWER_BACKGROUND: [u8; 4] = [0xe5, 0xe7, 0xeb, 0xff];

/// One of the four canonical capture directions, in model space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewDirection {
    /// `+Z`.
    Front,
    /// `-Z`.
    Back,
    /// `-X`.
    Left,
    /// `+X`.
    Right,
}

impl ViewDirection {
    /// Capture order.
    pub const ALL: [Self; 4] = [Self::Front, Self::Back, Self::Left, Self::Right];

    /// Unit vector from the model center towards the camera.
    pub fn unit(self) -> Vec3 {
        match self {
            Self::Front => Vec3::Z,
            Self::Back => Vec3::NEG_Z,
            Self::Left => Vec3::NEG_X,
            Self::Right => Vec3::X,
        }
    }

    /// Lowercase label used in file names.
    pub fn label(self) -> &'static str {
        match self {
            Self::Front => "front",
            Self::Back => "back",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Output settings of a capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptureOpts {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Clear to transparent instead of `background_rgba`.
    pub transparent: bool,
    /// Opaque background used when `transparent` is off.
    pub background_rgba: [u8; 4],
}

impl Default for CaptureOpts {
    fn default() -> Self {
        Self {
            width: 1600,
            height: 1200,
            transparent: true,
            background_rgba: VIEWER_BACKGROUND,
        }
    }
}

impl CaptureOpts {
    fn target(&self) -> RenderTarget {
        RenderTarget {
            width: self.width,
            height: self.height,
            clear_rgba: if self.transparent {
                [0, 0, 0, 0]
            } else {
                self.background_rgba
            },
        }
    }
}

/// The four canonical snapshots of a model.
#[derive(Clone, Debug, PartialEq)]
pub struct FourViews {
    /// Seen from `+Z`.
    pub front: PixelBuffer,
    /// Seen from `-Z`.
    pub back: PixelBuffer,
    /// Seen from `-X`.
    pub left: PixelBuffer,
    /// Seen from `+X`.
    pub right: PixelBuffer,
}

impl FourViews {
    /// Snapshot for `dir`.
    pub fn get(&self, dir: ViewDirection) -> &PixelBuffer {
        match dir {
            ViewDirection::Front => &self.front,
            ViewDirection::Back => &self.back,
            ViewDirection::Left => &self.left,
            ViewDirection::Right => &self.right,
        }
    }

    /// Snapshots in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (ViewDirection, &PixelBuffer)> {
        ViewDirection::ALL.into_iter().map(|d| (d, self.get(d)))
    }

    /// PNG-encode every snapshot, in capture order.
    pub fn to_png(&self) -> StudioResult<Vec<(ViewDirection, Vec<u8>)>> {
        self.iter()
            .map(|(d, buf)| Ok((d, buf.encode_png()?)))
            .collect()
    }

    /// Write `<stem>_<direction>.png` files into `dir`.
    pub fn save_pngs(&self, dir: &Path, stem: &str) -> StudioResult<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(4);
        for (d, buf) in self.iter() {
            let path = dir.join(format!("{stem}_{}.png", d.label()));
            buf.save_png(&path)?;
            written.push(path);
        }
        Ok(written)
    }
}

/// Render one snapshot from `dir`.
///
/// The shot uses a copy of `camera` placed at `center + dir * fit_distance * distance_factor`,
/// looking at the center with `+Y` up. `camera` itself is left untouched.
pub fn capture_view(
    renderer: &CpuRenderer,
    model: &Model,
    camera: &Camera,
    fit: &FitData,
    dir: ViewDirection,
    opts: &CaptureOpts,
    distance_factor: f32,
) -> StudioResult<PixelBuffer> {
    let center = fit.sphere.center;
    let shot = Camera {
        position: center + dir.unit() * (fit.fit_distance * distance_factor),
        target: center,
        up: Vec3::Y,
        ..*camera
    };
    renderer.render(model, &shot, opts.target())
}

/// Render the four canonical snapshots.
#[tracing::instrument(skip_all, fields(width = opts.width, height = opts.height))]
pub fn capture_views(
    renderer: &CpuRenderer,
    model: &Model,
    camera: &Camera,
    fit: &FitData,
    opts: &CaptureOpts,
    distance_factor: f32,
) -> StudioResult<FourViews> {
    let shoot = |dir| capture_view(renderer, model, camera, fit, dir, opts, distance_factor);
    let views = FourViews {
        front: shoot(ViewDirection::Front)?,
        back: shoot(ViewDirection::Back)?,
        left: shoot(ViewDirection::Left)?,
        right: shoot(ViewDirection::Right)?,
    };
    tracing::debug!("captured four views");
    Ok(views)
}

#[cfg(test)]
#[path = "../../tests/unit/capture/views.rs"]
mod tests;
