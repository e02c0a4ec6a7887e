use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::assets::svg_raster::FitMode;
use crate::capture::views::{CAPTURE_DISTANCE_FACTOR, CaptureOpts};
use crate::foundation::core::MAX_RASTER_DIM;
use crate::foundation::error::{StudioError, StudioResult};

/// Options of a [`crate::Studio`] session.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StudioOpts {
    /// Edge of the square full-quality overlay raster.
    pub texture_size: u32,
    /// Edge of the square preview raster used for instant recolor feedback.
    pub preview_size: u32,
    /// How artwork is placed into the raster.
    pub fit: FitMode,
    /// Snapshot settings.
    pub capture: CaptureOpts,
    /// Multiplier on the fit distance for snapshots.
    pub capture_distance_factor: f32,
}

impl Default for StudioOpts {
    fn default() -> Self {
        Self {
            texture_size: 4096,
            preview_size: 1024,
            fit: FitMode::FitHeight,
            capture: CaptureOpts::default(),
            capture_distance_factor: CAPTURE_DISTANCE_FACTOR,
        }
    }
}

impl StudioOpts {
    /// Parse options from a JSON reader. Missing fields take their defaults.
    pub fn from_reader<R: std::io::Read>(r: R) -> StudioResult<Self> {
        let opts: Self = serde_json::from_reader(r)
            .map_err(|e| StudioError::serde(format!("parse studio options JSON: {e}")))?;
        opts.validate()?;
        Ok(opts)
    }

    /// Parse options from a JSON file on disk.
    pub fn from_json_path(path: impl AsRef<Path>) -> StudioResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            StudioError::validation(format!("open studio options '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Reject sizes the rasterizer cannot allocate.
    pub fn validate(&self) -> StudioResult<()> {
        let check = |what: &str, v: u32| {
            if v == 0 || v > MAX_RASTER_DIM {
                return Err(StudioError::validation(format!(
                    "{what} must be in 1..={MAX_RASTER_DIM}, got {v}"
                )));
            }
            Ok(())
        };
        check("texture_size", self.texture_size)?;
        check("preview_size", self.preview_size)?;
        check("capture.width", self.capture.width)?;
        check("capture.height", self.capture.height)?;
        if !(self.capture_distance_factor.is_finite() && self.capture_distance_factor > 0.0) {
            return Err(StudioError::validation(
                "capture_distance_factor must be finite and > 0",
            ));
        }
        Ok(())
    }

    /// Preview edge, never larger than the full-quality edge.
    pub fn effective_preview_size(&self) -> u32 {
        self.preview_size.min(self.texture_size)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/opts.rs"]
mod tests;
