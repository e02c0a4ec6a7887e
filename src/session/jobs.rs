use std::sync::Arc;

use crate::assets::svg_raster::{FitMode, rasterize};
use crate::foundation::core::PixelBuffer;

/// Which of the two recolor rasters a job produces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RasterPass {
    /// Low-resolution raster for immediate feedback.
    Preview,
    /// Full-resolution raster that replaces the preview.
    Full,
}

/// A self-contained rasterization request for one piece.
///
/// Jobs snapshot the markup, so they can run on any thread; the result is handed back to
/// [`crate::Studio::apply`], which drops it when the piece has moved on.
#[derive(Clone, Debug)]
pub struct RasterJob {
    /// Canonical piece name.
    pub piece: String,
    /// Model load the job was planned against.
    pub generation: u64,
    /// Piece revision the markup belongs to.
    pub revision: u64,
    /// Preview or full.
    pub pass: RasterPass,
    /// Markup snapshot.
    pub markup: Arc<str>,
    /// Square raster edge.
    pub size: u32,
    /// Placement strategy.
    pub fit: FitMode,
}

/// Output of [`RasterJob::run`].
#[derive(Clone, Debug)]
pub struct RasterResult {
    /// Canonical piece name.
    pub piece: String,
    /// Model load the job was planned against.
    pub generation: u64,
    /// Revision of the rasterized markup.
    pub revision: u64,
    /// Preview or full.
    pub pass: RasterPass,
    /// The raster, or `None` when decoding failed.
    pub image: Option<Arc<PixelBuffer>>,
}

impl RasterJob {
    /// Rasterize the snapshot. Never fails; a decode error yields `image: None`.
    #[tracing::instrument(skip(self), fields(piece = %self.piece, revision = self.revision, pass = ?self.pass))]
    pub fn run(&self) -> RasterResult {
        RasterResult {
            piece: self.piece.clone(),
            generation: self.generation,
            revision: self.revision,
            pass: self.pass,
            image: rasterize(&self.markup, self.size, self.size, self.fit).map(Arc::new),
        }
    }
}

/// The two rasters scheduled by a recolor, to be run and applied preview first.
#[derive(Clone, Debug)]
pub struct RecolorPlan {
    /// Low-resolution job.
    pub preview: RasterJob,
    /// Full-resolution job.
    pub full: RasterJob,
}

/// What [`crate::Studio::apply`] did with a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The raster now shows on `meshes` overlays.
    Applied {
        /// Number of overlays written.
        meshes: usize,
    },
    /// The model was reloaded or the piece changed since the job was made, or a newer raster is
    /// already shown.
    Stale,
    /// The raster failed; existing overlays are unchanged.
    Failed,
    /// No piece with that name in the current model.
    UnknownPiece,
}

#[cfg(test)]
#[path = "../../tests/unit/session/jobs.rs"]
mod tests;
