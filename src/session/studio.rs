use std::sync::Arc;

use crate::capture::views::{CaptureOpts, FourViews, capture_views};
use crate::foundation::error::{StudioError, StudioResult};
use crate::overlay::compositor::bind;
use crate::palette::extract::PaletteEntry;
use crate::pieces::index::index_meshes;
use crate::pieces::registry::{Piece, PieceRegistry, VectorDocument};
use crate::render::camera::{Camera, FitData};
use crate::render::cpu::CpuRenderer;
use crate::scene::loader::LoadEvent;
use crate::scene::model::Model;
use crate::session::jobs::{ApplyOutcome, RasterJob, RasterPass, RasterResult, RecolorPlan};
use crate::session::opts::StudioOpts;

/// Single-threaded editing session: the loaded model, its pieces, the viewer camera and the
/// current selection.
pub struct Studio {
    opts: StudioOpts,
    renderer: CpuRenderer,
    camera: Camera,
    model: Option<Model>,
    fit: Option<FitData>,
    pieces: PieceRegistry,
    selected: Option<String>,
    // Bumped on every clear; piece revisions restart with each model.
    generation: u64,
}

impl Studio {
    /// Empty session.
    pub fn new(opts: StudioOpts) -> StudioResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            renderer: CpuRenderer::default(),
            camera: Camera::default(),
            model: None,
            fit: None,
            pieces: PieceRegistry::new(),
            selected: None,
            generation: 0,
        })
    }

    /// Session options.
    pub fn opts(&self) -> &StudioOpts {
        &self.opts
    }

    /// Viewer camera.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable viewer camera.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Loaded model.
    pub fn model(&self) -> Option<&Model> {
        self.model.as_ref()
    }

    /// Fit data of the loaded model.
    pub fn fit(&self) -> Option<&FitData> {
        self.fit.as_ref()
    }

    /// Piece registry.
    pub fn pieces(&self) -> &PieceRegistry {
        &self.pieces
    }

    /// Currently selected piece.
    pub fn selected(&self) -> Option<&Piece> {
        self.pieces.get(self.selected.as_deref()?)
    }

    /// Drive a load event stream to its terminal event.
    ///
    /// `Started` clears the session, `Done` installs the model, `Failed` is returned as the error.
    pub fn load(&mut self, events: impl IntoIterator<Item = LoadEvent>) -> StudioResult<()> {
        for event in events {
            match event {
                LoadEvent::Started => self.clear(),
                LoadEvent::Progress(percent) => tracing::debug!(percent, "loading model"),
                LoadEvent::Done(model) => {
                    self.install_model(model);
                    return Ok(());
                }
                LoadEvent::Failed(err) => return Err(err),
            }
        }
        Err(StudioError::load("load stream ended without a result"))
    }

    /// Replace the session model, re-index pieces and frame the camera.
    pub fn install_model(&mut self, model: Model) {
        self.clear();
        self.pieces = index_meshes(&model);
        self.fit = FitData::from_model(&model, self.camera.fov_y_deg);
        if let Some(fit) = &self.fit {
            fit.frame(&mut self.camera);
        }
        tracing::info!(
            meshes = model.meshes().len(),
            pieces = self.pieces.len(),
            "model installed"
        );
        self.model = Some(model);
    }

    /// Drop the model, its pieces and the selection.
    pub fn clear(&mut self) {
        self.model = None;
        self.fit = None;
        self.pieces.clear();
        self.selected = None;
        self.generation += 1;
    }

    /// Select a piece. Returns `false` for unknown names.
    pub fn select(&mut self, key: &str) -> bool {
        if self.pieces.get(key).is_none() {
            tracing::debug!(piece = key, "select: unknown piece");
            return false;
        }
        self.selected = Some(key.to_string());
        true
    }

    /// Palette of a piece's artwork; empty when the piece or artwork is missing.
    pub fn palette(&self, key: &str) -> &[PaletteEntry] {
        self.pieces.get(key).map(Piece::palette).unwrap_or_default()
    }

    /// Attach artwork to a piece, rasterize it at full size and bind it to every member mesh.
    ///
    /// The piece becomes the selection.
    #[tracing::instrument(skip(self, markup), fields(markup_len = markup.len()))]
    pub fn attach_artwork(&mut self, key: &str, markup: &str) -> ApplyOutcome {
        let Some(piece) = self.pieces.get_mut(key) else {
            tracing::debug!("attach_artwork: unknown piece");
            return ApplyOutcome::UnknownPiece;
        };
        let doc = VectorDocument::new(markup);
        let revision = piece.set_artwork(doc);
        self.selected = Some(key.to_string());

        let job = RasterJob {
            piece: key.to_string(),
            generation: self.generation,
            revision,
            pass: RasterPass::Full,
            markup: Arc::from(markup),
            size: self.opts.texture_size,
            fit: self.opts.fit,
        };
        self.apply_result(job.run(), false)
    }

    /// Rewrite a color token in a piece's artwork and plan the preview and full rasters.
    ///
    /// Returns `None` when the piece or its artwork is missing, or when the token does not occur.
    pub fn recolor(&mut self, key: &str, token: &str, new_color: &str) -> Option<RecolorPlan> {
        let piece = self.pieces.get_mut(key)?;
        let Some(revision) = piece.recolor(token, new_color) else {
            tracing::debug!(piece = key, token, "recolor: nothing to change");
            return None;
        };
        let markup: Arc<str> = Arc::from(piece.artwork()?.markup());
        let job = |pass, size| RasterJob {
            piece: key.to_string(),
            generation: self.generation,
            revision,
            pass,
            markup: Arc::clone(&markup),
            size,
            fit: self.opts.fit,
        };
        Some(RecolorPlan {
            preview: job(RasterPass::Preview, self.opts.effective_preview_size()),
            full: job(RasterPass::Full, self.opts.texture_size),
        })
    }

    /// [`Studio::recolor`], then run and apply the preview and the full raster in order.
    pub fn recolor_now(
        &mut self,
        key: &str,
        token: &str,
        new_color: &str,
    ) -> Option<[ApplyOutcome; 2]> {
        let plan = self.recolor(key, token, new_color)?;
        let preview = self.apply(plan.preview.run());
        let full = self.apply(plan.full.run());
        Some([preview, full])
    }

    /// [`Studio::recolor_now`] on the selected piece.
    pub fn recolor_selected(&mut self, token: &str, new_color: &str) -> Option<[ApplyOutcome; 2]> {
        let key = self.selected.clone()?;
        self.recolor_now(&key, token, new_color)
    }

    /// Apply a recolor raster, keeping the overlay mapping in place.
    pub fn apply(&mut self, result: RasterResult) -> ApplyOutcome {
        self.apply_result(result, true)
    }

    fn apply_result(&mut self, result: RasterResult, preserve_mapping: bool) -> ApplyOutcome {
        if result.generation != self.generation {
            tracing::debug!(
                piece = %result.piece,
                generation = result.generation,
                current = self.generation,
                "raster from a previous model discarded"
            );
            return ApplyOutcome::Stale;
        }
        let (Some(piece), Some(model)) = (self.pieces.get_mut(&result.piece), self.model.as_mut())
        else {
            return ApplyOutcome::UnknownPiece;
        };
        if !piece.accepts(result.revision, result.pass) {
            tracing::debug!(
                piece = %result.piece,
                revision = result.revision,
                current = piece.revision(),
                pass = ?result.pass,
                "stale raster discarded"
            );
            return ApplyOutcome::Stale;
        }
        let Some(image) = result.image else {
            tracing::warn!(piece = %result.piece, "raster failed; overlays left unchanged");
            return ApplyOutcome::Failed;
        };

        let mut meshes = 0;
        for member in piece.members() {
            if let Some(node) = model.mesh_mut(member.mesh) {
                bind(node, member.bounds, Arc::clone(&image), preserve_mapping);
                meshes += 1;
            }
        }
        piece.mark_applied(result.revision, result.pass);
        ApplyOutcome::Applied { meshes }
    }

    /// Snapshot the model from the four canonical directions.
    ///
    /// Returns `Ok(None)` without a model. The viewer camera is not modified.
    pub fn capture_four_views(&self, opts: &CaptureOpts) -> StudioResult<Option<FourViews>> {
        let (Some(model), Some(fit)) = (&self.model, &self.fit) else {
            tracing::debug!("capture: no model loaded");
            return Ok(None);
        };
        capture_views(
            &self.renderer,
            model,
            &self.camera,
            fit,
            opts,
            self.opts.capture_distance_factor,
        )
        .map(Some)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/studio.rs"]
mod tests;
