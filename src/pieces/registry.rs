use indexmap::IndexMap;

use crate::foundation::core::UvBounds;
use crate::palette::extract::{PaletteEntry, extract_colors};
use crate::palette::rewrite::rewrite;
use crate::scene::model::MeshId;
use crate::session::jobs::RasterPass;

/// One member mesh of a piece and its texture-space box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshRecord {
    /// Mesh in the owning model.
    pub mesh: MeshId,
    /// UV bounding box of that mesh.
    pub bounds: UvBounds,
}

/// Vector artwork attached to a piece, with its editable palette.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorDocument {
    markup: String,
    palette: Vec<PaletteEntry>,
}

impl VectorDocument {
    /// Wrap `markup` and extract its palette.
    pub fn new(markup: impl Into<String>) -> Self {
        let markup = markup.into();
        let palette = extract_colors(&markup);
        Self { markup, palette }
    }

    /// Current markup.
    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Palette of the current markup.
    pub fn palette(&self) -> &[PaletteEntry] {
        &self.palette
    }

    /// Replace `token` by `new_color` and re-extract the palette.
    ///
    /// Returns `false` when the markup did not change.
    pub fn recolor(&mut self, token: &str, new_color: &str) -> bool {
        let next = rewrite(&self.markup, token, new_color);
        if next == self.markup {
            return false;
        }
        self.palette = extract_colors(&next);
        self.markup = next;
        true
    }
}

/// A named logical region of the model.
#[derive(Clone, Debug)]
pub struct Piece {
    name: String,
    members: Vec<MeshRecord>,
    artwork: Option<VectorDocument>,
    revision: u64,
    applied: Option<(u64, RasterPass)>,
}

impl Piece {
    fn new(name: String) -> Self {
        Self {
            name,
            members: Vec::new(),
            artwork: None,
            revision: 0,
            applied: None,
        }
    }

    /// Canonical name (registry key).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Member meshes in traversal order.
    pub fn members(&self) -> &[MeshRecord] {
        &self.members
    }

    /// Attached artwork, if any.
    pub fn artwork(&self) -> Option<&VectorDocument> {
        self.artwork.as_ref()
    }

    /// Monotonic markup revision.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Revision and pass of the last raster written to the overlays.
    pub fn applied(&self) -> Option<(u64, RasterPass)> {
        self.applied
    }

    /// Palette of the attached artwork; empty without artwork.
    pub fn palette(&self) -> &[PaletteEntry] {
        self.artwork
            .as_ref()
            .map(VectorDocument::palette)
            .unwrap_or_default()
    }

    pub(crate) fn push_member(&mut self, record: MeshRecord) {
        self.members.push(record);
    }

    /// Replace the artwork and bump the revision.
    pub(crate) fn set_artwork(&mut self, doc: VectorDocument) -> u64 {
        self.artwork = Some(doc);
        self.revision += 1;
        self.revision
    }

    /// Recolor the artwork; bumps the revision when the markup changed.
    pub(crate) fn recolor(&mut self, token: &str, new_color: &str) -> Option<u64> {
        let doc = self.artwork.as_mut()?;
        doc.recolor(token, new_color).then(|| {
            self.revision += 1;
            self.revision
        })
    }

    /// Whether a raster of `revision`/`pass` may replace what the overlays currently show.
    ///
    /// Older revisions are stale, and so is a preview of the revision whose full-size raster is
    /// already applied.
    pub(crate) fn accepts(&self, revision: u64, pass: RasterPass) -> bool {
        if revision != self.revision {
            return false;
        }
        !matches!(
            self.applied,
            Some((r, RasterPass::Full)) if r == revision && pass == RasterPass::Preview
        )
    }

    pub(crate) fn mark_applied(&mut self, revision: u64, pass: RasterPass) {
        self.applied = Some((revision, pass));
    }
}

/// Pieces keyed by canonical name, in first-seen order.
#[derive(Clone, Debug, Default)]
pub struct PieceRegistry {
    pieces: IndexMap<String, Piece>,
}

impl PieceRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `record` to the piece `name`, creating the piece on first sight.
    pub fn insert_member(&mut self, name: &str, record: MeshRecord) {
        self.pieces
            .entry(name.to_string())
            .or_insert_with(|| Piece::new(name.to_string()))
            .push_member(record);
    }

    /// Piece by canonical name.
    pub fn get(&self, name: &str) -> Option<&Piece> {
        self.pieces.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut Piece> {
        self.pieces.get_mut(name)
    }

    /// Pieces in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.values()
    }

    /// Canonical names in first-seen order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pieces.keys().map(String::as_str)
    }

    /// Number of pieces.
    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    /// `true` when no piece exists.
    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Drop every piece.
    pub fn clear(&mut self) {
        self.pieces.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pieces/registry.rs"]
mod tests;
