//! Overlay studio: UV-region artwork overlays for textured 3D models.
//!
//! A loaded glTF model is partitioned into *pieces*, groups of meshes sharing a canonical name.
//! SVG artwork attached to a piece is rasterized to cover exactly each member mesh's
//! texture-space bounding box and bound as a multiply-blended overlay, so recoloring never
//! touches the base model.
//!
//! The public API is session-oriented:
//!
//! - Load a model with [`ModelLoader`] and hand the events to a [`Studio`]
//! - Attach artwork with [`Studio::attach_artwork`] and edit its palette with [`Studio::recolor`]
//! - Snapshot the result with [`Studio::capture_four_views`] and lay it out with [`SketchSheet`]
//!
//! Pixels are **premultiplied RGBA8** end-to-end.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Vector artwork preparation and rasterization.
pub mod assets;
/// Multi-view capture.
pub mod capture;
/// Sketch sheet export.
pub mod export;
/// Overlay compositor.
pub mod overlay;
/// Color token extraction and rewriting.
pub mod palette;
/// Mesh piece indexing.
pub mod pieces;
/// Software renderer.
pub mod render;
/// Model representation and loading.
pub mod scene;
/// Editing session.
pub mod session;

pub use crate::foundation::core::{
    BoundingSphere, MAX_RASTER_DIM, Mat4, PixelBuffer, UV_EPSILON, UvBounds, Vec2, Vec3, Vec4,
};
pub use crate::foundation::error::{StudioError, StudioResult};

pub use crate::assets::svg_raster::{FitMode, rasterize, try_rasterize};
pub use crate::capture::views::{CaptureOpts, FourViews, ViewDirection, capture_views};
pub use crate::export::sheet::{SheetLayout, SketchSheet};
pub use crate::overlay::compositor::{BindOutcome, Overlay, OverlayMaterial, TextureHandle, bind};
pub use crate::palette::extract::{PaletteEntry, extract_colors};
pub use crate::palette::rewrite::rewrite;
pub use crate::pieces::index::index_meshes;
pub use crate::pieces::naming::canonicalize;
pub use crate::pieces::registry::{MeshRecord, Piece, PieceRegistry, VectorDocument};
pub use crate::render::camera::{Camera, FitData};
pub use crate::render::cpu::{CpuRenderer, RenderTarget};
pub use crate::scene::loader::{LoadEvent, ModelLoader, load_model};
pub use crate::scene::model::{BaseMaterial, MeshDescriptor, MeshId, MeshNode, Model};
pub use crate::session::jobs::{ApplyOutcome, RasterJob, RasterPass, RasterResult, RecolorPlan};
pub use crate::session::opts::StudioOpts;
pub use crate::session::studio::Studio;
