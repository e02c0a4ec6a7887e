use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::core::{Mat4, PixelBuffer, Vec2, Vec3};
use crate::foundation::error::{StudioError, StudioResult};
use crate::scene::model::{BaseMaterial, MeshNode, Model};

/// Progress reported once the file and its buffers are in memory.
const IMPORTED_PERCENT: u8 = 40;

/// Lifecycle of one model load.
#[derive(Debug)]
pub enum LoadEvent {
    /// Loading began; previous model state should be cleared.
    Started,
    /// Percentage in `0..=100`, non-decreasing.
    Progress(u8),
    /// The model is ready. Terminal.
    Done(Model),
    /// The load failed. Terminal.
    Failed(StudioError),
}

impl LoadEvent {
    /// `true` for [`LoadEvent::Done`] and [`LoadEvent::Failed`].
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Failed(_))
    }
}

/// glTF 2.0 loader driven as a finite event stream.
///
/// Yields `Started`, some `Progress` ticks, then exactly one terminal event, after which the
/// iterator is exhausted.
pub struct ModelLoader {
    path: PathBuf,
    stage: Stage,
}

enum Stage {
    Start,
    Import,
    Flatten(Box<Flattener>),
    Finished,
}

impl ModelLoader {
    /// Prepare a load of `path` (`.gltf` or `.glb`). Nothing is read until iteration.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            stage: Stage::Start,
        }
    }

    /// Source path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Iterator for ModelLoader {
    type Item = LoadEvent;

    fn next(&mut self) -> Option<LoadEvent> {
        match std::mem::replace(&mut self.stage, Stage::Finished) {
            Stage::Start => {
                tracing::debug!(path = %self.path.display(), "model load started");
                self.stage = Stage::Import;
                Some(LoadEvent::Started)
            }
            Stage::Import => match Flattener::import(&self.path) {
                Ok(flattener) => {
                    self.stage = Stage::Flatten(Box::new(flattener));
                    Some(LoadEvent::Progress(IMPORTED_PERCENT))
                }
                Err(err) => {
                    tracing::warn!(path = %self.path.display(), error = %err, "model load failed");
                    Some(LoadEvent::Failed(err))
                }
            },
            Stage::Flatten(mut flattener) => {
                if flattener.remaining() == 0 {
                    let model = flattener.finish();
                    tracing::info!(
                        path = %self.path.display(),
                        meshes = model.meshes().len(),
                        "model loaded"
                    );
                    return Some(LoadEvent::Done(model));
                }
                flattener.flatten_next();
                let percent = flattener.percent();
                self.stage = Stage::Flatten(flattener);
                Some(LoadEvent::Progress(percent))
            }
            Stage::Finished => None,
        }
    }
}

/// Run a [`ModelLoader`] to completion.
pub fn load_model(path: impl Into<PathBuf>) -> StudioResult<Model> {
    for event in ModelLoader::open(path) {
        match event {
            LoadEvent::Done(model) => return Ok(model),
            LoadEvent::Failed(err) => return Err(err),
            LoadEvent::Started | LoadEvent::Progress(_) => {}
        }
    }
    Err(StudioError::load("model loader ended without a result"))
}

struct Flattener {
    document: gltf::Document,
    buffers: Vec<gltf::buffer::Data>,
    images: Vec<gltf::image::Data>,
    queue: Vec<(usize, Mat4)>,
    next: usize,
    textures: HashMap<usize, Option<Arc<PixelBuffer>>>,
    meshes: Vec<MeshNode>,
}

impl Flattener {
    fn import(path: &Path) -> StudioResult<Self> {
        let (document, buffers, images) = gltf::import(path).map_err(|e| {
            StudioError::load(format!("failed to import glTF '{}': {e}", path.display()))
        })?;

        let mut queue = Vec::new();
        let scene = document.default_scene().or_else(|| document.scenes().next());
        if let Some(scene) = scene {
            for node in scene.nodes() {
                collect_nodes(&node, Mat4::IDENTITY, &mut queue);
            }
        }

        Ok(Self {
            document,
            buffers,
            images,
            queue,
            next: 0,
            textures: HashMap::new(),
            meshes: Vec::new(),
        })
    }

    fn remaining(&self) -> usize {
        self.queue.len() - self.next
    }

    fn percent(&self) -> u8 {
        let span = u64::from(100 - IMPORTED_PERCENT);
        let done = (self.next as u64 * span) / (self.queue.len().max(1) as u64);
        IMPORTED_PERCENT + done as u8
    }

    fn flatten_next(&mut self) {
        let (node_index, world) = self.queue[self.next];
        self.next += 1;

        let Self {
            document,
            buffers,
            images,
            textures,
            meshes,
            ..
        } = self;
        let buffers: &[gltf::buffer::Data] = buffers;
        let Some(node) = document.nodes().nth(node_index) else {
            return;
        };
        let Some(mesh) = node.mesh() else {
            return;
        };

        let base_name = node
            .name()
            .or_else(|| mesh.name())
            .unwrap_or_default()
            .to_string();
        let multi = mesh.primitives().count() > 1;

        for (i, primitive) in mesh.primitives().enumerate() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                tracing::debug!(mesh = %base_name, mode = ?primitive.mode(), "skipping non-triangle primitive");
                continue;
            }
            let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));
            let Some(positions) = reader.read_positions() else {
                tracing::warn!(mesh = %base_name, "primitive without positions skipped");
                continue;
            };
            let positions: Vec<Vec3> = positions.map(Vec3::from_array).collect();
            let uvs: Option<Vec<Vec2>> = reader
                .read_tex_coords(0)
                .map(|iter| iter.into_f32().map(Vec2::from_array).collect());
            let indices: Vec<u32> = match reader.read_indices() {
                Some(iter) => iter.into_u32().collect(),
                None => (0..positions.len() as u32).collect(),
            };

            let pbr = primitive.material().pbr_metallic_roughness();
            let texture = pbr
                .base_color_texture()
                .and_then(|info| cached_texture(textures, images, info.texture().source().index()));
            let material = BaseMaterial {
                base_color: pbr.base_color_factor(),
                texture,
            };

            let name = if multi {
                format!("{base_name}_{i}")
            } else {
                base_name.clone()
            };
            let mut mesh_node = MeshNode::new(name, positions, indices)
                .with_world(world)
                .with_material(material);
            mesh_node.uvs = uvs;
            meshes.push(mesh_node);
        }
    }

    fn finish(self) -> Model {
        Model::from_meshes(self.meshes)
    }
}

fn cached_texture(
    cache: &mut HashMap<usize, Option<Arc<PixelBuffer>>>,
    images: &[gltf::image::Data],
    image_index: usize,
) -> Option<Arc<PixelBuffer>> {
    if let Some(cached) = cache.get(&image_index) {
        return cached.clone();
    }
    let converted = match images.get(image_index).map(image_to_buffer) {
        Some(Ok(buf)) => Some(Arc::new(buf)),
        Some(Err(err)) => {
            tracing::warn!(image = image_index, error = %err, "base color texture ignored");
            None
        }
        None => None,
    };
    cache.insert(image_index, converted.clone());
    converted
}

fn collect_nodes(node: &gltf::Node<'_>, parent: Mat4, out: &mut Vec<(usize, Mat4)>) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());
    out.push((node.index(), world));
    for child in node.children() {
        collect_nodes(&child, world, out);
    }
}

fn image_to_buffer(data: &gltf::image::Data) -> StudioResult<PixelBuffer> {
    use gltf::image::Format;

    let rgba: Vec<u8> = match data.format {
        Format::R8G8B8A8 => data.pixels.clone(),
        Format::R8G8B8 => data
            .pixels
            .chunks_exact(3)
            .flat_map(|c| [c[0], c[1], c[2], 255])
            .collect(),
        Format::R8G8 => data
            .pixels
            .chunks_exact(2)
            .flat_map(|c| [c[0], c[0], c[0], c[1]])
            .collect(),
        Format::R8 => data.pixels.iter().flat_map(|&l| [l, l, l, 255]).collect(),
        other => {
            return Err(StudioError::decode(format!(
                "unsupported base color texture format {other:?}"
            )));
        }
    };
    let img = image::RgbaImage::from_raw(data.width, data.height, rgba).ok_or_else(|| {
        StudioError::decode(format!(
            "texture data does not match {}x{}",
            data.width, data.height
        ))
    })?;
    PixelBuffer::from_rgba_image(&img)
}

#[cfg(test)]
#[path = "../../tests/unit/scene/loader.rs"]
mod tests;
