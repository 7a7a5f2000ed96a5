//! glTF model loading.
//!
//! Models are read on a loader thread and handed back through a one-shot
//! channel. Only the data the simulation needs survives the load: each
//! node's name and, for nodes that carry mesh geometry, its world-space
//! bounding box.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use glam::{Mat4, Vec3};

/// Error type for model loading.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("failed to load glTF file {path}: {source}")]
    Gltf {
        path: PathBuf,
        #[source]
        source: gltf::Error,
    },

    #[error("model {0} contains no mesh geometry")]
    NoGeometry(PathBuf),

    #[error("model loader for {0} exited without a result")]
    LoaderDisconnected(PathBuf),
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Box with the given center and full size.
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        Self {
            min: center - size * 0.5,
            max: center + size * 0.5,
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Bounds of this box after an affine transform (all eight corners).
    pub fn transformed(&self, matrix: &Mat4) -> Aabb {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            let p = matrix.transform_point3(corner);
            min = min.min(p);
            max = max.max(p);
        }
        Aabb { min, max }
    }
}

/// Renderable geometry carried by a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// World-space bounds of all primitives on the node.
    pub bounds: Aabb,
}

/// One node of a loaded scene. Group nodes have no geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelNode {
    pub name: Option<String>,
    pub geometry: Option<Geometry>,
}

impl ModelNode {
    /// Geometry capability of this node, if it has any.
    pub fn renderable(&self) -> Option<&Geometry> {
        self.geometry.as_ref()
    }
}

/// A model flattened to its nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedModel {
    pub source: PathBuf,
    pub nodes: Vec<ModelNode>,
}

impl LoadedModel {
    /// Nodes that expose renderable geometry.
    pub fn renderable_nodes(&self) -> impl Iterator<Item = &Geometry> {
        self.nodes.iter().filter_map(ModelNode::renderable)
    }

    /// Union of all geometry bounds, or `None` for a model with no geometry.
    pub fn bounds(&self) -> Option<Aabb> {
        self.renderable_nodes()
            .map(|g| g.bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Scale every node uniformly about the origin, then translate.
    pub fn apply_uniform_transform(&mut self, scale: f32, offset: Vec3) {
        let matrix = Mat4::from_translation(offset) * Mat4::from_scale(Vec3::splat(scale));
        for node in &mut self.nodes {
            if let Some(geometry) = node.geometry.as_mut() {
                geometry.bounds = geometry.bounds.transformed(&matrix);
            }
        }
    }
}

/// Load a glTF/GLB file synchronously.
pub fn load_model(path: impl AsRef<Path>) -> Result<LoadedModel, ModelError> {
    let path = path.as_ref();
    let (document, _buffers, _images) = gltf::import(path).map_err(|source| ModelError::Gltf {
        path: path.to_path_buf(),
        source,
    })?;

    let mut nodes = Vec::new();
    for scene in document.scenes() {
        for node in scene.nodes() {
            collect_node(&node, Mat4::IDENTITY, &mut nodes);
        }
    }

    let model = LoadedModel {
        source: path.to_path_buf(),
        nodes,
    };
    if model.bounds().is_none() {
        return Err(ModelError::NoGeometry(path.to_path_buf()));
    }

    log::info!(
        "Loaded model {}: {} nodes, {} with geometry",
        path.display(),
        model.nodes.len(),
        model.renderable_nodes().count()
    );
    Ok(model)
}

/// Flatten a glTF node and its children, accumulating world transforms.
fn collect_node(node: &gltf::Node, parent: Mat4, out: &mut Vec<ModelNode>) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    let geometry = node.mesh().and_then(|mesh| {
        mesh.primitives()
            .map(|primitive| {
                let bb = primitive.bounding_box();
                Aabb::new(Vec3::from(bb.min), Vec3::from(bb.max)).transformed(&world)
            })
            .reduce(|a, b| a.union(&b))
            .map(|bounds| Geometry { bounds })
    });

    out.push(ModelNode {
        name: node.name().map(str::to_owned),
        geometry,
    });

    for child in node.children() {
        collect_node(&child, world, out);
    }
}

/// A model load running off the frame thread.
///
/// [`PendingModel::poll`] never blocks; it yields the result exactly once.
#[derive(Debug)]
pub struct PendingModel {
    path: PathBuf,
    receiver: Option<Receiver<Result<LoadedModel, ModelError>>>,
}

impl PendingModel {
    /// Start loading `path` on a background thread.
    pub fn spawn(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let (sender, receiver) = mpsc::channel();
        let thread_path = path.clone();
        let spawned = std::thread::Builder::new()
            .name("model-loader".into())
            .spawn(move || {
                // The receiver may be gone if the session restarted mid-load.
                let _ = sender.send(load_model(&thread_path));
            });
        if let Err(e) = spawned {
            log::warn!("Could not start loader thread for {}: {}", path.display(), e);
        }
        Self {
            path,
            receiver: Some(receiver),
        }
    }

    /// A load that has already finished with `result`.
    pub fn completed(path: impl Into<PathBuf>, result: Result<LoadedModel, ModelError>) -> Self {
        let (sender, receiver) = mpsc::channel();
        let _ = sender.send(result);
        Self {
            path: path.into(),
            receiver: Some(receiver),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check for completion. Returns `Some` once, then `None` forever.
    pub fn poll(&mut self) -> Option<Result<LoadedModel, ModelError>> {
        let receiver = self.receiver.as_ref()?;
        let outcome = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => Err(ModelError::LoaderDisconnected(self.path.clone())),
        };
        self.receiver = None;
        Some(outcome)
    }

    /// Whether the result has already been taken.
    pub fn is_finished(&self) -> bool {
        self.receiver.is_none()
    }
}
