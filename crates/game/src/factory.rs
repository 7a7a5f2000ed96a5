//! The factory level: a procedural placeholder that a loaded model replaces.

use engine_core::{Vec3, VisualHandle};
use physics::{BodyDesc, BodyShape, CollisionGroup, PhysicsWorld, RigidBodyHandle};
use renderer::{Aabb, LoadedModel, PendingModel, RenderSurface, VisualDesc};

use crate::error::GameError;
use crate::player::EYE_HEIGHT;

pub const PLACEHOLDER_CENTER: Vec3 = Vec3::new(0.0, 10.0, 0.0);
pub const PLACEHOLDER_SIZE: Vec3 = Vec3::new(60.0, 20.0, 40.0);

/// Largest dimension a loaded model is rescaled to when it is far off scale.
pub const NORMALIZED_EXTENT: f32 = 60.0;
const OVERSIZED_EXTENT: f32 = 100.0;
const UNDERSIZED_EXTENT: f32 = 5.0;
/// Clearance between the player's eye height and the spawn height.
const SPAWN_CLEARANCE: f32 = 0.5;

/// Machinery blocks (center, full size).
const MACHINERY: [([f32; 3], [f32; 3]); 6] = [
    ([20.0, 2.0, 10.0], [4.0, 4.0, 4.0]),
    ([-20.0, 2.0, 10.0], [4.0, 4.0, 4.0]),
    ([20.0, 2.0, -10.0], [4.0, 4.0, 4.0]),
    ([-20.0, 2.0, -10.0], [4.0, 4.0, 4.0]),
    ([0.0, 2.0, 15.0], [4.0, 4.0, 4.0]),
    ([10.0, 2.0, -20.0], [4.0, 4.0, 4.0]),
];

/// Crates and debris.
const DECOR: [([f32; 3], [f32; 3]); 5] = [
    ([5.0, 0.5, 5.0], [1.5, 1.0, 1.5]),
    ([-10.0, 0.5, 8.0], [1.5, 1.0, 1.5]),
    ([15.0, 0.5, -5.0], [1.5, 1.0, 1.5]),
    ([-5.0, 0.5, -15.0], [1.5, 1.0, 1.5]),
    ([25.0, 0.5, 5.0], [1.5, 1.0, 1.5]),
];

pub struct Factory {
    pub visual: VisualHandle,
    center: Vec3,
    size: Vec3,
    /// Static bodies standing on the ground, swapped out when a model arrives.
    structures: Vec<RigidBodyHandle>,
    pending: Option<PendingModel>,
    ready: bool,
}

impl Factory {
    /// Build the placeholder and take ownership of the model load.
    pub fn build(
        physics: &mut PhysicsWorld,
        renderer: &mut impl RenderSurface,
        model: PendingModel,
    ) -> Self {
        physics.add_ground_plane();
        let structures = MACHINERY
            .iter()
            .chain(DECOR.iter())
            .map(|(center, size)| add_block(physics, Vec3::from(*center), Vec3::from(*size)))
            .collect();

        log::info!(
            "Placeholder factory built; waiting for {}",
            model.path().display()
        );
        Self {
            visual: renderer.create_visual(VisualDesc::Factory),
            center: PLACEHOLDER_CENTER,
            size: PLACEHOLDER_SIZE,
            structures,
            pending: Some(model),
            ready: false,
        }
    }

    /// Check on the model load. Returns true exactly once, on the call where
    /// the factory becomes ready, whether the model loaded or not.
    pub fn poll(&mut self, physics: &mut PhysicsWorld, renderer: &mut impl RenderSurface) -> bool {
        let Some(pending) = self.pending.as_mut() else {
            return false;
        };
        let Some(result) = pending.poll() else {
            return false;
        };
        self.pending = None;

        match result {
            Ok(model) => {
                if let Err(e) = self.apply_model(physics, renderer, model) {
                    log::warn!("Keeping placeholder factory colliders: {}", e);
                }
            }
            Err(e) => {
                log::error!("Error loading factory model: {}", e);
                log::info!("Using procedural factory as fallback");
            }
        }
        self.ready = true;
        true
    }

    fn apply_model(
        &mut self,
        physics: &mut PhysicsWorld,
        renderer: &mut impl RenderSurface,
        mut model: LoadedModel,
    ) -> Result<(), GameError> {
        let bounds = normalize(&mut model).ok_or_else(|| {
            GameError::Model(renderer::ModelError::NoGeometry(model.source.clone()))
        })?;
        renderer.attach_model(self.visual, &model)?;

        for body in self.structures.drain(..) {
            physics.remove_body(body);
        }
        self.center = bounds.center();
        self.size = bounds.size();

        let spawn = self.spawn_point();
        for geometry in model.renderable_nodes() {
            let b = geometry.bounds;
            let size = b.size();
            if size.min_element() <= 0.0 || contains(&b, spawn) {
                continue;
            }
            self.structures.push(add_block(physics, b.center(), size));
        }

        log::info!(
            "Factory model ready: center {:?}, size {:?}, {} colliders",
            self.center,
            self.size,
            self.structure_count()
        );
        Ok(())
    }

    /// Where the player should stand once the factory is ready.
    pub fn spawn_point(&self) -> Vec3 {
        let ground_y = self.center.y - self.size.y / 2.0;
        Vec3::new(self.center.x, ground_y + EYE_HEIGHT + SPAWN_CLEARANCE, self.center.z)
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn center(&self) -> Vec3 {
        self.center
    }

    pub fn size(&self) -> Vec3 {
        self.size
    }

    pub fn structure_count(&self) -> usize {
        self.structures.len()
    }
}

fn add_block(physics: &mut PhysicsWorld, center: Vec3, size: Vec3) -> RigidBodyHandle {
    physics
        .add_body(
            BodyDesc::fixed(center, BodyShape::Cuboid { half_extents: size * 0.5 })
                .group(CollisionGroup::Environment),
        )
        .rigid_body
}

fn contains(b: &Aabb, p: Vec3) -> bool {
    p.cmpge(b.min).all() && p.cmple(b.max).all()
}

/// Bring a model to a playable scale and sit it on the origin: rescale to
/// [`NORMALIZED_EXTENT`] if its largest side is huge or tiny, then recentre
/// on X/Z with its base at y = 0. Returns the final bounds.
pub fn normalize(model: &mut LoadedModel) -> Option<Aabb> {
    let max_dim = model.bounds()?.size().max_element();
    if max_dim > OVERSIZED_EXTENT || (max_dim > 0.0 && max_dim < UNDERSIZED_EXTENT) {
        let scale = NORMALIZED_EXTENT / max_dim;
        log::info!("Scaling factory model by {} (largest side {})", scale, max_dim);
        model.apply_uniform_transform(scale, Vec3::ZERO);
    }

    let bounds = model.bounds()?;
    let center = bounds.center();
    model.apply_uniform_transform(1.0, Vec3::new(-center.x, -bounds.min.y, -center.z));
    model.bounds()
}
