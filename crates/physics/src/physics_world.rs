//! Physics world management with Rapier3D.

use crate::collision::{CollisionGroup, PhysicsBody};
use engine_core::Vec3;
use rapier3d::prelude::*;

/// Default fixed-step frequency in Hz.
pub const DEFAULT_PHYSICS_HZ: f32 = 30.0;

/// Collider shape for a body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    Sphere { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

/// Everything needed to create one rigid body with a single collider.
///
/// A mass of zero produces a fixed (static) body that never moves and never
/// receives velocity.
#[derive(Debug, Clone, Copy)]
pub struct BodyDesc {
    pub position: Vec3,
    pub mass: f32,
    pub shape: BodyShape,
    pub linear_damping: f32,
    pub angular_damping: f32,
    pub fixed_rotation: bool,
    pub sensor: bool,
    pub group: CollisionGroup,
}

impl BodyDesc {
    /// Dynamic body with the given mass.
    pub fn dynamic(position: Vec3, mass: f32, shape: BodyShape) -> Self {
        Self {
            position,
            mass,
            shape,
            linear_damping: 0.0,
            angular_damping: 0.0,
            fixed_rotation: false,
            sensor: false,
            group: CollisionGroup::Environment,
        }
    }

    /// Static (mass 0) body.
    pub fn fixed(position: Vec3, shape: BodyShape) -> Self {
        Self::dynamic(position, 0.0, shape)
    }

    pub fn damping(mut self, linear: f32, angular: f32) -> Self {
        self.linear_damping = linear;
        self.angular_damping = angular;
        self
    }

    pub fn fixed_rotation(mut self) -> Self {
        self.fixed_rotation = true;
        self
    }

    /// Make the collider a sensor: it reports overlaps but produces no contact response.
    pub fn sensor(mut self) -> Self {
        self.sensor = true;
        self
    }

    pub fn group(mut self, group: CollisionGroup) -> Self {
        self.group = group;
        self
    }

    pub fn is_static(&self) -> bool {
        self.mass <= 0.0
    }
}

/// Main physics world containing all simulation state.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    /// Create a new physics world with earth-like gravity.
    pub fn new() -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = 1.0 / DEFAULT_PHYSICS_HZ;
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, -9.82, 0.0],
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Advance the simulation by one fixed step of `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        if dt <= 0.0 || !dt.is_finite() {
            log::warn!("Ignoring physics step with invalid dt {}", dt);
            return;
        }
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Create a rigid body and its collider from a description.
    pub fn add_body(&mut self, desc: BodyDesc) -> PhysicsBody {
        let translation = vector![desc.position.x, desc.position.y, desc.position.z];
        let mut builder = if desc.is_static() {
            RigidBodyBuilder::fixed()
        } else {
            RigidBodyBuilder::dynamic()
                .linear_damping(desc.linear_damping)
                .angular_damping(desc.angular_damping)
        };
        builder = builder.translation(translation);
        if desc.fixed_rotation {
            builder = builder.lock_rotations();
        }
        let body_handle = self.rigid_body_set.insert(builder.build());

        let mut collider = match desc.shape {
            BodyShape::Sphere { radius } => ColliderBuilder::ball(radius),
            BodyShape::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            }
        }
        .sensor(desc.sensor)
        .collision_groups(desc.group.interaction_groups());
        if !desc.is_static() {
            collider = collider.mass(desc.mass);
        }
        let collider_handle = self.collider_set.insert_with_parent(
            collider.build(),
            body_handle,
            &mut self.rigid_body_set,
        );

        PhysicsBody::with_collider(body_handle, collider_handle)
    }

    /// Length in seconds of the most recent step.
    pub fn timestep(&self) -> f32 {
        self.integration_parameters.dt
    }

    /// Add a ground plane collider (flat Y=0 half-space).
    pub fn add_ground_plane(&mut self) -> ColliderHandle {
        let collider = ColliderBuilder::halfspace(Vector::y_axis())
            .collision_groups(CollisionGroup::Environment.interaction_groups())
            .build();
        self.collider_set.insert(collider)
    }

    /// World position of a body.
    pub fn position(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(handle).map(|body| {
            let pos = body.translation();
            Vec3::new(pos.x, pos.y, pos.z)
        })
    }

    /// Teleport a body.
    pub fn set_position(&mut self, handle: RigidBodyHandle, position: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_translation(vector![position.x, position.y, position.z], true);
        }
    }

    /// Linear velocity of a body.
    pub fn velocity(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(handle).map(|body| {
            let v = body.linvel();
            Vec3::new(v.x, v.y, v.z)
        })
    }

    /// Set the full linear velocity of a dynamic body. Static bodies are left untouched.
    pub fn set_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            if !body.is_dynamic() {
                log::debug!("Refusing to set velocity on non-dynamic body {:?}", handle);
                return;
            }
            body.set_linvel(vector![velocity.x, velocity.y, velocity.z], true);
        }
    }

    /// Set the X/Z velocity components, leaving the vertical component to gravity.
    pub fn set_horizontal_velocity(&mut self, handle: RigidBodyHandle, x: f32, z: f32) {
        if let Some(current) = self.velocity(handle) {
            self.set_velocity(handle, Vec3::new(x, current.y, z));
        }
    }

    /// Remove a rigid body and its colliders.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    /// Remove a parentless collider by its handle.
    pub fn remove_collider(&mut self, handle: ColliderHandle) {
        self.collider_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.rigid_body_set,
            true,
        );
    }

    /// Number of rigid bodies in the world.
    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_bodies_ignore_velocity() {
        let mut world = PhysicsWorld::new();
        let body = world.add_body(BodyDesc::fixed(
            Vec3::new(1.0, 1.0, 1.0),
            BodyShape::Sphere { radius: 0.4 },
        ));
        world.set_velocity(body.rigid_body, Vec3::new(5.0, 0.0, 5.0));
        assert_eq!(world.velocity(body.rigid_body), Some(Vec3::ZERO));
        world.step(1.0 / 30.0);
        assert_eq!(world.position(body.rigid_body), Some(Vec3::new(1.0, 1.0, 1.0)));
    }

    #[test]
    fn horizontal_velocity_keeps_vertical_component() {
        let mut world = PhysicsWorld::new();
        let body = world.add_body(
            BodyDesc::dynamic(Vec3::new(0.0, 10.0, 0.0), 1.0, BodyShape::Sphere { radius: 0.5 })
                .fixed_rotation(),
        );
        world.set_velocity(body.rigid_body, Vec3::new(0.0, -3.0, 0.0));
        world.set_horizontal_velocity(body.rigid_body, 2.0, -1.0);
        let v = world.velocity(body.rigid_body).unwrap_or(Vec3::ZERO);
        assert_eq!(v, Vec3::new(2.0, -3.0, -1.0));
    }

    #[test]
    fn gravity_pulls_dynamic_bodies_down() {
        let mut world = PhysicsWorld::new();
        let body = world.add_body(BodyDesc::dynamic(
            Vec3::new(0.0, 10.0, 0.0),
            1.0,
            BodyShape::Sphere { radius: 0.5 },
        ));
        for _ in 0..10 {
            world.step(1.0 / 30.0);
        }
        let y = world.position(body.rigid_body).map(|p| p.y).unwrap_or(10.0);
        assert!(y < 10.0);
    }

    #[test]
    fn ground_plane_stops_falling_bodies() {
        let mut world = PhysicsWorld::new();
        world.add_ground_plane();
        let body = world.add_body(BodyDesc::dynamic(
            Vec3::new(0.0, 2.0, 0.0),
            1.0,
            BodyShape::Sphere { radius: 0.5 },
        ));
        for _ in 0..120 {
            world.step(1.0 / 30.0);
        }
        let y = world.position(body.rigid_body).map(|p| p.y).unwrap_or(0.0);
        assert!(y > 0.3, "body sank through the floor: y = {}", y);
    }

    #[test]
    fn removing_a_body_drops_it_from_the_world() {
        let mut world = PhysicsWorld::new();
        let body = world.add_body(BodyDesc::fixed(
            Vec3::ZERO,
            BodyShape::Cuboid { half_extents: Vec3::ONE },
        ));
        assert_eq!(world.body_count(), 1);
        world.remove_body(body.rigid_body);
        assert_eq!(world.body_count(), 0);
        assert!(world.position(body.rigid_body).is_none());
    }
}
