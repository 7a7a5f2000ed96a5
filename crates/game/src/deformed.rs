//! The Deformed: hostile creatures that roam the factory floor.
//!
//! Each creature re-evaluates its behavior every tick from the straight-line
//! distance to the player. Steering only ever writes the horizontal velocity
//! of the body; gravity stays with physics.

use std::f32::consts::FRAC_PI_2;

use engine_core::{Transform, Vec2, Vec3, VisualHandle};
use physics::{BodyDesc, BodyShape, CollisionGroup, PhysicsBody, PhysicsWorld};
use rand::Rng;
use renderer::{RenderSurface, VisualDesc};

/// Chase-type creatures pursue inside this radius.
pub const CHASE_RANGE: f32 = 50.0;
/// Ambushers spring inside this radius.
pub const AMBUSH_RANGE: f32 = 20.0;
/// Patrollers pursue inside this radius.
pub const PATROL_RANGE: f32 = 25.0;
/// Speed multiplier while an ambusher is pursuing.
pub const AMBUSH_SPEED_MULT: f32 = 1.5;
/// Ticks an ambusher keeps pursuing after the player leaves its range.
pub const AMBUSH_PURSUIT_TICKS: u32 = 300;
/// Ticks between wander heading changes.
pub const WANDER_INTERVAL_TICKS: u64 = 60;
/// Speed multiplier while wandering.
pub const WANDER_SPEED_MULT: f32 = 0.5;

const BODY_RADIUS: f32 = 1.5;
const BODY_MASS: f32 = 2.0;
const BODY_DAMPING: f32 = 0.5;

/// How a creature reacts to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ability {
    Chase,
    Patrol,
    Ambush,
}

/// Static description of one creature archetype.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeformedType {
    pub name: &'static str,
    /// RGB tint, 0xRRGGBB.
    pub tint: u32,
    pub speed: f32,
    pub ability: Ability,
}

/// Archetypes, assigned to spawn points round-robin.
pub const DEFORMED_TYPES: [DeformedType; 4] = [
    DeformedType { name: "The Amalgam", tint: 0x8b0000, speed: 0.08, ability: Ability::Chase },
    DeformedType { name: "Hollow One", tint: 0x660000, speed: 0.12, ability: Ability::Chase },
    DeformedType { name: "The Wretch", tint: 0x440000, speed: 0.06, ability: Ability::Ambush },
    DeformedType { name: "Cluster", tint: 0xaa0000, speed: 0.07, ability: Ability::Patrol },
];

impl DeformedType {
    pub fn for_spawn_index(index: usize) -> Self {
        DEFORMED_TYPES[index % DEFORMED_TYPES.len()]
    }
}

/// What the creature did on its last tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Wandering,
    Pursuing,
}

pub struct Deformed {
    pub kind: DeformedType,
    pub transform: Transform,
    pub body: PhysicsBody,
    pub visual: VisualHandle,
    wander_heading: f32,
    ticks: u64,
    ambush_timer: u32,
    mode: Mode,
}

impl Deformed {
    pub fn spawn(
        physics: &mut PhysicsWorld,
        renderer: &mut impl RenderSurface,
        position: Vec3,
        index: usize,
    ) -> Self {
        let kind = DeformedType::for_spawn_index(index);
        let body = physics.add_body(
            BodyDesc::dynamic(position, BODY_MASS, BodyShape::Sphere { radius: BODY_RADIUS })
                .damping(BODY_DAMPING, 0.0)
                .fixed_rotation()
                .group(CollisionGroup::Enemy),
        );
        let visual = renderer.create_visual(VisualDesc::Deformed { tint: kind.tint });
        log::debug!("Spawned {} ({:?}) at {:?}", kind.name, kind.ability, position);
        Self::new(kind, position, body, visual)
    }

    fn new(kind: DeformedType, position: Vec3, body: PhysicsBody, visual: VisualHandle) -> Self {
        Self {
            kind,
            transform: Transform::from_position(position),
            body,
            visual,
            wander_heading: 0.0,
            ticks: 0,
            ambush_timer: 0,
            mode: Mode::Wandering,
        }
    }

    /// Advance the behavior by one tick and return the horizontal (x, z) velocity to apply.
    pub fn steer(&mut self, player_position: Vec3, rng: &mut impl Rng) -> Vec2 {
        self.ticks += 1;

        let distance = self.transform.position.distance(player_position);
        let speed = self.kind.speed;

        let pursuit = match self.kind.ability {
            Ability::Chase => (distance < CHASE_RANGE).then_some(speed),
            Ability::Patrol => (distance < PATROL_RANGE).then_some(speed),
            Ability::Ambush => {
                if distance < AMBUSH_RANGE {
                    self.ambush_timer = AMBUSH_PURSUIT_TICKS;
                    Some(speed * AMBUSH_SPEED_MULT)
                } else if self.ambush_timer > 0 {
                    self.ambush_timer -= 1;
                    Some(speed * AMBUSH_SPEED_MULT)
                } else {
                    None
                }
            }
        };

        match pursuit {
            Some(pursuit_speed) => {
                self.mode = Mode::Pursuing;
                let direction = (player_position - self.transform.position).normalize_or_zero();
                Vec2::new(direction.x, direction.z) * pursuit_speed
            }
            None => {
                self.mode = Mode::Wandering;
                self.wander(rng)
            }
        }
    }

    /// Roam along a heading that is perturbed every few seconds.
    fn wander(&mut self, rng: &mut impl Rng) -> Vec2 {
        if self.ticks % WANDER_INTERVAL_TICKS == 0 {
            self.wander_heading += rng.gen_range(-FRAC_PI_2..FRAC_PI_2);
        }
        Vec2::new(self.wander_heading.cos(), self.wander_heading.sin())
            * (self.kind.speed * WANDER_SPEED_MULT)
    }

    /// Steer toward or away from the player, push the result to the body,
    /// and mirror the body position.
    pub fn update(&mut self, physics: &mut PhysicsWorld, player_position: Vec3, rng: &mut impl Rng) {
        let velocity = self.steer(player_position, rng);
        physics.set_horizontal_velocity(self.body.rigid_body, velocity.x, velocity.y);
        self.sync_from_body(physics);
    }

    pub fn sync_from_body(&mut self, physics: &PhysicsWorld) {
        if let Some(position) = physics.position(self.body.rigid_body) {
            self.transform.position = position;
        }
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn name(&self) -> &'static str {
        self.kind.name
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn ambush_timer(&self) -> u32 {
        self.ambush_timer
    }

    pub fn wander_heading(&self) -> f32 {
        self.wander_heading
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use renderer::HeadlessSurface;

    fn creature(index: usize) -> (PhysicsWorld, Deformed) {
        let mut physics = PhysicsWorld::new();
        let mut surface = HeadlessSurface::new();
        let d = Deformed::spawn(&mut physics, &mut surface, Vec3::new(0.0, 1.0, 0.0), index);
        (physics, d)
    }

    fn player_at(distance: f32) -> Vec3 {
        Vec3::new(distance, 1.0, 0.0)
    }

    #[test]
    fn archetypes_assigned_round_robin() {
        assert_eq!(DeformedType::for_spawn_index(0).name, "The Amalgam");
        assert_eq!(DeformedType::for_spawn_index(2).ability, Ability::Ambush);
        assert_eq!(DeformedType::for_spawn_index(3).ability, Ability::Patrol);
        assert_eq!(DeformedType::for_spawn_index(5), DEFORMED_TYPES[1]);
    }

    #[test]
    fn chaser_pursues_inside_range_at_base_speed() {
        let (_, mut d) = creature(0);
        let mut rng = StdRng::seed_from_u64(1);
        let v = d.steer(player_at(49.0), &mut rng);
        assert_eq!(d.mode(), Mode::Pursuing);
        assert!((v - Vec2::new(0.08, 0.0)).length() < 1e-6);

        let v = d.steer(player_at(50.0), &mut rng);
        assert_eq!(d.mode(), Mode::Wandering);
        assert!((v.length() - 0.04).abs() < 1e-6);
    }

    #[test]
    fn patroller_only_reacts_inside_twenty_five() {
        let (_, mut d) = creature(3);
        let mut rng = StdRng::seed_from_u64(2);
        d.steer(player_at(30.0), &mut rng);
        assert_eq!(d.mode(), Mode::Wandering);
        let v = d.steer(player_at(24.0), &mut rng);
        assert_eq!(d.mode(), Mode::Pursuing);
        assert!((v.length() - 0.07).abs() < 1e-6);
    }

    #[test]
    fn ambusher_keeps_pursuing_for_three_hundred_ticks() {
        let (_, mut d) = creature(2);
        let mut rng = StdRng::seed_from_u64(3);
        let pursuit_speed = 0.06 * AMBUSH_SPEED_MULT;
        let wander_speed = 0.06 * WANDER_SPEED_MULT;

        let v = d.steer(player_at(15.0), &mut rng);
        assert!((v.length() - pursuit_speed).abs() < 1e-6);
        assert_eq!(d.ambush_timer(), AMBUSH_PURSUIT_TICKS);

        for tick in 1..=AMBUSH_PURSUIT_TICKS {
            let v = d.steer(player_at(30.0), &mut rng);
            assert!(
                (v.length() - pursuit_speed).abs() < 1e-6,
                "tick {} lost pursuit early",
                tick
            );
        }
        assert_eq!(d.ambush_timer(), 0);

        let v = d.steer(player_at(30.0), &mut rng);
        assert_eq!(d.mode(), Mode::Wandering);
        assert!((v.length() - wander_speed).abs() < 1e-6);
    }

    #[test]
    fn ambush_rearms_when_player_returns() {
        let (_, mut d) = creature(2);
        let mut rng = StdRng::seed_from_u64(4);
        d.steer(player_at(10.0), &mut rng);
        for _ in 0..100 {
            d.steer(player_at(40.0), &mut rng);
        }
        assert_eq!(d.ambush_timer(), AMBUSH_PURSUIT_TICKS - 100);
        d.steer(player_at(19.0), &mut rng);
        assert_eq!(d.ambush_timer(), AMBUSH_PURSUIT_TICKS);
    }

    #[test]
    fn wander_heading_only_changes_on_interval() {
        let (_, mut d) = creature(0);
        let mut rng = StdRng::seed_from_u64(5);
        let far = player_at(500.0);

        for _ in 1..WANDER_INTERVAL_TICKS {
            d.steer(far, &mut rng);
            assert_eq!(d.wander_heading(), 0.0);
        }
        d.steer(far, &mut rng);
        let turned = d.wander_heading();
        assert!(turned.abs() <= FRAC_PI_2);

        for _ in 1..WANDER_INTERVAL_TICKS {
            d.steer(far, &mut rng);
            assert_eq!(d.wander_heading(), turned);
        }
    }

    #[test]
    fn wander_velocity_follows_heading() {
        let (_, mut d) = creature(1);
        let mut rng = StdRng::seed_from_u64(6);
        let v = d.steer(player_at(500.0), &mut rng);
        // Heading starts at zero: roam along +X at half speed.
        assert!((v - Vec2::new(0.06, 0.0)).length() < 1e-6);
    }

    #[test]
    fn update_writes_horizontal_velocity_to_body() {
        let (mut physics, mut d) = creature(0);
        let mut rng = StdRng::seed_from_u64(7);
        physics.set_velocity(d.body.rigid_body, Vec3::new(0.0, -2.0, 0.0));
        d.update(&mut physics, Vec3::new(0.0, 1.0, 10.0), &mut rng);
        let v = physics.velocity(d.body.rigid_body).unwrap_or(Vec3::ZERO);
        assert!((v - Vec3::new(0.0, -2.0, 0.08)).length() < 1e-6);
    }
}
