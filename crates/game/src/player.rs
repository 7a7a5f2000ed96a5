//! Player controller: mouse look and WASD movement on a physics body.

use std::f32::consts::FRAC_PI_2;

use engine_core::{Health, Quat, Transform, Vec2, Vec3, VisualHandle};
use input::InputSnapshot;
use physics::{BodyDesc, BodyShape, CollisionGroup, PhysicsBody, PhysicsWorld};
use renderer::{RenderSurface, VisualDesc};

/// Radians of rotation per pixel of mouse motion.
pub const MOUSE_SENSITIVITY: f32 = 0.005;
/// Horizontal speed assigned while a move key is held.
pub const MOVE_SPEED: f32 = 0.15;
/// Per-tick horizontal velocity multiplier while no move key is held.
pub const COAST_DECAY: f32 = 0.9;
/// Camera height above the player body.
pub const EYE_HEIGHT: f32 = 1.6;

const BODY_RADIUS: f32 = 0.5;
const BODY_MASS: f32 = 1.0;
const BODY_DAMPING: f32 = 0.3;

/// Player controller handling look and movement.
///
/// The physics body is authoritative for position; `transform` only mirrors it.
pub struct Player {
    pub transform: Transform,
    pub body: PhysicsBody,
    pub visual: VisualHandle,
    pub health: Health,
    yaw: f32,
    pitch: f32,
}

impl Player {
    pub fn spawn(
        physics: &mut PhysicsWorld,
        renderer: &mut impl RenderSurface,
        position: Vec3,
    ) -> Self {
        let body = physics.add_body(
            BodyDesc::dynamic(position, BODY_MASS, BodyShape::Sphere { radius: BODY_RADIUS })
                .damping(BODY_DAMPING, BODY_DAMPING)
                .fixed_rotation()
                .group(CollisionGroup::Player),
        );
        Self {
            transform: Transform::from_position(position),
            body,
            visual: renderer.create_visual(VisualDesc::Player),
            health: Health::new(100),
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Apply one tick of input: look, then move.
    pub fn update(&mut self, input: &InputSnapshot, physics: &mut PhysicsWorld) {
        self.look(input.mouse_delta);

        let axes = input.movement_axes();
        if axes != Vec2::ZERO {
            let local = Vec3::new(axes.x, 0.0, axes.y).normalize();
            let direction = Quat::from_rotation_y(self.yaw) * local;
            physics.set_horizontal_velocity(
                self.body.rigid_body,
                direction.x * MOVE_SPEED,
                direction.z * MOVE_SPEED,
            );
        } else if let Some(v) = physics.velocity(self.body.rigid_body) {
            physics.set_horizontal_velocity(
                self.body.rigid_body,
                v.x * COAST_DECAY,
                v.z * COAST_DECAY,
            );
        }

        self.sync_from_body(physics);
    }

    /// Rotate the view by a mouse delta. Pitch stays within ±90°.
    pub fn look(&mut self, mouse_delta: Vec2) {
        self.yaw -= mouse_delta.x * MOUSE_SENSITIVITY;
        self.pitch = (self.pitch - mouse_delta.y * MOUSE_SENSITIVITY).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Copy the body position into the visual transform.
    pub fn sync_from_body(&mut self, physics: &PhysicsWorld) {
        if let Some(position) = physics.position(self.body.rigid_body) {
            self.transform.position = position;
        }
    }

    /// Move the player body (and its mirror) to `position`, dropping any velocity.
    pub fn teleport(&mut self, physics: &mut PhysicsWorld, position: Vec3) {
        physics.set_position(self.body.rigid_body, position);
        physics.set_velocity(self.body.rigid_body, Vec3::ZERO);
        self.transform.position = position;
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    /// Eye position used for the camera.
    pub fn eye_position(&self) -> Vec3 {
        self.transform.position + Vec3::Y * EYE_HEIGHT
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use input::KeyCode;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use renderer::HeadlessSurface;

    fn spawn_player() -> (PhysicsWorld, Player) {
        let mut physics = PhysicsWorld::new();
        let mut surface = HeadlessSurface::new();
        let player = Player::spawn(&mut physics, &mut surface, Vec3::new(0.0, 2.0, 0.0));
        (physics, player)
    }

    fn snapshot(keys: &[KeyCode], mouse: Vec2) -> InputSnapshot {
        InputSnapshot {
            keys: keys.iter().copied().collect(),
            mouse_delta: mouse,
        }
    }

    fn horizontal_speed(physics: &PhysicsWorld, player: &Player) -> f32 {
        physics
            .velocity(player.body.rigid_body)
            .map(|v| Vec2::new(v.x, v.z).length())
            .unwrap_or(0.0)
    }

    #[test]
    fn pitch_stays_clamped_for_any_mouse_sequence() {
        let (mut physics, mut player) = spawn_player();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let dy = rng.gen_range(-800.0..800.0);
            player.update(&snapshot(&[], Vec2::new(0.0, dy)), &mut physics);
            assert!(player.pitch() >= -FRAC_PI_2 && player.pitch() <= FRAC_PI_2);
        }
    }

    #[test]
    fn large_upward_motion_pins_pitch_at_limit() {
        let (_, mut player) = spawn_player();
        player.look(Vec2::new(0.0, -10_000.0));
        assert_eq!(player.pitch(), FRAC_PI_2);
        player.look(Vec2::new(0.0, 10_000.0));
        assert_eq!(player.pitch(), -FRAC_PI_2);
    }

    #[test]
    fn yaw_is_unbounded() {
        let (_, mut player) = spawn_player();
        for _ in 0..10 {
            player.look(Vec2::new(-1000.0, 0.0));
        }
        assert!((player.yaw() - 50.0).abs() < 1e-3);
    }

    #[test]
    fn forward_key_moves_along_negative_z_at_rest() {
        let (mut physics, mut player) = spawn_player();
        player.update(&snapshot(&[KeyCode::KeyW], Vec2::ZERO), &mut physics);
        let v = physics.velocity(player.body.rigid_body).unwrap_or(Vec3::ZERO);
        assert!(v.x.abs() < 1e-6);
        assert!((v.z + MOVE_SPEED).abs() < 1e-6);
    }

    #[test]
    fn diagonal_movement_is_normalized_and_rotated_by_yaw() {
        let (mut physics, mut player) = spawn_player();
        // Turn a quarter to the left: forward becomes -X.
        player.look(Vec2::new(-FRAC_PI_2 / MOUSE_SENSITIVITY, 0.0));
        player.update(&snapshot(&[KeyCode::KeyW], Vec2::ZERO), &mut physics);
        let v = physics.velocity(player.body.rigid_body).unwrap_or(Vec3::ZERO);
        assert!((v.x + MOVE_SPEED).abs() < 1e-4);
        assert!(v.z.abs() < 1e-4);

        player.update(&snapshot(&[KeyCode::KeyW, KeyCode::KeyD], Vec2::ZERO), &mut physics);
        assert!((horizontal_speed(&physics, &player) - MOVE_SPEED).abs() < 1e-5);
    }

    #[test]
    fn vertical_velocity_is_left_to_physics() {
        let (mut physics, mut player) = spawn_player();
        physics.set_velocity(player.body.rigid_body, Vec3::new(0.0, -4.0, 0.0));
        player.update(&snapshot(&[KeyCode::KeyS], Vec2::ZERO), &mut physics);
        let v = physics.velocity(player.body.rigid_body).unwrap_or(Vec3::ZERO);
        assert_eq!(v.y, -4.0);
        assert!((v.z - MOVE_SPEED).abs() < 1e-6);
    }

    #[test]
    fn coasting_decays_horizontal_speed_each_tick() {
        let (mut physics, mut player) = spawn_player();
        player.update(&snapshot(&[KeyCode::KeyW, KeyCode::KeyA], Vec2::ZERO), &mut physics);

        let mut previous = horizontal_speed(&physics, &player);
        for _ in 0..30 {
            player.update(&snapshot(&[], Vec2::ZERO), &mut physics);
            let speed = horizontal_speed(&physics, &player);
            assert!(speed < previous);
            assert!((speed - previous * COAST_DECAY).abs() < 1e-6);
            previous = speed;
        }
        assert!(previous > 0.0);
    }

    #[test]
    fn coasting_with_physics_steps_still_slows_down() {
        let (mut physics, mut player) = spawn_player();
        player.update(&snapshot(&[KeyCode::KeyD], Vec2::ZERO), &mut physics);
        physics.step(1.0 / 30.0);

        let mut previous = horizontal_speed(&physics, &player);
        for _ in 0..20 {
            player.update(&snapshot(&[], Vec2::ZERO), &mut physics);
            physics.step(1.0 / 30.0);
            let speed = horizontal_speed(&physics, &player);
            assert!(speed < previous, "speed rose from {} to {}", previous, speed);
            previous = speed;
        }
    }

    #[test]
    fn transform_mirrors_body_after_step() {
        let (mut physics, mut player) = spawn_player();
        for _ in 0..5 {
            physics.step(1.0 / 30.0);
        }
        player.sync_from_body(&physics);
        assert_eq!(Some(player.position()), physics.position(player.body.rigid_body));
        assert!(player.position().y < 2.0);
    }
}
