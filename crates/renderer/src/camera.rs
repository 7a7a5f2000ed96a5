//! Camera for the first-person view.

use engine_core::Transform;
use glam::{Mat4, Vec3};

/// FPS camera with configurable FOV and clipping planes.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera transform (position and rotation).
    pub transform: Transform,
    /// Field of view in degrees.
    pub fov_degrees: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
    /// Aspect ratio (width / height).
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            transform: Transform::default(),
            fov_degrees: 75.0,
            near: 0.1,
            far: 400.0,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Camera {
    /// Create a new camera at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            ..Default::default()
        }
    }

    /// Update aspect ratio (call on window resize).
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Set yaw and pitch directly (in radians) and rebuild rotation.
    /// Clamping is the caller's concern; the player controller owns the limits.
    pub fn set_yaw_pitch(&mut self, yaw: f32, pitch: f32) {
        self.transform.rotation = Transform::yaw_pitch_rotation(yaw, pitch);
    }

    /// Get the view matrix. The up vector follows the camera rotation, so
    /// looking straight up or down stays well defined.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(
            self.transform.position,
            self.transform.forward(),
            self.transform.up(),
        )
    }

    /// Get the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Get the combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn view_is_finite_at_pitch_limits() {
        let mut camera = Camera::new(Vec3::new(0.0, 2.1, 0.0));
        for pitch in [FRAC_PI_2, -FRAC_PI_2] {
            camera.set_yaw_pitch(0.7, pitch);
            assert!(camera.view_projection_matrix().is_finite());
        }
    }

    #[test]
    fn level_view_matches_look_at() {
        let mut camera = Camera::new(Vec3::new(3.0, 1.6, -2.0));
        camera.set_yaw_pitch(0.4, -0.3);
        let eye = camera.transform.position;
        let expected = Mat4::look_at_rh(eye, eye + camera.transform.forward(), Vec3::Y);
        assert!(camera.view_matrix().abs_diff_eq(expected, 1e-5));
    }
}
