use glam::Vec3;
use serde::Deserialize;

use crate::math::{transform, Matrix, HALF_PI};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Parallel projection of a `width` x `height` volume
    Orthographic { width: f32, height: f32 },
    /// Perspective from the camera's field of view and aspect ratio
    Perspective,
}

impl Default for Projection {
    fn default() -> Self {
        Self::Orthographic {
            width: 640.0,
            height: 480.0,
        }
    }
}

/// Right-handed look-at camera.
///
/// Fields are read through accessors because every change has to go through
/// [`Camera::update`] to keep the matrices in sync.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    position: Vec3,
    look_at: Vec3,
    world_up: Vec3,
    direction: Vec3,

    fov: f32,
    aspect: f32,
    near: f32,
    far: f32,
    projection: Projection,

    view: Matrix,
    proj: Matrix,
    view_projection: Matrix,
    rotation: Matrix,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            position: Vec3::new(0.0, 0.0, 2.0),
            look_at: Vec3::ZERO,
            world_up: Vec3::Y,
            direction: Vec3::ZERO,
            fov: HALF_PI,
            aspect: 4.0 / 3.0,
            near: 0.5,
            far: 5000.0,
            projection: Projection::default(),
            view: Matrix::IDENTITY,
            proj: Matrix::IDENTITY,
            view_projection: Matrix::IDENTITY,
            rotation: Matrix::IDENTITY,
        };
        camera.update();
        camera
    }
}

impl Camera {
    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn look_at(&self) -> Vec3 {
        self.look_at
    }

    pub fn world_up(&self) -> Vec3 {
        self.world_up
    }

    /// Unit vector from the position towards the look-at point
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn fov(&self) -> f32 {
        self.fov
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn projection_mode(&self) -> Projection {
        self.projection
    }

    pub fn view(&self) -> &Matrix {
        &self.view
    }

    pub fn projection(&self) -> &Matrix {
        &self.proj
    }

    pub fn view_projection(&self) -> &Matrix {
        &self.view_projection
    }

    /// Accumulated rotation of the last orbit
    pub fn rotation(&self) -> &Matrix {
        &self.rotation
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.update();
    }

    pub fn set_look_at(&mut self, look_at: Vec3) {
        self.look_at = look_at;
        self.update();
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
        self.update();
    }

    pub fn set_perspective(&mut self, fov: f32, aspect: f32, near: f32, far: f32) {
        self.fov = fov;
        self.aspect = aspect;
        self.near = near;
        self.far = far;
        self.update();
    }

    pub fn update(&mut self) {
        self.direction = (self.look_at - self.position).normalize_or_zero();
        self.view = transform::look_at_rh(self.position, self.look_at, self.world_up);
        self.proj = match self.projection {
            Projection::Orthographic { width, height } => {
                transform::ortho_rh(width, height, self.near, self.far)
            }
            Projection::Perspective => {
                transform::perspective_fov_rh(self.fov, self.aspect, self.near, self.far)
            }
        };
        self.view_projection = self.view * self.proj;
    }

    /// Horizontal vector perpendicular to the viewing direction
    fn side(&self) -> Vec3 {
        Vec3::new(-self.direction.z, 0.0, self.direction.x)
    }

    /// Moves position and look-at together: sideways, along world Y, and along the
    /// viewing direction
    pub fn add_to_camera(&mut self, strafe: f32, up_down: f32, for_back: f32) {
        let offset = self.side() * strafe + Vec3::Y * up_down + self.direction * for_back;
        self.look_at += offset;
        self.position += offset;
        self.update();
    }

    /// Orbits the look-at point around the position: `x_angle` about world up, then
    /// `y_angle` about the new side vector
    pub fn rotate_around_position(&mut self, x_angle: f32, y_angle: f32) {
        let yaw = transform::rotation_axis(Vec3::Y, x_angle);
        let target = transform::transform_vector3(self.look_at - self.position, &yaw);
        self.look_at = target + self.position;
        self.direction = target.normalize_or_zero();

        let pitch = transform::rotation_axis(self.side(), y_angle);
        let target = transform::transform_vector3(self.look_at - self.position, &pitch);
        self.look_at = target + self.position;

        self.rotation = yaw * pitch;
        self.update();
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn defaults() {
        let camera = Camera::default();
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(camera.direction(), -Vec3::Z);
        assert_eq!(camera.near(), 0.5);
        assert_eq!(camera.far(), 5000.0);
        assert_eq!(
            *camera.projection(),
            transform::ortho_rh(640.0, 480.0, 0.5, 5000.0)
        );
        assert_eq!(
            *camera.view_projection(),
            *camera.view() * *camera.projection()
        );
    }

    #[test]
    fn yaw_turns_view_direction() {
        let mut camera = Camera::default();
        camera.rotate_around_position(FRAC_PI_2, 0.0);
        assert!(camera.direction().abs_diff_eq(-Vec3::X, 1e-5));
        assert!(camera
            .look_at()
            .abs_diff_eq(Vec3::new(-2.0, 0.0, 2.0), 1e-5));
        assert_eq!(camera.position(), Vec3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn pitch_tilts_towards_world_up() {
        let mut camera = Camera::default();
        camera.rotate_around_position(0.0, 0.3);
        let d = camera.direction();
        assert!((d.length() - 1.0).abs() < 1e-5);
        assert!(d.x.abs() < 1e-5);
        assert!((d.y.abs() - 0.3_f32.sin()).abs() < 1e-5);
    }

    #[test]
    fn strafe_and_dolly_move_both_points() {
        let mut camera = Camera::default();
        camera.add_to_camera(1.0, 2.0, 3.0);
        // side of -Z is +X
        assert!(camera
            .position()
            .abs_diff_eq(Vec3::new(1.0, 2.0, -1.0), 1e-6));
        assert!(camera
            .look_at()
            .abs_diff_eq(Vec3::new(1.0, 2.0, -3.0), 1e-6));
        assert!(camera.direction().abs_diff_eq(-Vec3::Z, 1e-6));
    }

    #[test]
    fn perspective_is_selectable() {
        let mut camera = Camera::default();
        camera.set_projection(Projection::Perspective);
        assert_eq!(
            *camera.projection(),
            transform::perspective_fov_rh(HALF_PI, 4.0 / 3.0, 0.5, 5000.0)
        );
    }

    #[test]
    fn reset_restores_defaults() {
        let mut camera = Camera::default();
        camera.set_projection(Projection::Perspective);
        camera.rotate_around_position(1.0, 0.5);
        camera.add_to_camera(3.0, 0.0, 10.0);
        camera.reset();
        assert_eq!(camera, Camera::default());
    }
}
