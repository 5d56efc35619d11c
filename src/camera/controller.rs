use std::f32::consts::PI;

use glam::{Vec2, Vec3};

use crate::camera::core::Camera;
use crate::options::CameraOptions;

/// Radians of orbit per pixel of drag at `rotate_speed = 1`.
const ROTATE_RADIANS_PER_PIXEL: f32 = 0.005;
/// Fraction of the eye-target distance panned per pixel at `pan_speed = 1`.
const PAN_DISTANCE_PER_PIXEL: f32 = 0.002;
/// Zoom step base: one unit of scroll scales the distance by this.
const ZOOM_STEP: f32 = 0.95;
/// Polar angle margin keeping the eye off the poles (avoids a degenerate
/// up vector).
const POLAR_EPSILON: f32 = 1e-4;
/// Squared residual below which pending input (or eye motion) counts as
/// zero.
const SETTLE_EPSILON_SQ: f32 = 1e-10;

/// Orbit-style camera controller with optional damping.
///
/// Pointer input only accumulates deltas; [`update`](Self::update) applies
/// them to the camera once per frame. With damping enabled each update
/// applies `damping_factor` of the outstanding delta and keeps the rest,
/// giving the camera inertia after the pointer is released.
#[derive(Debug, Clone)]
pub struct OrbitController {
    target: Vec3,
    /// Pending (azimuth, polar) rotation in radians.
    rotate_delta: Vec2,
    /// Pending pan in pixels.
    pan_delta: Vec2,
    /// Pending distance multiplier.
    scale: f32,

    enable_damping: bool,
    damping_factor: f32,
    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,

    home_eye: Vec3,
    home_target: Vec3,
}

impl OrbitController {
    /// Controller orbiting `camera`'s current target.
    #[must_use]
    pub fn new(camera: &Camera, options: &CameraOptions) -> Self {
        let mut controller = Self {
            target: camera.target,
            rotate_delta: Vec2::ZERO,
            pan_delta: Vec2::ZERO,
            scale: 1.0,
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            home_eye: camera.eye,
            home_target: camera.target,
        };
        controller.apply_options(options);
        controller
    }

    /// Take speeds, damping, and distance limits from `options`.
    pub fn apply_options(&mut self, options: &CameraOptions) {
        self.enable_damping = options.enable_damping;
        self.damping_factor = options.damping_factor.clamp(0.001, 1.0);
        self.rotate_speed = options.rotate_speed;
        self.pan_speed = options.pan_speed;
        self.zoom_speed = options.zoom_speed;
        self.min_distance = options.min_distance.max(0.0);
        self.max_distance = options.max_distance.max(self.min_distance);
    }

    /// Current orbit target.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Re-point the orbit target. Takes effect on the next update.
    pub fn set_target(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Whether damping is enabled.
    #[must_use]
    pub fn damping_enabled(&self) -> bool {
        self.enable_damping
    }

    /// Whether any input is still being applied.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.rotate_delta.length_squared() < SETTLE_EPSILON_SQ
            && self.pan_delta.length_squared() < SETTLE_EPSILON_SQ
            && self.scale == 1.0
    }

    /// Queue an orbit by a pointer drag of `delta` pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        let step = ROTATE_RADIANS_PER_PIXEL * self.rotate_speed;
        self.rotate_delta -= delta * step;
    }

    /// Queue a pan by a pointer drag of `delta` pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.pan_delta += delta;
    }

    /// Queue a dolly. Positive `delta` moves toward the target.
    pub fn zoom(&mut self, delta: f32) {
        self.scale *= ZOOM_STEP.powf(delta * self.zoom_speed);
    }

    /// Drop pending input and return the camera to where it started.
    pub fn reset(&mut self, camera: &mut Camera) {
        self.rotate_delta = Vec2::ZERO;
        self.pan_delta = Vec2::ZERO;
        self.scale = 1.0;
        self.target = self.home_target;
        camera.eye = self.home_eye;
        camera.look_at(self.home_target);
    }

    /// Apply pending input to `camera`. Call exactly once per frame, before
    /// the camera is read for rendering. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        let offset = camera.eye - self.target;
        let mut radius = offset.length();
        let (mut theta, mut phi) = if radius > f32::EPSILON {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            radius = self.min_distance.max(f32::EPSILON);
            (0.0, PI / 2.0)
        };

        theta += self.rotate_delta.x * factor;
        phi += self.rotate_delta.y * factor;
        phi = phi.clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);

        let pan = self.pan_world(camera, radius) * factor;
        self.target += pan;

        let sin_phi = phi.sin();
        let new_offset = Vec3::new(
            radius * sin_phi * theta.sin(),
            radius * phi.cos(),
            radius * sin_phi * theta.cos(),
        );
        let new_eye = self.target + new_offset;

        let moved = new_eye.distance_squared(camera.eye) > SETTLE_EPSILON_SQ
            || camera.target != self.target;
        camera.eye = new_eye;
        camera.look_at(self.target);
        camera.up = Vec3::Y;

        if self.enable_damping {
            self.rotate_delta *= 1.0 - factor;
            self.pan_delta *= 1.0 - factor;
            if self.rotate_delta.length_squared() < SETTLE_EPSILON_SQ {
                self.rotate_delta = Vec2::ZERO;
            }
            if self.pan_delta.length_squared() < SETTLE_EPSILON_SQ {
                self.pan_delta = Vec2::ZERO;
            }
        } else {
            self.rotate_delta = Vec2::ZERO;
            self.pan_delta = Vec2::ZERO;
        }
        self.scale = 1.0;

        moved
    }

    /// Convert the pending pixel pan into a world-space offset in the
    /// camera's screen plane.
    fn pan_world(&self, camera: &Camera, distance: f32) -> Vec3 {
        if self.pan_delta == Vec2::ZERO {
            return Vec3::ZERO;
        }
        let forward = camera.forward();
        let right = forward.cross(camera.up).normalize_or_zero();
        let up = right.cross(forward);
        let units = distance * PAN_DISTANCE_PER_PIXEL * self.pan_speed;
        (up * self.pan_delta.y - right * self.pan_delta.x) * units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(damping: bool) -> (Camera, OrbitController) {
        let mut camera = Camera::new(75.0, 1.0, 0.1, 1000.0);
        camera.eye = Vec3::new(0.0, 0.0, 3.0);
        camera.look_at(Vec3::ZERO);
        let options = CameraOptions {
            enable_damping: damping,
            min_distance: 0.5,
            max_distance: 50.0,
            ..CameraOptions::default()
        };
        let controller = OrbitController::new(&camera, &options);
        (camera, controller)
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn undamped_rotation_applies_in_one_update() {
        let (mut camera, mut controller) = setup(false);
        // Quarter turn to the left (azimuth +90 degrees).
        let px = (PI / 2.0) / (ROTATE_RADIANS_PER_PIXEL * controller.rotate_speed);
        controller.rotate(Vec2::new(-px, 0.0));

        assert!(controller.update(&mut camera));
        assert!(close(camera.eye, Vec3::new(3.0, 0.0, 0.0)), "{}", camera.eye);
        assert!(controller.is_settled());
        assert!(!controller.update(&mut camera));
    }

    #[test]
    fn damped_rotation_converges_to_full_delta() {
        let (mut camera, mut controller) = setup(true);
        let px = (PI / 2.0) / (ROTATE_RADIANS_PER_PIXEL * controller.rotate_speed);
        controller.rotate(Vec2::new(-px, 0.0));

        assert!(controller.update(&mut camera));
        // First damped step only covers a fraction of the turn.
        assert!(camera.eye.x < 1.0);
        for _ in 0..1000 {
            let _ = controller.update(&mut camera);
        }
        assert!(controller.is_settled());
        assert!(close(camera.eye, Vec3::new(3.0, 0.0, 0.0)), "{}", camera.eye);
    }

    #[test]
    fn polar_angle_never_flips_over_the_pole() {
        let (mut camera, mut controller) = setup(false);
        controller.rotate(Vec2::new(0.0, 10_000.0));
        let _ = controller.update(&mut camera);
        let offset = camera.eye - controller.target();
        assert!(offset.y > 0.0);
        assert!(offset.x.is_finite() && offset.z.is_finite());
        assert!((offset.length() - 3.0).abs() < 1e-3);
    }

    #[test]
    fn zoom_respects_distance_limits() {
        let (mut camera, mut controller) = setup(false);
        for _ in 0..200 {
            controller.zoom(5.0);
            let _ = controller.update(&mut camera);
        }
        let near = (camera.eye - camera.target).length();
        assert!((near - 0.5).abs() < 1e-4, "{near}");

        for _ in 0..200 {
            controller.zoom(-5.0);
            let _ = controller.update(&mut camera);
        }
        let far = (camera.eye - camera.target).length();
        assert!((far - 50.0).abs() < 1e-3, "{far}");
    }

    #[test]
    fn pan_moves_target_and_eye_together() {
        let (mut camera, mut controller) = setup(false);
        controller.pan(Vec2::new(100.0, 0.0));
        let _ = controller.update(&mut camera);

        // Dragging right slides the view left: target moves toward -X.
        assert!(controller.target().x < 0.0);
        assert_eq!(camera.target, controller.target());
        assert!(close(camera.eye - camera.target, Vec3::new(0.0, 0.0, 3.0)));
    }

    #[test]
    fn set_target_repoints_camera() {
        let (mut camera, mut controller) = setup(true);
        controller.set_target(Vec3::new(0.0, 1.0, 0.0));
        assert!(controller.update(&mut camera));
        assert_eq!(camera.target, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn coincident_eye_and_target_stay_finite() {
        let (mut camera, mut controller) = setup(false);
        camera.eye = Vec3::ZERO;
        controller.rotate(Vec2::new(10.0, 10.0));
        let _ = controller.update(&mut camera);
        assert!(camera.eye.is_finite());
    }

    #[test]
    fn reset_restores_home_view() {
        let (mut camera, mut controller) = setup(false);
        controller.rotate(Vec2::new(50.0, 20.0));
        controller.pan(Vec2::new(10.0, 10.0));
        let _ = controller.update(&mut camera);
        controller.reset(&mut camera);
        assert_eq!(camera.eye, Vec3::new(0.0, 0.0, 3.0));
        assert_eq!(camera.target, Vec3::ZERO);
        assert!(controller.is_settled());
    }
}
