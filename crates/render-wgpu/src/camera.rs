use glam::{Mat4, Vec3};
use meadow_scene::CameraPlacement;
use std::f32::consts::{PI, TAU};

/// Keeps the camera off the poles, where look-at with +Y up degenerates.
const POLAR_EPSILON: f32 = 0.01;

/// Orbit camera circling a target point.
///
/// Position is spherical around `target`: `azimuth` turns about +Y (zero looks
/// from +Z), `polar` is the angle down from +Y.
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub azimuth: f32,
    pub polar: f32,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub sensitivity: f32,
    /// Target motion per pixel of pan, as a fraction of `distance`.
    pub pan_speed: f32,
    pub zoom_step: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub auto_rotate: bool,
    /// Radians per second while auto-rotating.
    pub auto_rotate_speed: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_placement(&CameraPlacement::default())
    }
}

impl OrbitCamera {
    /// Orbit camera positioned at `eye`, looking at `target`.
    pub fn from_eye(eye: Vec3, target: Vec3, fov_degrees: f32) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(f32::EPSILON);
        let polar = (offset.y / distance)
            .clamp(-1.0, 1.0)
            .acos()
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        let azimuth = offset.x.atan2(offset.z);
        Self {
            target,
            distance,
            azimuth,
            polar,
            fov: fov_degrees.to_radians(),
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
            sensitivity: 0.005,
            pan_speed: 0.002,
            zoom_step: 0.95,
            min_distance: 1.0,
            max_distance: 100.0,
            auto_rotate: false,
            // One full turn every 30 seconds.
            auto_rotate_speed: TAU / 30.0,
        }
    }

    pub fn from_placement(placement: &CameraPlacement) -> Self {
        Self::from_eye(placement.eye, placement.target, placement.fov_degrees)
    }

    pub fn position(&self) -> Vec3 {
        let (sp, cp) = self.polar.sin_cos();
        let (sa, ca) = self.azimuth.sin_cos();
        self.target + Vec3::new(sp * sa, cp, sp * ca) * self.distance
    }

    /// Orbit by a mouse delta in pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.azimuth = (self.azimuth - dx * self.sensitivity).rem_euclid(TAU);
        self.polar =
            (self.polar - dy * self.sensitivity).clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
    }

    /// Slide the target (and the eye with it) by a mouse delta in pixels.
    /// Dragging right or down moves the scene with the cursor.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let forward = (self.target - self.position()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        let scale = self.distance * self.pan_speed;
        self.target += (up * dy - right * dx) * scale;
    }

    /// Zoom by scroll lines; positive moves closer.
    pub fn zoom(&mut self, lines: f32) {
        self.distance = (self.distance * self.zoom_step.powf(lines))
            .clamp(self.min_distance, self.max_distance);
    }

    /// Per-frame update; only auto-rotation depends on time.
    pub fn update(&mut self, dt: f32) {
        if self.auto_rotate {
            self.azimuth = (self.azimuth + self.auto_rotate_speed * dt).rem_euclid(TAU);
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
