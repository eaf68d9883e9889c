//! Orbit camera and screen-to-world pick rays

use crate::config::CameraConfig;
use kneeplan_core::{Matrix4, Point3f, Ray, Result, Vector3f};
use nalgebra::Perspective3;
use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

const BETA_LIMIT: f32 = 1e-3;

/// A camera orbiting `target` at `radius`, placed by two angles.
///
/// `alpha` is the longitudinal angle in the XZ plane and `beta` the
/// latitudinal angle from +Y. The default looks along +Z from 950 units away.
#[derive(Debug, Clone, PartialEq)]
pub struct ArcRotateCamera {
    pub alpha: f32,
    pub beta: f32,
    pub radius: f32,
    pub target: Point3f,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl ArcRotateCamera {
    pub fn new(alpha: f32, beta: f32, radius: f32, target: Point3f) -> Self {
        Self {
            alpha,
            beta: beta.clamp(BETA_LIMIT, PI - BETA_LIMIT),
            radius,
            target,
            fov: FRAC_PI_4,
            aspect_ratio: 16.0 / 9.0,
            near: 1.0,
            far: 10_000.0,
        }
    }

    /// Default orbit with radius and field of view taken from configuration
    pub fn from_config(config: &CameraConfig) -> Self {
        let mut camera = Self::default();
        camera.radius = config.radius;
        camera.fov = config.fov.to_radians();
        camera
    }

    /// World position of the camera
    pub fn position(&self) -> Point3f {
        let offset = Vector3f::new(
            self.alpha.cos() * self.beta.sin(),
            self.beta.cos(),
            self.alpha.sin() * self.beta.sin(),
        );
        self.target + offset * self.radius
    }

    /// Unit vector from the camera toward its target
    pub fn forward(&self) -> Vector3f {
        (self.target - self.position())
            .try_normalize(1e-6)
            .unwrap_or_else(|| -Vector3f::z())
    }

    /// Unit screen-right vector in world space
    pub fn right(&self) -> Vector3f {
        self.forward()
            .cross(&Vector3f::y())
            .try_normalize(1e-6)
            .unwrap_or_else(Vector3f::x)
    }

    /// Unit screen-up vector in world space
    pub fn up(&self) -> Vector3f {
        self.right().cross(&self.forward())
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position(), &self.target, &self.up())
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        perspective.into_inner()
    }

    /// Look at `target` from the default front view
    pub fn frame(&mut self, target: Point3f) {
        self.target = target;
        self.alpha = -FRAC_PI_2;
        self.beta = FRAC_PI_2;
    }

    /// Rotate around the target
    pub fn orbit(&mut self, d_alpha: f32, d_beta: f32) {
        self.alpha += d_alpha;
        self.beta = (self.beta + d_beta).clamp(BETA_LIMIT, PI - BETA_LIMIT);
    }

    /// Move toward (positive) or away from the target, never closer than `near`
    pub fn zoom(&mut self, delta: f32) {
        self.radius = (self.radius - delta).max(self.near);
    }

    /// World-space ray through a pixel of a `width` x `height` viewport.
    /// Pixel (0, 0) is the top-left corner. The horizontal extent follows the
    /// viewport's own aspect, not `aspect_ratio`.
    pub fn screen_ray(&self, x: f32, y: f32, width: f32, height: f32) -> Result<Ray> {
        let ndc_x = (x - width * 0.5) / (width * 0.5);
        let ndc_y = -(y - height * 0.5) / (height * 0.5);
        let fov_factor = (self.fov * 0.5).tan();

        let direction = self.forward()
            + self.right() * (ndc_x * (width / height) * fov_factor)
            + self.up() * (ndc_y * fov_factor);

        Ray::new(self.position(), direction)
    }

    /// Pixel a world point lands on, inverse of [`screen_ray`](Self::screen_ray).
    /// `None` for points at or behind the camera.
    pub fn world_to_screen(&self, point: &Point3f, width: f32, height: f32) -> Option<(f32, f32)> {
        let offset = point - self.position();
        let depth = offset.dot(&self.forward());
        if depth <= f32::EPSILON {
            return None;
        }

        let fov_factor = (self.fov * 0.5).tan();
        let ndc_x = offset.dot(&self.right()) / (depth * fov_factor * (width / height));
        let ndc_y = offset.dot(&self.up()) / (depth * fov_factor);
        Some(((ndc_x + 1.0) * 0.5 * width, (1.0 - ndc_y) * 0.5 * height))
    }
}

impl Default for ArcRotateCamera {
    fn default() -> Self {
        Self::new(-FRAC_PI_2, FRAC_PI_2, 950.0, Point3f::origin())
    }
}
