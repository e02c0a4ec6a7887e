use crate::foundation::core::{BoundingSphere, Mat4, Vec3};
use crate::scene::model::Model;

/// Vertical field of view used by the studio camera, in degrees.
pub const DEFAULT_FOV_Y_DEG: f32 = 45.0;

/// Direction the viewer camera takes when framing a freshly loaded model.
const FRAMING_DIRECTION: Vec3 = Vec3::new(0.6, 0.4, 0.9);

/// A right-handed perspective camera.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// Eye position.
    pub position: Vec3,
    /// Look-at point.
    pub target: Vec3,
    /// Up vector.
    pub up: Vec3,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f32,
    /// Near clip distance.
    pub near: f32,
    /// Far clip distance.
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 1.0, 3.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_deg: DEFAULT_FOV_Y_DEG,
            near: 0.01,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// World-to-view matrix.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// View-to-clip matrix for `aspect = width / height`; depth maps to `[0, 1]`.
    pub fn projection(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), aspect, self.near, self.far)
    }

    /// `projection * view`.
    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection(aspect) * self.view()
    }
}

/// Camera distances derived once per loaded model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitData {
    /// World-space bounding sphere.
    pub sphere: BoundingSphere,
    /// Distance at which the sphere fills the vertical field of view.
    pub fit_distance: f32,
}

impl FitData {
    /// `fit_distance = radius / sin(fov / 2)`.
    pub fn new(sphere: BoundingSphere, fov_y_deg: f32) -> Self {
        let half = (fov_y_deg.to_radians() * 0.5).sin().max(1e-6);
        Self {
            sphere,
            fit_distance: sphere.radius / half,
        }
    }

    /// Fit data for `model`, or `None` when it has no vertices.
    pub fn from_model(model: &Model, fov_y_deg: f32) -> Option<Self> {
        model
            .bounding_sphere()
            .map(|sphere| Self::new(sphere, fov_y_deg))
    }

    /// Aim `camera` at the model from the default viewing angle, with clip planes scaled to
    /// the model size.
    pub fn frame(&self, camera: &mut Camera) {
        let r = self.sphere.radius;
        camera.target = self.sphere.center;
        camera.position =
            self.sphere.center + FRAMING_DIRECTION * (self.fit_distance * 1.1);
        camera.up = Vec3::Y;
        camera.near = (r / 100.0).max(0.01);
        camera.far = r * 50.0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/camera.rs"]
mod tests;
