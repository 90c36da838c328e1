use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::utils::math::{safe_divide, Vec2Ext};

/// World position and rotation angle (radians, counter-clockwise) of a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    pub position: Vec2,
    pub rotation: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self {
            position: Vec2::ZERO,
            rotation: 0.0,
        }
    }
}

impl Transform2D {
    pub fn new(position: Vec2, rotation: f32) -> Self {
        Self { position, rotation }
    }

    /// Unit local X axis in world orientation.
    #[inline]
    pub fn right(&self) -> Vec2 {
        let (sin, cos) = self.rotation.sin_cos();
        Vec2::new(cos, sin)
    }

    /// Unit local Y axis in world orientation.
    #[inline]
    pub fn up(&self) -> Vec2 {
        let (sin, cos) = self.rotation.sin_cos();
        Vec2::new(-sin, cos)
    }

    /// Rotates then translates an unscaled local point into world space.
    #[inline]
    pub fn apply(&self, local: Vec2) -> Vec2 {
        local.rotated_by(self.rotation) + self.position
    }

    /// Inverse of [`Transform2D::apply`].
    #[inline]
    pub fn apply_inverse(&self, world: Vec2) -> Vec2 {
        (world - self.position).rotated_by(-self.rotation)
    }
}

/// Linear and angular velocity of a body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocity2D {
    pub linear: Vec2,
    pub angular: f32,
}

impl Default for Velocity2D {
    fn default() -> Self {
        Self {
            linear: Vec2::ZERO,
            angular: 0.0,
        }
    }
}

/// Inverse mass and inverse moment of inertia. Zero means infinite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    pub inverse_mass: f32,
    pub inverse_inertia: f32,
}

impl Default for MassProperties {
    fn default() -> Self {
        Self::from_box(Vec2::splat(0.5), 1.0)
    }
}

impl MassProperties {
    /// Solid rectangle with the given half extents and areal density.
    /// Density `0` yields an immobile body.
    pub fn from_box(half_extents: Vec2, density: f32) -> Self {
        let width = half_extents.x * 2.0;
        let height = half_extents.y * 2.0;
        let mass = width * height * density;
        let inertia = mass * (width * width + height * height) / 12.0;
        Self {
            inverse_mass: safe_divide(1.0, mass),
            inverse_inertia: safe_divide(1.0, inertia),
        }
    }

    /// Infinite mass and inertia.
    pub const fn immobile() -> Self {
        Self {
            inverse_mass: 0.0,
            inverse_inertia: 0.0,
        }
    }

    pub fn is_mobile(&self) -> bool {
        self.inverse_mass != 0.0 || self.inverse_inertia != 0.0
    }
}
