use crate::config::{DEFAULT_ANGULAR_DAMPING, DEFAULT_LINEAR_DAMPING};
use crate::utils::{
    allocator::EntityId,
    math::{safe_divide, Vec2Ext},
};

use super::types::{MassProperties, Transform2D, Velocity2D};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Rectangular rigid body posed by a position and a single rotation angle.
///
/// The rectangle spans `2 * half_extents.x` by `2 * half_extents.y`. Mass and
/// inertia are stored as inverses; both zero means the body never moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RigidBody {
    pub id: EntityId,
    pub transform: Transform2D,
    pub velocity: Velocity2D,
    pub half_extents: Vec2,
    pub density: f32,
    pub inverse_mass: f32,
    pub inverse_inertia: f32,
    pub gravity_scale: f32,
    /// Multiplicative factor applied to linear velocity once per step.
    pub linear_damping: f32,
    /// Multiplicative factor applied to angular velocity once per step.
    pub angular_damping: f32,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new_box(Vec2::ZERO, Vec2::splat(0.5), 1.0)
    }
}

impl RigidBody {
    pub fn new_box(position: Vec2, half_extents: Vec2, density: f32) -> Self {
        let props = MassProperties::from_box(half_extents, density);
        Self {
            id: EntityId::default(),
            transform: Transform2D::new(position, 0.0),
            velocity: Velocity2D::default(),
            half_extents,
            density,
            inverse_mass: props.inverse_mass,
            inverse_inertia: props.inverse_inertia,
            gravity_scale: 1.0,
            linear_damping: DEFAULT_LINEAR_DAMPING,
            angular_damping: DEFAULT_ANGULAR_DAMPING,
        }
    }

    /// Zero-density box: infinite mass and inertia.
    pub fn fixed(position: Vec2, half_extents: Vec2) -> Self {
        Self::new_box(position, half_extents, 0.0)
    }

    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn with_velocity(mut self, linear: Vec2, angular: f32) -> Self {
        self.set_velocity(linear, angular);
        self
    }

    pub fn set_velocity(&mut self, linear: Vec2, angular: f32) {
        self.velocity.linear = linear;
        self.velocity.angular = angular;
    }

    pub fn set_density(&mut self, density: f32) {
        self.density = density;
        self.set_mass_properties(MassProperties::from_box(self.half_extents, density));
    }

    pub fn set_mass_properties(&mut self, props: MassProperties) {
        self.inverse_mass = props.inverse_mass;
        self.inverse_inertia = props.inverse_inertia;
    }

    pub fn mass_properties(&self) -> MassProperties {
        MassProperties {
            inverse_mass: self.inverse_mass,
            inverse_inertia: self.inverse_inertia,
        }
    }

    /// True when either inverse is nonzero.
    #[inline]
    pub fn is_mobile(&self) -> bool {
        self.inverse_mass != 0.0 || self.inverse_inertia != 0.0
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    #[inline]
    pub fn rotation(&self) -> f32 {
        self.transform.rotation
    }

    /// Local X axis in world orientation, unit length.
    #[inline]
    pub fn right(&self) -> Vec2 {
        self.transform.right()
    }

    /// Local Y axis in world orientation, unit length.
    #[inline]
    pub fn up(&self) -> Vec2 {
        self.transform.up()
    }

    /// Local X axis scaled by the half width.
    #[inline]
    pub fn scaled_right(&self) -> Vec2 {
        self.right() * self.half_extents.x
    }

    /// Local Y axis scaled by the half height.
    #[inline]
    pub fn scaled_up(&self) -> Vec2 {
        self.up() * self.half_extents.y
    }

    /// Maps a model point, in half-extent units (corners at `(±1, ±1)`), to world space.
    pub fn model_to_world(&self, model: Vec2) -> Vec2 {
        self.transform.apply(model.mul_vec(self.half_extents))
    }

    /// Inverse of [`RigidBody::model_to_world`]. Degenerate extents map to zero.
    pub fn world_to_model(&self, world: Vec2) -> Vec2 {
        let local = self.transform.apply_inverse(world);
        Vec2::new(
            safe_divide(local.x, self.half_extents.x),
            safe_divide(local.y, self.half_extents.y),
        )
    }

    /// World-space corners, counter-clockwise from the top right.
    pub fn corners(&self) -> [Vec2; 4] {
        let r = self.scaled_right();
        let u = self.scaled_up();
        let p = self.transform.position;
        [p + r + u, p - r + u, p - r - u, p + r - u]
    }
}
