use crate::config::{
    is_non_negative, ConfigError, DEFAULT_BAUMGARTE_TERM, DEFAULT_FRICTION, DEFAULT_SLOP,
};
use crate::utils::allocator::EntityId;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Handle of a constraint stored in the world's constraint arena.
pub type ConstraintId = EntityId;

/// Rate of change of a scalar constraint with respect to each body's
/// linear and angular velocity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Jacobian {
    pub linear_a: Vec2,
    pub angular_a: f32,
    pub linear_b: Vec2,
    pub angular_b: f32,
}

impl Jacobian {
    pub fn new(linear_a: Vec2, angular_a: f32, linear_b: Vec2, angular_b: f32) -> Self {
        Self {
            linear_a,
            angular_a,
            linear_b,
            angular_b,
        }
    }

    /// Sum of the four element-wise products with `other`.
    #[inline]
    pub fn dot(&self, other: &Jacobian) -> f32 {
        self.linear_a.dot(other.linear_a)
            + self.angular_a * other.angular_a
            + self.linear_b.dot(other.linear_b)
            + self.angular_b * other.angular_b
    }
}

/// How a distance joint clamps its accumulated impulse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum DistanceLimit {
    /// Equality joint, unbounded impulse.
    #[default]
    Rigid,
    /// Slack until stretched past the target distance, then only pulls.
    Rope,
    /// Equality joint whose accumulated impulse magnitude is capped.
    MaxImpulse(f32),
}

impl DistanceLimit {
    /// Clamp range for the accumulated impulse.
    pub fn bounds(self) -> (f32, f32) {
        match self {
            DistanceLimit::Rigid => (f32::MIN, f32::MAX),
            DistanceLimit::Rope => (f32::MIN, 0.0),
            DistanceLimit::MaxImpulse(cap) => (-cap.abs(), cap.abs()),
        }
    }
}

/// Two body-local anchors held at a target distance.
///
/// Anchors are in model space, i.e. half-extent units (see
/// [`crate::core::rigidbody::RigidBody::model_to_world`]).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DistanceJoint {
    pub model_anchor_a: Vec2,
    pub model_anchor_b: Vec2,
    pub distance: f32,
    pub limit: DistanceLimit,
}

/// World contact point pushing bodies apart along `normal`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactPoint {
    pub point: Vec2,
    /// Points from body A (reference) toward body B (incident).
    pub normal: Vec2,
    pub penetration: f32,
}

/// Tangential friction at a contact, bounded by its paired contact constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrictionPoint {
    pub point: Vec2,
    pub normal: Vec2,
    pub contact: ConstraintId,
    pub coefficient: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ConstraintKind {
    Distance(DistanceJoint),
    Contact(ContactPoint),
    Friction(FrictionPoint),
}

/// One scalar velocity constraint between two bodies.
///
/// The shared setup/solve driver lives in [`crate::dynamics::solver`]; the
/// variant only decides the Jacobian, bias, bounds and enforcement gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub body_a: EntityId,
    pub body_b: EntityId,
    pub kind: ConstraintKind,
    pub jacobian: Jacobian,
    /// Jacobian scaled by each body's inverse mass and inverse inertia.
    pub mass_jacobian: Jacobian,
    pub constraint_mass: f32,
    pub lambda_sum: f32,
    pub lower_bound: f32,
    pub upper_bound: f32,
    pub bias: f32,
    pub slop: f32,
    pub baumgarte_term: f32,
    /// Host switch. `should_enforce` is derived from it at every setup.
    pub enabled: bool,
    pub should_enforce: bool,
    pub should_remove: bool,
}

impl Constraint {
    fn with_kind(body_a: EntityId, body_b: EntityId, kind: ConstraintKind) -> Self {
        Self {
            body_a,
            body_b,
            kind,
            jacobian: Jacobian::default(),
            mass_jacobian: Jacobian::default(),
            constraint_mass: 0.0,
            lambda_sum: 0.0,
            lower_bound: f32::MIN,
            upper_bound: f32::MAX,
            bias: 0.0,
            slop: DEFAULT_SLOP,
            baumgarte_term: DEFAULT_BAUMGARTE_TERM,
            enabled: true,
            should_enforce: true,
            should_remove: false,
        }
    }

    /// Rigid distance joint between two model-space anchors.
    pub fn distance(
        body_a: EntityId,
        body_b: EntityId,
        model_anchor_a: Vec2,
        model_anchor_b: Vec2,
        distance: f32,
    ) -> Self {
        Self::with_kind(
            body_a,
            body_b,
            ConstraintKind::Distance(DistanceJoint {
                model_anchor_a,
                model_anchor_b,
                distance,
                limit: DistanceLimit::Rigid,
            }),
        )
    }

    /// Non-penetration constraint. `body_a` owns the normal.
    pub fn contact(
        body_a: EntityId,
        body_b: EntityId,
        point: Vec2,
        normal: Vec2,
        penetration: f32,
    ) -> Self {
        let mut constraint = Self::with_kind(
            body_a,
            body_b,
            ConstraintKind::Contact(ContactPoint {
                point,
                normal,
                penetration,
            }),
        );
        constraint.lower_bound = 0.0;
        constraint
    }

    /// Friction paired with the contact constraint `contact`.
    /// Bounds are recomputed from that constraint on every solve.
    pub fn friction(
        body_a: EntityId,
        body_b: EntityId,
        point: Vec2,
        normal: Vec2,
        contact: ConstraintId,
    ) -> Self {
        let mut constraint = Self::with_kind(
            body_a,
            body_b,
            ConstraintKind::Friction(FrictionPoint {
                point,
                normal,
                contact,
                coefficient: DEFAULT_FRICTION,
            }),
        );
        constraint.lower_bound = 0.0;
        constraint.upper_bound = 0.0;
        constraint
    }

    pub fn with_slop(mut self, slop: f32) -> Self {
        self.slop = slop;
        self
    }

    pub fn with_baumgarte_term(mut self, baumgarte_term: f32) -> Self {
        self.baumgarte_term = baumgarte_term;
        self
    }

    /// Sets the distance limit; ignored by other variants.
    pub fn with_limit(mut self, limit: DistanceLimit) -> Self {
        if let ConstraintKind::Distance(joint) = &mut self.kind {
            joint.limit = limit;
            (self.lower_bound, self.upper_bound) = limit.bounds();
        }
        self
    }

    /// Sets the friction coefficient; ignored by other variants.
    pub fn with_friction(mut self, coefficient: f32) -> Self {
        if let ConstraintKind::Friction(friction) = &mut self.kind {
            friction.coefficient = coefficient;
        }
        self
    }

    /// Rejects tunables that would invert the dead zone or the clamp range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !is_non_negative(self.slop) {
            return Err(ConfigError::Slop(self.slop));
        }
        if !is_non_negative(self.baumgarte_term) {
            return Err(ConfigError::BaumgarteTerm(self.baumgarte_term));
        }
        match self.kind {
            ConstraintKind::Distance(joint) => {
                if !is_non_negative(joint.distance) {
                    return Err(ConfigError::JointDistance(joint.distance));
                }
                if let DistanceLimit::MaxImpulse(cap) = joint.limit {
                    if !cap.is_finite() {
                        return Err(ConfigError::ImpulseCap(cap));
                    }
                }
            }
            ConstraintKind::Friction(friction) => {
                if !is_non_negative(friction.coefficient) {
                    return Err(ConfigError::Friction(friction.coefficient));
                }
            }
            ConstraintKind::Contact(_) => {}
        }
        Ok(())
    }

    /// Paired contact constraint, for friction constraints.
    pub fn paired_contact(&self) -> Option<ConstraintId> {
        match self.kind {
            ConstraintKind::Friction(friction) => Some(friction.contact),
            _ => None,
        }
    }

    /// World contact point, for contact constraints.
    pub fn contact_point(&self) -> Option<Vec2> {
        match self.kind {
            ConstraintKind::Contact(contact) => Some(contact.point),
            _ => None,
        }
    }

    pub fn is_contact(&self) -> bool {
        matches!(self.kind, ConstraintKind::Contact(_))
    }

    /// Moves a cached contact to this frame's geometry, keeping its accumulated impulse.
    pub fn update_contact(&mut self, point: Vec2, normal: Vec2, penetration: f32) {
        match &mut self.kind {
            ConstraintKind::Contact(contact) => {
                contact.point = point;
                contact.normal = normal;
                contact.penetration = penetration;
            }
            ConstraintKind::Friction(friction) => {
                friction.point = point;
                friction.normal = normal;
            }
            ConstraintKind::Distance(_) => {}
        }
    }

    pub fn involves(&self, body: EntityId) -> bool {
        self.body_a == body || self.body_b == body
    }
}
