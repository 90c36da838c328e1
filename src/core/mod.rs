//! Core types describing bodies, their mass properties, and constraints.

pub mod constraints;
pub mod rigidbody;
pub mod types;

pub use constraints::{
    Constraint, ConstraintId, ConstraintKind, ContactPoint, DistanceJoint, DistanceLimit,
    FrictionPoint, Jacobian,
};
pub use rigidbody::RigidBody;
pub use types::{MassProperties, Transform2D, Velocity2D};
