//! impulse2d – 2D rigid-body physics core.
//!
//! Oriented boxes collide through a separating-axis narrowphase with edge
//! clipping. Contacts, friction and distance joints share one Jacobian/bias
//! model solved by sequential impulses, and a contact cache keeps contacts
//! alive across steps so their impulses warm start the next solve.
//!
//! The host owns scheduling and rendering: it calls [`PhysicsWorld::step`]
//! at a fixed rate and may plug in a [`debug::DebugDraw`] sink.

pub mod collision;
pub mod config;
pub mod core;
pub mod debug;
pub mod dynamics;
pub mod utils;
pub mod world;

pub use glam::Vec2;

pub use collision::{
    contact::{ContactManifold, ManifoldPoint},
    contact_cache::ContactCache,
    narrowphase::NarrowPhase,
};
pub use config::{ConfigError, WorldSettings};
pub use crate::core::{
    constraints::{Constraint, ConstraintId, ConstraintKind, DistanceLimit},
    rigidbody::RigidBody,
    types::{MassProperties, Transform2D, Velocity2D},
};
pub use debug::{DebugDraw, LineColor, LineRecorder};
pub use dynamics::solver::{ConstraintSolver, SolverStepMetrics};
pub use utils::allocator::{Arena, EntityId, GenerationalId};
pub use world::PhysicsWorld;
