//! Collision detection: SAT narrowphase, edge clipping, manifolds and the contact cache.

pub mod clipping;
pub mod contact;
pub mod contact_cache;
pub mod narrowphase;

pub use contact::{ContactManifold, ManifoldPoint};
pub use contact_cache::{ContactCache, PairKey};
pub use narrowphase::NarrowPhase;
