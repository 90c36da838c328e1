use glam::Vec2;

use crate::utils::allocator::EntityId;

/// One clipped contact point and how deep it sits below the reference face.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ManifoldPoint {
    pub point: Vec2,
    pub penetration: f32,
}

/// Result of one narrowphase query between two bodies.
///
/// `normal` belongs to the reference body and points away from it, toward
/// the incident body. Not persisted across steps; the contact cache decides
/// which constraints survive.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactManifold {
    pub points: Vec<ManifoldPoint>,
    pub normal: Vec2,
    pub reference: EntityId,
    pub incident: EntityId,
}

impl ContactManifold {
    /// Describes the same contact from the other body's side: normal negated,
    /// reference and incident swapped.
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        std::mem::swap(&mut self.reference, &mut self.incident);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
