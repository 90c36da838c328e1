use glam::Vec2;
use log::warn;

use crate::{
    collision::{
        clipping::clip_edge_to_edge,
        contact::{ContactManifold, ManifoldPoint},
    },
    core::rigidbody::RigidBody,
};

/// Separating axis test between two oriented boxes, followed by edge
/// clipping to build a contact manifold.
pub struct NarrowPhase;

impl NarrowPhase {
    /// Number of candidate axes: both signs of each body's two local axes.
    pub const AXIS_COUNT: usize = 8;

    /// Returns the contact manifold for two overlapping bodies, or `None` when
    /// they are separated or neither can move.
    pub fn manifold(body_a: &RigidBody, body_b: &RigidBody) -> Option<ContactManifold> {
        if !body_a.is_mobile() && !body_b.is_mobile() {
            return None;
        }

        let axes = Self::candidate_axes(body_a, body_b);
        let (best_axis, _) = Self::min_penetration_axis(&axes, body_a, body_b)?;

        // The owner of the best axis is the reference body.
        let (reference, incident, normal) = if best_axis < Self::AXIS_COUNT / 2 {
            (body_a, body_b, axes[best_axis])
        } else {
            (body_b, body_a, -axes[best_axis])
        };

        let incident_edge = Self::box_edge(-normal, incident);
        let reference_edge = Self::box_edge(normal, reference);

        let Some(clipped) = clip_edge_to_edge(incident_edge, reference_edge, normal) else {
            warn!(
                "edge clipping failed after SAT overlap between {:?} and {:?}; dropping manifold",
                reference.id, incident.id
            );
            return None;
        };

        let reference_depth = reference_edge[0].dot(normal);
        let points = clipped
            .into_iter()
            .map(|point| ManifoldPoint {
                point,
                penetration: reference_depth - point.dot(normal),
            })
            .collect();

        Some(ContactManifold {
            points,
            normal,
            reference: reference.id,
            incident: incident.id,
        })
    }

    /// `±right(A), ±up(A), ±right(B), ±up(B)`, unit length.
    pub fn candidate_axes(body_a: &RigidBody, body_b: &RigidBody) -> [Vec2; Self::AXIS_COUNT] {
        let ar = body_a.right();
        let au = body_a.up();
        let br = body_b.right();
        let bu = body_b.up();
        [ar, -ar, au, -au, br, -br, bu, -bu]
    }

    /// Index and depth of the axis with the least penetration, or `None` on
    /// the first separating axis. Ties keep the lowest index.
    pub fn min_penetration_axis(
        axes: &[Vec2],
        body_a: &RigidBody,
        body_b: &RigidBody,
    ) -> Option<(usize, f32)> {
        let mut best_axis = 0;
        let mut least_penetration = f32::MAX;

        for (index, &axis) in axes.iter().enumerate() {
            let support_a = Self::box_support(axis, body_a);
            let support_b = Self::box_support(-axis, body_b);
            let penetration = support_a.dot(axis) - support_b.dot(axis);
            if penetration < 0.0 {
                return None;
            }
            if penetration < least_penetration {
                least_penetration = penetration;
                best_axis = index;
            }
        }

        Some((best_axis, least_penetration))
    }

    /// Corner of the box furthest along `direction`.
    pub fn box_support(direction: Vec2, body: &RigidBody) -> Vec2 {
        body.position()
            + Self::line_support(direction, body.scaled_right())
            + Self::line_support(direction, body.scaled_up())
    }

    fn line_support(direction: Vec2, line: Vec2) -> Vec2 {
        if direction.dot(line) > 0.0 {
            line
        } else {
            -line
        }
    }

    /// The two corners forming the face most facing `direction`.
    pub fn box_edge(direction: Vec2, body: &RigidBody) -> [Vec2; 2] {
        let pos = body.position();
        let r = body.scaled_right();
        let u = body.scaled_up();
        let rd = r.dot(direction);
        let ud = u.dot(direction);

        if rd.abs() > ud.abs() {
            let face = if rd > 0.0 { pos + r } else { pos - r };
            [face + u, face - u]
        } else {
            let face = if ud > 0.0 { pos + u } else { pos - u };
            [face + r, face - r]
        }
    }
}
