use glam::Vec2;

use crate::utils::math::safe_divide;

/// Half-plane `normal · p <= offset`. Points beyond it are outside.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlane {
    normal: Vec2,
    offset: f32,
}

impl ClipPlane {
    pub fn from_point_normal(point: Vec2, normal: Vec2) -> Self {
        Self {
            normal,
            offset: normal.dot(point),
        }
    }

    #[inline]
    pub fn signed_distance(&self, point: Vec2) -> f32 {
        self.normal.dot(point) - self.offset
    }
}

/// What to do with the outside endpoint of a straddling segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipMode {
    /// Replace it with the intersection point on the plane.
    Intersect,
    /// Drop it and keep only the inside endpoint.
    Discard,
}

/// One Sutherland–Hodgman pass over a segment. Returns `None` when both
/// endpoints are outside.
pub fn clip_segment(segment: &[Vec2], plane: ClipPlane, mode: ClipMode) -> Option<Vec<Vec2>> {
    match *segment {
        [] => None,
        [point] => (plane.signed_distance(point) <= 0.0).then(|| vec![point]),
        [start, end, ..] => {
            let start_dist = plane.signed_distance(start);
            let end_dist = plane.signed_distance(end);
            let start_outside = start_dist > 0.0;
            let end_outside = end_dist > 0.0;

            match (start_outside, end_outside) {
                (true, true) => None,
                (false, false) => Some(vec![start, end]),
                (true, false) => Some(match mode {
                    ClipMode::Intersect => {
                        vec![intersect(start, end, start_dist, end_dist), end]
                    }
                    ClipMode::Discard => vec![end],
                }),
                (false, true) => Some(match mode {
                    ClipMode::Intersect => {
                        vec![start, intersect(start, end, start_dist, end_dist)]
                    }
                    ClipMode::Discard => vec![start],
                }),
            }
        }
    }
}

fn intersect(start: Vec2, end: Vec2, start_dist: f32, end_dist: f32) -> Vec2 {
    start + (end - start) * safe_divide(-start_dist, end_dist - start_dist)
}

/// Clips the incident edge to the slab spanned by the reference edge, then
/// to the reference face itself.
///
/// The face pass discards points in front of the face rather than moving
/// them onto it, so every surviving point is penetrating.
pub fn clip_edge_to_edge(
    incident: [Vec2; 2],
    reference: [Vec2; 2],
    reference_normal: Vec2,
) -> Option<Vec<Vec2>> {
    let side = reference[0] - reference[1];
    let passes = [
        (ClipPlane::from_point_normal(reference[0], side), ClipMode::Intersect),
        (ClipPlane::from_point_normal(reference[1], -side), ClipMode::Intersect),
        (
            ClipPlane::from_point_normal(reference[0], reference_normal),
            ClipMode::Discard,
        ),
    ];

    let mut points = incident.to_vec();
    for (plane, mode) in passes {
        points = clip_segment(&points, plane, mode)?;
    }
    Some(points)
}
