use glam::Vec2;

/// Symmetric Coulomb bounds for a friction impulse, given the paired
/// contact's accumulated normal impulse.
#[inline]
pub fn coulomb_bounds(normal_impulse: f32, coefficient: f32) -> (f32, f32) {
    let limit = normal_impulse * coefficient;
    (-limit, limit)
}

/// Contact tangent: the normal rotated a quarter turn counter-clockwise.
#[inline]
pub fn contact_tangent(normal: Vec2) -> Vec2 {
    Vec2::new(-normal.y, normal.x)
}
