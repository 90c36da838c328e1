//! Additional math helpers layered on top of `glam`.

use glam::Vec2;

/// Denominators with a magnitude below this are treated as zero by [`safe_divide`].
pub const SAFE_DIVIDE_EPSILON: f32 = 1e-5;

/// Divides `num` by `denom`, returning `0.0` instead of infinity/NaN when the
/// denominator is effectively zero.
///
/// This is the single division rule used by normalization, inverse mass and
/// constraint mass computations.
#[inline]
pub fn safe_divide(num: f32, denom: f32) -> f32 {
    if denom.abs() < SAFE_DIVIDE_EPSILON {
        0.0
    } else {
        num / denom
    }
}

/// 2D operations missing from [`glam::Vec2`] or needing the safe-division rule.
pub trait Vec2Ext {
    /// Scalar 2D cross product (`x1*y2 - y1*x2`).
    fn cross(self, rhs: Vec2) -> f32;
    /// Component-wise product.
    fn mul_vec(self, rhs: Vec2) -> Vec2;
    /// Component-wise reciprocal, zero where a component is effectively zero.
    fn recip_safe(self) -> Vec2;
    /// Length of the projection onto `onto`, in units of `onto`.
    fn proj_scalar(self, onto: Vec2) -> f32;
    /// Projection onto `onto`; zero when `onto` is degenerate.
    fn proj(self, onto: Vec2) -> Vec2;
    /// Rotates counter-clockwise by `rad` radians.
    fn rotated_by(self, rad: f32) -> Vec2;
    /// Squared distance to `other`.
    fn dist2(self, other: Vec2) -> f32;
    /// Normalizes in place and returns the length before normalization.
    /// A zero-length vector stays zero.
    fn normalize_in_place(&mut self) -> f32;
}

impl Vec2Ext for Vec2 {
    #[inline]
    fn cross(self, rhs: Vec2) -> f32 {
        self.x * rhs.y - self.y * rhs.x
    }

    #[inline]
    fn mul_vec(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x * rhs.x, self.y * rhs.y)
    }

    #[inline]
    fn recip_safe(self) -> Vec2 {
        Vec2::new(safe_divide(1.0, self.x), safe_divide(1.0, self.y))
    }

    #[inline]
    fn proj_scalar(self, onto: Vec2) -> f32 {
        safe_divide(self.dot(onto), onto.dot(onto))
    }

    #[inline]
    fn proj(self, onto: Vec2) -> Vec2 {
        onto * self.proj_scalar(onto)
    }

    #[inline]
    fn rotated_by(self, rad: f32) -> Vec2 {
        let (sin, cos) = rad.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    #[inline]
    fn dist2(self, other: Vec2) -> f32 {
        let to = other - self;
        to.dot(to)
    }

    fn normalize_in_place(&mut self) -> f32 {
        let len = self.dot(*self).sqrt();
        self.x = safe_divide(self.x, len);
        self.y = safe_divide(self.y, len);
        len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn safe_divide_zeroes_tiny_denominators() {
        assert_eq!(safe_divide(1.0, 0.0), 0.0);
        assert_eq!(safe_divide(1.0, 5e-6), 0.0);
        assert_eq!(safe_divide(1.0, -5e-6), 0.0);
        assert_relative_eq!(safe_divide(1.0, 4.0), 0.25);
    }

    #[test]
    fn normalize_in_place_returns_previous_length() {
        let mut v = Vec2::new(3.0, 4.0);
        let len = v.normalize_in_place();
        assert_relative_eq!(len, 5.0);
        assert_relative_eq!(v.x, 0.6);
        assert_relative_eq!(v.y, 0.8);

        let mut zero = Vec2::ZERO;
        assert_eq!(zero.normalize_in_place(), 0.0);
        assert_eq!(zero, Vec2::ZERO);
    }

    #[test]
    fn rotation_and_cross_agree_on_handedness() {
        let r = Vec2::X.rotated_by(std::f32::consts::FRAC_PI_2);
        assert_relative_eq!(r.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(r.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(Vec2::X.cross(Vec2::Y), 1.0);
    }

    #[test]
    fn projection_onto_degenerate_axis_is_zero() {
        let v = Vec2::new(2.0, 1.0);
        assert_eq!(v.proj(Vec2::ZERO), Vec2::ZERO);
        assert_eq!(v.proj(Vec2::new(0.0, 3.0)), Vec2::new(0.0, 1.0));
        assert_eq!(Vec2::new(2.0, 0.0).recip_safe(), Vec2::new(0.5, 0.0));
        assert_relative_eq!(Vec2::ZERO.dist2(Vec2::new(1.0, 2.0)), 5.0);
    }
}
