use glam::Vec2;

use crate::{core::rigidbody::RigidBody, utils::allocator::Arena};

/// Symplectic Euler integration split around the solver: velocities before
/// collision and solving, positions after.
///
/// Linear terms only touch bodies with finite mass, angular terms only bodies
/// with finite inertia, so a pivot (infinite mass, finite inertia) spins in place.
#[derive(Debug, Clone, Copy, Default)]
pub struct Integrator;

impl Integrator {
    pub fn integrate_velocity(body: &mut RigidBody, gravity: Vec2, dt: f32) {
        if body.inverse_mass != 0.0 {
            body.velocity.linear += gravity * body.gravity_scale * dt;
        }
    }

    /// Moves the body, then damps its velocity multiplicatively.
    pub fn integrate_position(body: &mut RigidBody, dt: f32) {
        if body.inverse_mass != 0.0 {
            body.transform.position += body.velocity.linear * dt;
            body.velocity.linear *= body.linear_damping;
        }
        if body.inverse_inertia != 0.0 {
            body.transform.rotation += body.velocity.angular * dt;
            body.velocity.angular *= body.angular_damping;
        }
    }

    pub fn integrate_velocities(bodies: &mut Arena<RigidBody>, gravity: Vec2, dt: f32) {
        for body in bodies.iter_mut() {
            Self::integrate_velocity(body, gravity, dt);
        }
    }

    pub fn integrate_positions(bodies: &mut Arena<RigidBody>, dt: f32) {
        for body in bodies.iter_mut() {
            Self::integrate_position(body, dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn gravity_only_changes_vertical_velocity() {
        let mut body = RigidBody::new_box(Vec2::new(1.0, 5.0), Vec2::ONE, 1.0);
        let dt = 1.0 / 30.0;
        Integrator::integrate_velocity(&mut body, Vec2::new(0.0, -9.81), dt);

        assert_relative_eq!(body.velocity.linear.y, -9.81 * dt);
        assert_eq!(body.velocity.linear.x, 0.0);
        assert_eq!(body.transform.position, Vec2::new(1.0, 5.0));
    }

    #[test]
    fn immobile_body_ignores_gravity_and_velocity() {
        let mut ground = RigidBody::fixed(Vec2::ZERO, Vec2::new(10.0, 1.0));
        ground.velocity.linear = Vec2::new(3.0, 0.0);
        Integrator::integrate_velocity(&mut ground, Vec2::new(0.0, -9.81), 0.1);
        Integrator::integrate_position(&mut ground, 0.1);

        assert_eq!(ground.velocity.linear, Vec2::new(3.0, 0.0));
        assert_eq!(ground.transform.position, Vec2::ZERO);
    }

    #[test]
    fn pivot_spins_without_translating() {
        let mut pivot = RigidBody::new_box(Vec2::ZERO, Vec2::ONE, 1.0);
        pivot.inverse_mass = 0.0;
        pivot.set_velocity(Vec2::new(1.0, 0.0), 2.0);

        Integrator::integrate_velocity(&mut pivot, Vec2::new(0.0, -9.81), 0.5);
        Integrator::integrate_position(&mut pivot, 0.5);

        assert_eq!(pivot.transform.position, Vec2::ZERO);
        assert_relative_eq!(pivot.transform.rotation, 1.0);
        assert_relative_eq!(pivot.velocity.angular, 2.0 * pivot.angular_damping);
    }

    #[test]
    fn damping_applies_after_moving() {
        let mut body = RigidBody::new_box(Vec2::ZERO, Vec2::ONE, 1.0);
        body.set_velocity(Vec2::new(2.0, 0.0), 0.0);
        Integrator::integrate_position(&mut body, 0.5);

        assert_relative_eq!(body.transform.position.x, 1.0);
        assert_relative_eq!(body.velocity.linear.x, 2.0 * body.linear_damping);
    }
}
