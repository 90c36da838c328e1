use glam::Vec2;

use crate::{
    config::{DEFAULT_CONVERGENCE_EPSILON, DEFAULT_SOLVER_ITERATIONS},
    core::{
        constraints::{Constraint, ConstraintId, ConstraintKind, DistanceLimit, Jacobian},
        rigidbody::RigidBody,
    },
    debug::{DebugDraw, LineColor},
    dynamics::friction::{contact_tangent, coulomb_bounds},
    utils::{
        allocator::Arena,
        math::{safe_divide, Vec2Ext},
    },
};

impl Constraint {
    /// Baumgarte stabilization with a dead zone: errors inside `±slop` produce
    /// no bias, larger ones are fed back minus the slop.
    pub fn set_bias(&mut self, error: f32) {
        self.bias = if error >= self.slop {
            (error - self.slop) * self.baumgarte_term
        } else if error <= -self.slop {
            (error + self.slop) * self.baumgarte_term
        } else {
            0.0
        };
    }

    fn set_anchored_jacobian(
        &mut self,
        anchor_a: Vec2,
        anchor_b: Vec2,
        axis: Vec2,
        body_a: &RigidBody,
        body_b: &RigidBody,
    ) {
        let linear_b = -axis;
        self.jacobian = Jacobian::new(
            axis,
            (anchor_a - body_a.position()).cross(axis),
            linear_b,
            (anchor_b - body_b.position()).cross(linear_b),
        );
    }

    /// Per-step preparation: Jacobian, bias and gate from the variant, then
    /// the mass-weighted Jacobian, effective mass and warm start.
    pub fn setup<'d>(
        &mut self,
        body_a: &mut RigidBody,
        body_b: &mut RigidBody,
        drawer: Option<&mut (dyn DebugDraw + 'd)>,
    ) {
        let gate = match self.kind {
            ConstraintKind::Distance(joint) => {
                let world_a = body_a.model_to_world(joint.model_anchor_a);
                let world_b = body_b.model_to_world(joint.model_anchor_b);
                let mut axis = world_a - world_b;
                let current = axis.normalize_in_place();
                self.set_anchored_jacobian(world_a, world_b, axis, body_a, body_b);

                if let Some(drawer) = drawer {
                    drawer.set_line_color(LineColor::WHITE);
                    drawer.draw_line(world_a, world_b);
                }

                self.set_bias(joint.distance - current);
                (self.lower_bound, self.upper_bound) = joint.limit.bounds();
                match joint.limit {
                    DistanceLimit::Rope => current > joint.distance,
                    DistanceLimit::Rigid | DistanceLimit::MaxImpulse(_) => true,
                }
            }
            ConstraintKind::Contact(contact) => {
                // Normal points from A to B; pushing apart means acting along -normal on A.
                self.set_anchored_jacobian(
                    contact.point,
                    contact.point,
                    -contact.normal,
                    body_a,
                    body_b,
                );
                self.set_bias(contact.penetration);
                true
            }
            ConstraintKind::Friction(friction) => {
                self.set_anchored_jacobian(
                    friction.point,
                    friction.point,
                    contact_tangent(friction.normal),
                    body_a,
                    body_b,
                );
                true
            }
        };

        self.should_enforce = self.enabled && !self.should_remove && gate;
        if !gate {
            // Slack joints carry no impulse into the next taut step.
            self.lambda_sum = 0.0;
        }

        let j = self.jacobian;
        self.mass_jacobian = Jacobian::new(
            j.linear_a * body_a.inverse_mass,
            j.angular_a * body_a.inverse_inertia,
            j.linear_b * body_b.inverse_mass,
            j.angular_b * body_b.inverse_inertia,
        );
        self.constraint_mass = safe_divide(1.0, j.dot(&self.mass_jacobian));

        if self.should_enforce && self.lambda_sum != 0.0 {
            self.apply_impulse(body_a, body_b, self.lambda_sum);
        }
    }

    /// Re-derives friction bounds from the paired contact's current impulse.
    pub fn refresh_friction_bounds(&mut self, normal_impulse: f32) {
        if let ConstraintKind::Friction(friction) = self.kind {
            let (lower, upper) = coulomb_bounds(normal_impulse, friction.coefficient);
            self.lower_bound = lower;
            self.upper_bound = upper;
        }
    }

    /// One sequential-impulse iteration. Returns the velocity error that the
    /// applied (clamped) impulse corrected, or `0.0` when not enforced.
    pub fn solve(&mut self, body_a: &mut RigidBody, body_b: &mut RigidBody) -> f32 {
        if !self.should_enforce {
            return 0.0;
        }

        let velocities = Jacobian::new(
            body_a.velocity.linear,
            body_a.velocity.angular,
            body_b.velocity.linear,
            body_b.velocity.angular,
        );
        let jv = self.jacobian.dot(&velocities);
        let jvb = jv - self.bias;
        let lambda = -jvb * self.constraint_mass;

        // Clamp the running sum, not the increment.
        let old_sum = self.lambda_sum;
        self.lambda_sum = (self.lambda_sum + lambda)
            .max(self.lower_bound)
            .min(self.upper_bound);
        let applied = self.lambda_sum - old_sum;
        self.apply_impulse(body_a, body_b, applied);

        safe_divide(applied, self.constraint_mass).abs()
    }

    pub fn apply_impulse(&self, body_a: &mut RigidBody, body_b: &mut RigidBody, lambda: f32) {
        let jm = &self.mass_jacobian;
        body_a.velocity.linear += jm.linear_a * lambda;
        body_a.velocity.angular += jm.angular_a * lambda;
        body_b.velocity.linear += jm.linear_b * lambda;
        body_b.velocity.angular += jm.angular_b * lambda;
    }
}

/// Counters from the most recent solve.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct SolverStepMetrics {
    pub constraints_solved: usize,
    pub iterations: u32,
    /// Summed velocity error of the last sweep.
    pub residual: f32,
    pub converged: bool,
    pub removed: usize,
}

/// Gauss–Seidel driver over the active constraint list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstraintSolver {
    pub iterations: u32,
    pub convergence_epsilon: f32,
}

impl Default for ConstraintSolver {
    fn default() -> Self {
        Self::new(DEFAULT_SOLVER_ITERATIONS, DEFAULT_CONVERGENCE_EPSILON)
    }
}

impl ConstraintSolver {
    pub fn new(iterations: u32, convergence_epsilon: f32) -> Self {
        Self {
            iterations,
            convergence_epsilon,
        }
    }

    /// Setup, up to `iterations` sweeps, then purge of removed constraints.
    pub fn solve<'d>(
        &self,
        bodies: &mut Arena<RigidBody>,
        constraints: &mut Arena<Constraint>,
        active: &mut Vec<ConstraintId>,
        drawer: Option<&mut (dyn DebugDraw + 'd)>,
    ) -> SolverStepMetrics {
        let mut metrics = SolverStepMetrics {
            constraints_solved: active.len(),
            ..SolverStepMetrics::default()
        };

        Self::setup(bodies, constraints, active, drawer);

        for _ in 0..self.iterations {
            metrics.iterations += 1;
            metrics.residual = Self::sweep(bodies, constraints, active);
            if metrics.residual < self.convergence_epsilon {
                metrics.converged = true;
                break;
            }
        }

        metrics.removed = Self::purge(constraints, active);
        metrics
    }

    pub fn setup<'d>(
        bodies: &mut Arena<RigidBody>,
        constraints: &mut Arena<Constraint>,
        active: &[ConstraintId],
        mut drawer: Option<&mut (dyn DebugDraw + 'd)>,
    ) {
        for &id in active {
            let Some(constraint) = constraints.get_mut(id) else {
                continue;
            };
            let Some((body_a, body_b)) = bodies.get2_mut(constraint.body_a, constraint.body_b)
            else {
                constraint.should_enforce = false;
                continue;
            };
            constraint.setup(body_a, body_b, drawer.as_deref_mut());
        }
    }

    /// One pass over every active constraint; returns the summed velocity error.
    pub fn sweep(
        bodies: &mut Arena<RigidBody>,
        constraints: &mut Arena<Constraint>,
        active: &[ConstraintId],
    ) -> f32 {
        let mut residual = 0.0;
        for &id in active {
            let normal_impulse = constraints
                .get(id)
                .and_then(Constraint::paired_contact)
                .and_then(|contact| constraints.get(contact))
                .map(|contact| contact.lambda_sum);

            let Some(constraint) = constraints.get_mut(id) else {
                continue;
            };
            if let Some(normal_impulse) = normal_impulse {
                constraint.refresh_friction_bounds(normal_impulse);
            }
            let Some((body_a, body_b)) = bodies.get2_mut(constraint.body_a, constraint.body_b)
            else {
                continue;
            };
            residual += constraint.solve(body_a, body_b);
        }
        residual
    }

    /// Swap-removes constraints flagged for removal, and handles whose
    /// constraint no longer exists. Order is not preserved.
    pub fn purge(constraints: &mut Arena<Constraint>, active: &mut Vec<ConstraintId>) -> usize {
        let mut removed = 0;
        let mut index = 0;
        while index < active.len() {
            let id = active[index];
            let expired = constraints.get(id).map_or(true, |c| c.should_remove);
            if expired {
                constraints.remove(id);
                active.swap_remove(index);
                removed += 1;
            } else {
                index += 1;
            }
        }
        removed
    }
}
