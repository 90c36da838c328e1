use std::time::Instant;

use glam::Vec2;
use log::warn;

use crate::{
    collision::{contact::ContactManifold, contact_cache::ContactCache, narrowphase::NarrowPhase},
    config::{ConfigError, WorldSettings},
    core::{
        constraints::{Constraint, ConstraintId},
        rigidbody::RigidBody,
    },
    debug::DebugDraw,
    dynamics::{
        integrator::Integrator,
        solver::{ConstraintSolver, SolverStepMetrics},
    },
    utils::{
        allocator::{Arena, EntityId},
        logging::{warn_if_step_budget_exceeded, ScopedTimer},
        profiling::{PhaseTimer, PhysicsProfiler},
    },
};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Simulation context owning bodies, constraints, the contact cache and the
/// solver. Created once, stepped at a fixed rate by the host, then dropped.
pub struct PhysicsWorld {
    bodies: Arena<RigidBody>,
    constraints: Arena<Constraint>,
    active: Vec<ConstraintId>,
    cache: ContactCache,
    solver: ConstraintSolver,
    settings: WorldSettings,
    parallel_enabled: bool,
    debug_drawer: Option<Box<dyn DebugDraw>>,
    last_metrics: SolverStepMetrics,
    profiler: PhysicsProfiler,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::from_valid_settings(WorldSettings::default())
    }
}

impl PhysicsWorld {
    pub fn new(settings: WorldSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        Ok(Self::from_valid_settings(settings))
    }

    fn from_valid_settings(settings: WorldSettings) -> Self {
        Self {
            bodies: Arena::new(),
            constraints: Arena::new(),
            active: Vec::new(),
            cache: ContactCache::new(&settings),
            solver: ConstraintSolver::new(settings.solver_iterations, settings.convergence_epsilon),
            settings,
            parallel_enabled: false,
            debug_drawer: None,
            last_metrics: SolverStepMetrics::default(),
            profiler: PhysicsProfiler::default(),
        }
    }

    pub fn settings(&self) -> &WorldSettings {
        &self.settings
    }

    pub fn gravity(&self) -> Vec2 {
        self.settings.gravity
    }

    pub fn set_gravity(&mut self, gravity: Vec2) -> Result<(), ConfigError> {
        let settings = WorldSettings {
            gravity,
            ..self.settings
        };
        settings.validate()?;
        self.settings = settings;
        Ok(())
    }

    /// Runs the narrowphase sweep on the rayon pool. Ignored without the
    /// `parallel` feature.
    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.parallel_enabled = enabled;
    }

    pub fn parallel_enabled(&self) -> bool {
        self.parallel_enabled
    }

    pub fn set_debug_drawer(&mut self, drawer: Box<dyn DebugDraw>) {
        self.debug_drawer = Some(drawer);
    }

    pub fn clear_debug_drawer(&mut self) -> Option<Box<dyn DebugDraw>> {
        self.debug_drawer.take()
    }

    pub fn add_body(&mut self, body: RigidBody) -> EntityId {
        let id = self.bodies.insert(body);
        if let Some(body) = self.bodies.get_mut(id) {
            body.id = id;
        }
        id
    }

    pub fn body(&self, id: EntityId) -> Option<&RigidBody> {
        self.bodies.get(id)
    }

    pub fn body_mut(&mut self, id: EntityId) -> Option<&mut RigidBody> {
        self.bodies.get_mut(id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = (EntityId, &RigidBody)> + '_ {
        self.bodies.iter_with_ids()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Removes a body together with every constraint that references it.
    pub fn remove_body(&mut self, id: EntityId) -> Option<RigidBody> {
        let body = self.bodies.remove(id)?;
        self.cache.remove_body(id, &mut self.constraints);
        for constraint in self.constraints.iter_mut() {
            if constraint.involves(id) {
                constraint.should_remove = true;
            }
        }
        ConstraintSolver::purge(&mut self.constraints, &mut self.active);
        Some(body)
    }

    /// Rigid distance joint between two model-space anchors.
    pub fn add_distance_constraint(
        &mut self,
        body_a: EntityId,
        body_b: EntityId,
        model_anchor_a: Vec2,
        model_anchor_b: Vec2,
        distance: f32,
    ) -> Result<ConstraintId, ConfigError> {
        self.add_constraint(Constraint::distance(
            body_a,
            body_b,
            model_anchor_a,
            model_anchor_b,
            distance,
        ))
    }

    /// Registers a host-built constraint after checking its tunables. A
    /// constraint whose bodies are missing is never enforced.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<ConstraintId, ConfigError> {
        constraint.validate()?;
        let id = self.constraints.insert(constraint);
        self.active.push(id);
        Ok(id)
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.get(id)
    }

    pub fn constraint_mut(&mut self, id: ConstraintId) -> Option<&mut Constraint> {
        self.constraints.get_mut(id)
    }

    pub fn remove_constraint(&mut self, id: ConstraintId) -> Option<Constraint> {
        let removed = self.constraints.remove(id)?;
        self.active.retain(|&active| active != id);
        Some(removed)
    }

    /// Handles of every constraint the solver currently iterates, in solve order.
    pub fn active_constraints(&self) -> &[ConstraintId] {
        &self.active
    }

    pub fn contact_cache(&self) -> &ContactCache {
        &self.cache
    }

    /// Drops every cached contact so the next step rebuilds them cold.
    pub fn clear_contacts(&mut self) {
        self.cache.remove_all(&mut self.constraints);
        ConstraintSolver::purge(&mut self.constraints, &mut self.active);
    }

    pub fn last_solver_metrics(&self) -> SolverStepMetrics {
        self.last_metrics
    }

    pub fn profiler(&self) -> &PhysicsProfiler {
        &self.profiler
    }

    /// Advances the simulation by one fixed step.
    ///
    /// Order is fixed: integrate velocities, collide every body pair into the
    /// contact cache, solve, integrate positions.
    pub fn step(&mut self, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            warn!("ignoring step with invalid dt {dt}");
            return;
        }

        let frame_start = Instant::now();
        let mut profiler = PhysicsProfiler::default();

        {
            let _timer = ScopedTimer::new("integrate::velocity");
            let _phase = PhaseTimer::new(&mut profiler.integrate_velocity_time);
            Integrator::integrate_velocities(&mut self.bodies, self.settings.gravity, dt);
        }
        {
            let _timer = ScopedTimer::new("narrowphase");
            let _phase = PhaseTimer::new(&mut profiler.narrow_phase_time);
            self.update_contacts();
        }
        {
            let _timer = ScopedTimer::new("solver");
            let _phase = PhaseTimer::new(&mut profiler.solver_time);
            self.last_metrics = self.solver.solve(
                &mut self.bodies,
                &mut self.constraints,
                &mut self.active,
                self.debug_drawer.as_deref_mut(),
            );
        }
        {
            let _timer = ScopedTimer::new("integrate::position");
            let _phase = PhaseTimer::new(&mut profiler.integrate_position_time);
            Integrator::integrate_positions(&mut self.bodies, dt);
        }

        profiler.total_frame_time = frame_start.elapsed();
        profiler.body_count = self.bodies.len();
        profiler.contact_pair_count = self.cache.pair_count();
        profiler.constraint_count = self.active.len();
        profiler.report();
        warn_if_step_budget_exceeded(profiler.total_frame_time, dt);
        self.profiler = profiler;
    }

    fn update_contacts(&mut self) {
        let ids: Vec<EntityId> = self.bodies.ids().collect();
        let pairs: Vec<(EntityId, EntityId)> = ids
            .iter()
            .enumerate()
            .flat_map(|(i, &a)| ids[i + 1..].iter().map(move |&b| (a, b)))
            .collect();

        let bodies = &self.bodies;
        #[cfg(feature = "parallel")]
        let manifolds: Vec<Option<ContactManifold>> = if self.parallel_enabled {
            pairs
                .par_iter()
                .map(|&pair| Self::collide_pair(bodies, pair))
                .collect()
        } else {
            pairs
                .iter()
                .map(|&pair| Self::collide_pair(bodies, pair))
                .collect()
        };
        #[cfg(not(feature = "parallel"))]
        let manifolds: Vec<Option<ContactManifold>> = pairs
            .iter()
            .map(|&pair| Self::collide_pair(bodies, pair))
            .collect();

        // Cache updates stay sequential and in pair order.
        for ((a, b), manifold) in pairs.into_iter().zip(manifolds) {
            match manifold {
                Some(manifold) => self.cache.add_manifold(
                    manifold,
                    a,
                    b,
                    &mut self.constraints,
                    &mut self.active,
                ),
                None => self.cache.remove_manifold(a, b, &mut self.constraints),
            }
        }
    }

    fn collide_pair(
        bodies: &Arena<RigidBody>,
        (a, b): (EntityId, EntityId),
    ) -> Option<ContactManifold> {
        NarrowPhase::manifold(bodies.get(a)?, bodies.get(b)?)
    }
}
