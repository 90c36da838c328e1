//! Simulation dynamics: integration, friction bounds and the constraint solver.

pub mod friction;
pub mod integrator;
pub mod solver;

pub use integrator::Integrator;
pub use solver::{ConstraintSolver, SolverStepMetrics};
