//! Global configuration constants and the validated world settings.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default gravity vector applied to mobile bodies (Y-up).
pub const DEFAULT_GRAVITY: [f32; 2] = [0.0, -9.81];

/// Default fixed timestep (in seconds).
pub const DEFAULT_TIME_STEP: f32 = 1.0 / 30.0;

/// Maximum number of Gauss–Seidel sweeps per step.
pub const DEFAULT_SOLVER_ITERATIONS: u32 = 20;

/// Sweeps stop early once the summed velocity error falls below this.
pub const DEFAULT_CONVERGENCE_EPSILON: f32 = 0.001;

/// Positional dead zone for joints.
pub const DEFAULT_SLOP: f32 = 0.05;

/// Penetration dead zone handed to contact constraints.
pub const DEFAULT_CONTACT_SLOP: f32 = 0.01;

/// Baumgarte stabilization rate: 30% of the error per step at 30 Hz.
pub const DEFAULT_BAUMGARTE_TERM: f32 = 0.3 * 30.0;

/// Coulomb coefficient for friction constraints.
pub const DEFAULT_FRICTION: f32 = 0.99;

/// Squared distance under which a new contact point matches a cached one.
pub const DEFAULT_MATCH_THRESHOLD: f32 = 0.05;

/// Cached contacts are reused only if the normal dot product exceeds this.
pub const DEFAULT_NORMAL_SIMILARITY: f32 = 0.95;

/// Multiplicative linear velocity damping applied per step.
pub const DEFAULT_LINEAR_DAMPING: f32 = 0.995;

/// Multiplicative angular velocity damping applied per step.
pub const DEFAULT_ANGULAR_DAMPING: f32 = 0.99;

/// Rejected configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("solver iteration cap must be at least 1")]
    ZeroIterations,
    #[error("convergence epsilon must be positive and finite, got {0}")]
    ConvergenceEpsilon(f32),
    #[error("contact match threshold must be positive and finite, got {0}")]
    MatchThreshold(f32),
    #[error("normal similarity threshold must lie in (0, 1], got {0}")]
    NormalSimilarity(f32),
    #[error("slop must be non-negative and finite, got {0}")]
    Slop(f32),
    #[error("baumgarte term must be non-negative and finite, got {0}")]
    BaumgarteTerm(f32),
    #[error("friction coefficient must be non-negative and finite, got {0}")]
    Friction(f32),
    #[error("gravity must be finite, got {0:?}")]
    Gravity([f32; 2]),
    #[error("joint distance must be non-negative and finite, got {0}")]
    JointDistance(f32),
    #[error("impulse cap must be finite, got {0}")]
    ImpulseCap(f32),
}

/// Tunables consumed by [`crate::world::PhysicsWorld`] and its contact cache.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldSettings {
    pub gravity: Vec2,
    pub solver_iterations: u32,
    pub convergence_epsilon: f32,
    pub contact_slop: f32,
    pub contact_baumgarte_term: f32,
    pub friction: f32,
    pub match_threshold: f32,
    pub normal_similarity: f32,
}

impl Default for WorldSettings {
    fn default() -> Self {
        Self {
            gravity: Vec2::from_array(DEFAULT_GRAVITY),
            solver_iterations: DEFAULT_SOLVER_ITERATIONS,
            convergence_epsilon: DEFAULT_CONVERGENCE_EPSILON,
            contact_slop: DEFAULT_CONTACT_SLOP,
            contact_baumgarte_term: DEFAULT_BAUMGARTE_TERM,
            friction: DEFAULT_FRICTION,
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            normal_similarity: DEFAULT_NORMAL_SIMILARITY,
        }
    }
}

impl WorldSettings {
    /// Checks every field. Called once when a world is created, never mid-step.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gravity.is_finite() {
            return Err(ConfigError::Gravity(self.gravity.to_array()));
        }
        if self.solver_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if !is_positive(self.convergence_epsilon) {
            return Err(ConfigError::ConvergenceEpsilon(self.convergence_epsilon));
        }
        if !is_positive(self.match_threshold) {
            return Err(ConfigError::MatchThreshold(self.match_threshold));
        }
        if !(self.normal_similarity > 0.0 && self.normal_similarity <= 1.0) {
            return Err(ConfigError::NormalSimilarity(self.normal_similarity));
        }
        if !is_non_negative(self.contact_slop) {
            return Err(ConfigError::Slop(self.contact_slop));
        }
        if !is_non_negative(self.contact_baumgarte_term) {
            return Err(ConfigError::BaumgarteTerm(self.contact_baumgarte_term));
        }
        if !is_non_negative(self.friction) {
            return Err(ConfigError::Friction(self.friction));
        }
        Ok(())
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

pub(crate) fn is_non_negative(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}
