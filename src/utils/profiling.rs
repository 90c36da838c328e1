use log::{debug, log_enabled, Level};
use std::time::{Duration, Instant};

/// Timing and size counters for the most recent step.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhysicsProfiler {
    pub integrate_velocity_time: Duration,
    pub narrow_phase_time: Duration,
    pub solver_time: Duration,
    pub integrate_position_time: Duration,
    pub total_frame_time: Duration,

    pub body_count: usize,
    pub contact_pair_count: usize,
    pub constraint_count: usize,
}

impl PhysicsProfiler {
    /// Emits the profile at `debug` level.
    pub fn report(&self) {
        if !log_enabled!(Level::Debug) {
            return;
        }
        let total_us = self.total_frame_time.as_micros() as f32;
        if total_us < 1.0 {
            return;
        }

        let share = |d: Duration| (d.as_micros() as f32 / total_us) * 100.0;
        debug!(
            "step: {:.3} ms, bodies {}, contact pairs {}, constraints {} \
             (velocity {:.1}%, narrowphase {:.1}%, solver {:.1}%, position {:.1}%)",
            self.total_frame_time.as_secs_f32() * 1000.0,
            self.body_count,
            self.contact_pair_count,
            self.constraint_count,
            share(self.integrate_velocity_time),
            share(self.narrow_phase_time),
            share(self.solver_time),
            share(self.integrate_position_time),
        );
    }
}

/// Adds the elapsed time of its scope to a profiler slot.
pub struct PhaseTimer<'a> {
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub fn new(output: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            output,
        }
    }
}

impl<'a> Drop for PhaseTimer<'a> {
    fn drop(&mut self) {
        *self.output += self.start.elapsed();
    }
}
