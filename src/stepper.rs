//! Fixed-step scheduling.
//!
//! Wall-clock frame time (scaled by the user time factor) feeds an
//! accumulator that releases whole fixed steps. The accumulator is capped
//! at one step's worth per frame: a stalled frame drops its backlog
//! instead of replaying it, so a hitch never snowballs into a CPU spiral.

use crate::constants::MAX_STEPS_PER_FRAME;

#[derive(Debug)]
pub struct FixedStepper {
    fixed_dt: f32,
    accumulator: f32,
    pub time_scale: f32,
    pub paused: bool,
}

impl FixedStepper {
    pub fn new(fixed_dt: f32) -> Self {
        Self {
            fixed_dt,
            accumulator: 0.0,
            time_scale: 1.0,
            paused: false,
        }
    }

    pub fn fixed_dt(&self) -> f32 {
        self.fixed_dt
    }

    /// Feed one frame of wall-clock time and return how many fixed steps
    /// to run (0 or [`MAX_STEPS_PER_FRAME`]). Returns zero while paused,
    /// leaving the accumulator untouched.
    pub fn drain(&mut self, frame_dt: f32) -> usize {
        if self.paused {
            return 0;
        }
        self.accumulator += frame_dt * self.time_scale;
        let cap = self.fixed_dt * MAX_STEPS_PER_FRAME as f32;
        if self.accumulator > cap {
            self.accumulator = cap;
        }

        let mut steps = 0;
        while self.accumulator >= self.fixed_dt && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= self.fixed_dt;
            steps += 1;
        }
        steps
    }
}

/// Solver substep count for the current dynamic-body load: spend quality
/// on sparse scenes, shed it when crowded.
pub fn substeps_for(dynamic_bodies: usize) -> usize {
    if dynamic_bodies <= 24 {
        4
    } else if dynamic_bodies > 80 {
        2
    } else {
        3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slow_frame_releases_at_most_one_step() {
        let mut stepper = FixedStepper::new(1.0 / 55.0);
        // A 500 ms stall is worth ~27 steps; the cap drops the backlog.
        assert_eq!(stepper.drain(0.5), 1);
        // The dropped time must not replay on the next frame.
        assert_eq!(stepper.drain(0.0), 0);
    }

    #[test]
    fn test_small_frames_accumulate() {
        let mut stepper = FixedStepper::new(1.0 / 55.0);
        assert_eq!(stepper.drain(0.01), 0);
        assert_eq!(stepper.drain(0.01), 1);
    }

    #[test]
    fn test_paused_accumulates_nothing() {
        let mut stepper = FixedStepper::new(1.0 / 55.0);
        stepper.paused = true;
        assert_eq!(stepper.drain(1.0), 0);
        stepper.paused = false;
        assert_eq!(stepper.drain(0.0), 0);
    }

    #[test]
    fn test_time_scale_stretches_frame_time() {
        let mut stepper = FixedStepper::new(1.0 / 55.0);
        stepper.time_scale = 0.5;
        assert_eq!(stepper.drain(1.0 / 55.0), 0);
        assert_eq!(stepper.drain(1.0 / 55.0), 1);
    }

    #[test]
    fn test_substeps_adapt_to_body_count() {
        assert_eq!(substeps_for(0), 4);
        assert_eq!(substeps_for(24), 4);
        assert_eq!(substeps_for(50), 3);
        assert_eq!(substeps_for(81), 2);
    }
}
