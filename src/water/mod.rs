//! 1-D discretized water-surface simulation.
//!
//! Each sample is a damped spring toward the baseline; several passes of
//! nearest-neighbour coupling stand in for a proper wave-equation solve
//! and set how far a disturbance spreads per tick.

pub mod buoyancy;

use crate::constants::wave::{DAMPING, DISTURB_WINDOW, PASSES, SPREAD, SPRING, STEP_PX};

/// Discretized surface heights over a uniform horizontal grid.
///
/// The four arrays (displacement, velocity, left/right coupling scratch)
/// always have identical length; the baseline only changes when the field
/// is rebuilt for a new surface width.
pub struct WaveField {
    displacement: Vec<f32>,
    velocity: Vec<f32>,
    left: Vec<f32>,
    right: Vec<f32>,
    baseline_y: f32,
    step_px: f32,
}

impl WaveField {
    /// Build a resting field covering `width_px` with its surface at
    /// `baseline_y`.
    pub fn new(width_px: f32, baseline_y: f32) -> Self {
        let samples = ((width_px / STEP_PX).ceil() as usize + 1).max(8);
        Self {
            displacement: vec![0.0; samples],
            velocity: vec![0.0; samples],
            left: vec![0.0; samples],
            right: vec![0.0; samples],
            baseline_y,
            step_px: STEP_PX,
        }
    }

    pub fn len(&self) -> usize {
        self.displacement.len()
    }

    pub fn is_empty(&self) -> bool {
        self.displacement.is_empty()
    }

    pub fn baseline_y(&self) -> f32 {
        self.baseline_y
    }

    pub fn step_px(&self) -> f32 {
        self.step_px
    }

    pub fn displacements(&self) -> &[f32] {
        &self.displacement
    }

    /// Sum of sample displacements; trends toward zero without input.
    pub fn total_displacement(&self) -> f32 {
        self.displacement.iter().sum()
    }

    fn sample_index(&self, x_px: f32) -> usize {
        let idx = (x_px / self.step_px).round() as isize;
        idx.clamp(0, self.displacement.len() as isize - 1) as usize
    }

    /// Surface height at `x_px`, linearly interpolated between the two
    /// nearest samples.
    pub fn height_at(&self, x_px: f32) -> f32 {
        if self.displacement.is_empty() {
            return self.baseline_y;
        }
        let fx = x_px / self.step_px;
        let last = self.displacement.len() - 1;
        let i0 = (fx.floor() as isize).clamp(0, last as isize) as usize;
        let i1 = (i0 + 1).min(last);
        let t = fx - i0 as f32;
        let d = self.displacement[i0] + (self.displacement[i1] - self.displacement[i0]) * t;
        self.baseline_y + d
    }

    /// Kick sample velocities around `x_px` with a triangular falloff.
    pub fn disturb(&mut self, x_px: f32, impulse: f32) {
        if self.displacement.is_empty() {
            return;
        }
        let center = self.sample_index(x_px) as i32;
        for k in -DISTURB_WINDOW..=DISTURB_WINDOW {
            let i = center + k;
            if i < 0 || i >= self.velocity.len() as i32 {
                continue;
            }
            let falloff = 1.0 - k.abs() as f32 / (DISTURB_WINDOW + 1) as f32;
            self.velocity[i as usize] += impulse * falloff.max(0.0);
        }
    }

    /// Advance the field one fixed step.
    pub fn update(&mut self, dt: f32) {
        let n = self.displacement.len();
        if n < 3 {
            return;
        }

        for i in 0..n {
            let accel = -SPRING * self.displacement[i] - DAMPING * self.velocity[i];
            self.velocity[i] += accel * dt;
            self.displacement[i] += self.velocity[i] * dt;
        }

        for _ in 0..PASSES {
            for i in 0..n {
                if i > 0 {
                    self.left[i] = SPREAD * (self.displacement[i] - self.displacement[i - 1]);
                    self.velocity[i - 1] += self.left[i];
                }
                if i + 1 < n {
                    self.right[i] = SPREAD * (self.displacement[i] - self.displacement[i + 1]);
                    self.velocity[i + 1] += self.right[i];
                }
            }
            for i in 0..n {
                if i > 0 {
                    self.displacement[i - 1] += self.left[i];
                }
                if i + 1 < n {
                    self.displacement[i + 1] += self.right[i];
                }
            }
        }
    }

    /// Flatten the surface, e.g. on scene reset.
    pub fn reset(&mut self) {
        self.displacement.fill(0.0);
        self.velocity.fill(0.0);
        self.left.fill(0.0);
        self.right.fill(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrays_share_length() {
        let field = WaveField::new(1536.0, 550.0);
        assert_eq!(field.displacement.len(), field.velocity.len());
        assert_eq!(field.left.len(), field.right.len());
        assert!(field.len() >= 8);
    }

    #[test]
    fn test_height_at_rest_is_baseline() {
        let field = WaveField::new(800.0, 500.0);
        assert_eq!(field.height_at(0.0), 500.0);
        assert_eq!(field.height_at(400.0), 500.0);
        assert_eq!(field.height_at(10_000.0), 500.0);
    }

    #[test]
    fn test_disturb_spreads_with_falloff() {
        let mut field = WaveField::new(800.0, 500.0);
        field.disturb(400.0, 1.0);
        let center = field.sample_index(400.0);
        assert!(field.velocity[center] > field.velocity[center + 2]);
        assert!(field.velocity[center + 2] > 0.0);
    }

    #[test]
    fn test_displacement_trends_to_zero_without_input() {
        let mut field = WaveField::new(800.0, 500.0);
        let center = field.sample_index(400.0);
        for k in 0..5 {
            field.displacement[center + k] = 10.0 - k as f32;
        }
        let initial: f32 = field.displacement.iter().map(|d| d.abs()).sum();

        let dt = 1.0 / 55.0;
        for _ in 0..20_000 {
            field.update(dt);
        }
        let settled: f32 = field.displacement.iter().map(|d| d.abs()).sum();
        assert!(settled.is_finite());
        assert!(
            settled < initial * 0.01,
            "field failed to settle: {settled} vs initial {initial}"
        );
    }

    #[test]
    fn test_reset_flattens_surface() {
        let mut field = WaveField::new(800.0, 500.0);
        field.disturb(100.0, 5.0);
        field.update(1.0 / 55.0);
        field.reset();
        assert_eq!(field.total_displacement(), 0.0);
        assert_eq!(field.height_at(100.0), 500.0);
    }
}
