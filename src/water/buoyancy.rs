//! Two-way coupling between rigid bodies and the wave field.
//!
//! Runs once per fixed step after the engine step: reads post-step poses,
//! applies buoyancy forces (consumed by the next engine step), damps
//! submerged bodies, feeds wakes back into the wave field and emits entry
//! splashes.

use std::collections::HashMap;

use bevy_math::Vec2;
use nalgebra::vector;
use rand::Rng;

use crate::constants::buoyancy::{
    DAMP_ANGULAR, DAMP_X, DAMP_Y, LIFT, LIFT_DEPTH, LIFT_FLOOR, MAX_DEPTH, SPLASH_DEPTH_DELTA,
    SPLASH_ENTRY_SPEED, WAKE_IMPULSE, WAKE_SAMPLE_SPACING_PX,
};
use crate::debris::DebrisField;
use crate::physics::PhysicsWorld;
use crate::registry::{BodyKey, Registry, ShapeKind};
use crate::units;
use crate::water::WaveField;

/// Previous-tick submersion depth per body, used to detect water entry.
#[derive(Default)]
pub struct DepthTracker {
    prev: HashMap<BodyKey, f32>,
}

impl DepthTracker {
    pub fn forget(&mut self, key: BodyKey) {
        self.prev.remove(&key);
    }

    pub fn clear(&mut self) {
        self.prev.clear();
    }

    fn prune(&mut self, physics: &PhysicsWorld) {
        self.prev.retain(|key, _| physics.is_valid(*key));
    }
}

/// Upward buoyant force for a body of `mass` at clamped submersion
/// `depth`. Zero out of the water, strictly positive and non-decreasing
/// in depth below it.
pub fn buoyant_force(mass: f32, depth: f32) -> f32 {
    if depth <= 0.0 {
        return 0.0;
    }
    mass * LIFT * (LIFT_FLOOR + LIFT_DEPTH * depth.min(MAX_DEPTH))
}

/// Apply one tick of buoyancy coupling to every dynamic body.
pub fn apply(
    tracker: &mut DepthTracker,
    registry: &Registry,
    physics: &mut PhysicsWorld,
    wave: &mut WaveField,
    debris: &mut DebrisField,
    rng: &mut impl Rng,
    spray_enabled: bool,
    dt: f32,
) {
    tracker.prune(physics);
    // Forces persist across engine steps; clear last tick's before adding.
    physics.reset_forces();

    for record in &registry.bodies {
        let Some(body) = physics.bodies.get_mut(record.handle) else {
            continue;
        };
        if !body.is_dynamic() {
            continue;
        }

        let center = units::vec_to_pixels(body.translation());
        let (mut min, mut max) = (center, center);
        if record.kind == ShapeKind::Ball {
            min = center - Vec2::splat(record.radius_px);
            max = center + Vec2::splat(record.radius_px);
        } else {
            let angle = body.rotation().angle();
            let (sin, cos) = angle.sin_cos();
            for v in &record.local_verts_px {
                let world = center + Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos);
                min = min.min(world);
                max = max.max(world);
            }
        }

        let water_y = wave.height_at(center.x);
        let span = (max.y - min.y).max(1.0);
        let depth = ((max.y - water_y) / span).clamp(0.0, MAX_DEPTH);
        let prev_depth = tracker.prev.insert(record.handle, depth).unwrap_or(0.0);

        if depth <= 0.0 {
            continue;
        }

        let lift = buoyant_force(body.mass(), depth);
        body.add_force(vector![0.0, -lift], true);

        let vel = *body.linvel();
        let damp_x = (1.0 - dt * depth * DAMP_X).max(0.0);
        let damp_y = (1.0 - dt * depth * DAMP_Y).max(0.0);
        body.set_linvel(vector![vel.x * damp_x, vel.y * damp_y], true);
        let angvel = body.angvel();
        body.set_angvel(angvel * (1.0 - dt * depth * DAMP_ANGULAR).max(0.0), true);

        // Wake: spread the body's downward push over its width.
        let width = (max.x - min.x).max(8.0);
        let samples = ((width / WAKE_SAMPLE_SPACING_PX) as i32).clamp(1, 7);
        for s in 0..samples {
            let t = if samples == 1 {
                0.5
            } else {
                s as f32 / (samples - 1) as f32
            };
            wave.disturb(min.x + width * t, -vel.y * WAKE_IMPULSE / samples as f32);
        }

        if spray_enabled {
            let entering = depth - prev_depth;
            let plunged = entering > SPLASH_DEPTH_DELTA
                || (prev_depth <= 0.02
                    && depth > 0.08
                    && vel.y.abs() > SPLASH_ENTRY_SPEED);
            if plunged {
                debris.spawn_entry_splash(rng, center.x, water_y, Vec2::new(vel.x, vel.y));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_force_above_water() {
        assert_eq!(buoyant_force(5.0, 0.0), 0.0);
        assert_eq!(buoyant_force(5.0, -1.0), 0.0);
    }

    #[test]
    fn test_force_positive_and_monotonic_in_depth() {
        let mass = 3.0;
        let mut last = 0.0;
        for step in 1..=10 {
            let depth = step as f32 * 0.1;
            let force = buoyant_force(mass, depth);
            assert!(force > 0.0);
            assert!(force >= last, "force dipped at depth {depth}");
            last = force;
        }
    }

    #[test]
    fn test_force_saturates_at_depth_clamp() {
        let at_clamp = buoyant_force(1.0, MAX_DEPTH);
        assert_eq!(at_clamp, buoyant_force(1.0, MAX_DEPTH + 5.0));
    }

    #[test]
    fn test_depth_tracker_forgets_bodies() {
        let mut tracker = DepthTracker::default();
        let key = rapier2d::prelude::RigidBodyHandle::from_raw_parts(3, 0);
        tracker.prev.insert(key, 0.5);
        tracker.forget(key);
        assert!(tracker.prev.is_empty());
    }
}
