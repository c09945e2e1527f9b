//! Stress-accumulation fracture model for fragile bodies.
//!
//! Each fragile body carries an explicit state machine:
//! `Armed` (grace countdown, stress ignored) -> `Active` (stress
//! accumulates and decays) -> `Broken` (terminal). Stress comes from
//! sustained contact impulses, from heavier bodies resting on top, and
//! from engine-reported impact events; the break threshold grows with
//! footprint area and mass.

use crate::constants::fracture::{
    DECAY_PER_SECOND, IMPACT_SCALE, IMPULSE_DEAD_ZONE, IMPULSE_SCALE, LOAD_ABOVE_PX,
    LOAD_MASS_MARGIN, LOAD_SCALE,
};
use crate::constants::INV_PIXELS_PER_METER;
use crate::physics::{ImpactEvent, PhysicsWorld};
use crate::registry::{BodyKey, Registry};

/// Per-body fracture lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FractureState {
    /// Grace window after arming; stress cannot accumulate.
    Armed { ticks_left: u32 },
    /// Stress accumulates from contacts and impacts, decays over time.
    Active { stress: f32 },
    /// Terminal; the body is removed in the same tick.
    Broken,
}

impl FractureState {
    pub fn armed(grace_ticks: u32) -> Self {
        Self::Armed {
            ticks_left: grace_ticks,
        }
    }

    /// Advance one fixed tick: count the grace window down (the first
    /// active tick is the one after it reaches zero), decay stress.
    pub fn tick(self, dt: f32) -> Self {
        match self {
            Self::Armed { ticks_left: 0 } => Self::Active { stress: 0.0 },
            Self::Armed { ticks_left } => Self::Armed {
                ticks_left: ticks_left - 1,
            },
            Self::Active { stress } => Self::Active {
                stress: (stress - DECAY_PER_SECOND * dt).max(0.0),
            },
            Self::Broken => Self::Broken,
        }
    }

    /// Add stress; ignored outside the `Active` state.
    pub fn absorb(self, amount: f32) -> Self {
        match self {
            Self::Active { stress } => Self::Active {
                stress: stress + amount.max(0.0),
            },
            other => other,
        }
    }

    pub fn accumulates(&self) -> bool {
        matches!(self, Self::Active { .. })
    }

    pub fn stress(&self) -> f32 {
        match self {
            Self::Active { stress } => *stress,
            _ => 0.0,
        }
    }
}

/// Stress a body tolerates before shattering. Monotonically increasing in
/// both footprint area and mass.
pub fn break_threshold(area_px2: f32, mass: f32) -> f32 {
    let area_m2 = area_px2 * INV_PIXELS_PER_METER * INV_PIXELS_PER_METER;
    28.0 + area_m2.sqrt().max(0.08) * 22.0 + mass * 8.0
}

/// Run one tick of the fracture model over every fragile body and return
/// the indices (ascending, unique) of bodies that exceeded their
/// threshold. The caller removes them highest index first.
pub fn evaluate(
    registry: &mut Registry,
    physics: &PhysicsWorld,
    impacts: &[ImpactEvent],
    dt: f32,
) -> Vec<usize> {
    let any_fragile = registry
        .bodies
        .iter()
        .any(|r| r.fracture.is_some() && physics.is_valid(r.handle));
    if !any_fragile {
        return Vec::new();
    }

    for record in &mut registry.bodies {
        if let Some(state) = record.fracture {
            if physics.is_valid(record.handle) {
                record.fracture = Some(state.tick(dt));
            }
        }
    }

    for index in 0..registry.bodies.len() {
        let record = &registry.bodies[index];
        let Some(state) = record.fracture else {
            continue;
        };
        if !state.accumulates() || !physics.is_valid(record.handle) {
            continue;
        }
        let Some(center) = physics.position_px(record.handle) else {
            continue;
        };
        let Some(body) = physics.bodies.get(record.handle) else {
            continue;
        };
        let own_mass = physics.mass(record.handle);

        let mut impulse = 0.0;
        let mut load = 0.0;
        for &collider in body.colliders() {
            for pair in physics.narrow_phase.contact_pairs_with(collider) {
                for manifold in &pair.manifolds {
                    for point in &manifold.points {
                        impulse += point.data.impulse.max(0.0);
                    }
                }

                let other_collider = if pair.collider1 == collider {
                    pair.collider2
                } else {
                    pair.collider1
                };
                let Some(other_body) = physics
                    .colliders
                    .get(other_collider)
                    .and_then(|c| c.parent())
                else {
                    continue;
                };
                if other_body == record.handle {
                    continue;
                }
                let Some(other_center) = physics.position_px(other_body) else {
                    continue;
                };
                if other_center.y < center.y - LOAD_ABOVE_PX {
                    load += physics.mass(other_body).max(0.0);
                }
            }
        }

        let mut gain = (impulse - IMPULSE_DEAD_ZONE).max(0.0) * IMPULSE_SCALE * dt * 60.0;
        if load > 0.0 {
            gain += (load - own_mass * LOAD_MASS_MARGIN).max(0.0) * LOAD_SCALE * dt;
        }
        if gain > 0.0 {
            registry.bodies[index].fracture = Some(state.absorb(gain));
        }
    }

    for impact in impacts {
        absorb_impact(registry, physics, impact.body_a, impact.body_b, impact.approach_speed);
        absorb_impact(registry, physics, impact.body_b, impact.body_a, impact.approach_speed);
    }

    registry
        .bodies
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            let Some(FractureState::Active { stress }) = record.fracture else {
                return false;
            };
            physics.is_valid(record.handle)
                && stress > break_threshold(record.area_px2(), physics.mass(record.handle))
        })
        .map(|(index, _)| index)
        .collect()
}

/// Stress contribution of one engine impact event: approach speed times
/// the impacting body's mass.
fn absorb_impact(
    registry: &mut Registry,
    physics: &PhysicsWorld,
    target: BodyKey,
    other: BodyKey,
    approach_speed: f32,
) {
    let Some(index) = registry.index_of(target) else {
        return;
    };
    let Some(state) = registry.bodies[index].fracture else {
        return;
    };
    if !state.accumulates() {
        return;
    }
    let amount = approach_speed * physics.mass(other) * IMPACT_SCALE;
    registry.bodies[index].fracture = Some(state.absorb(amount));
}
