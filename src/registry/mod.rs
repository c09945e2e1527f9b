//! Body and joint bookkeeping on top of the engine.
//!
//! The registry is the only creator and destroyer of body/joint records.
//! Records are ordered by spawn (paint order for picking) but referenced
//! across structures by their engine handle, which is generational and
//! therefore survives reordering and deletion of other records.

pub mod joints;
pub mod spawn;

use std::collections::{HashSet, VecDeque};

use bevy_math::Vec2;
use log::debug;
use rapier2d::prelude::{ImpulseJointHandle, RigidBodyHandle};
use serde::{Deserialize, Serialize};

use crate::constants::{BASE_HALF_PX, SPAWN_HISTORY_CAP, SPAWN_HISTORY_EVICT};
use crate::fracture::FractureState;
use crate::physics::PhysicsWorld;

/// Stable identity of a body: the engine's generational handle.
pub type BodyKey = RigidBodyHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Box,
    Ball,
    Triangle,
    Polygon,
}

/// Semantic feature flags; physical surface values are derived from these
/// by the surface model.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub bouncy: bool,
    pub slippery: bool,
    pub sticky: bool,
    pub fragile: bool,
}

/// One spawned body. Geometry is cached in pixel space so queries never
/// round-trip through the engine.
#[derive(Debug, Clone)]
pub struct BodyRecord {
    pub handle: BodyKey,
    pub kind: ShapeKind,
    /// Local vertices in pixels; empty for balls.
    pub local_verts_px: Vec<Vec2>,
    /// Radius in pixels; zero for polygonal shapes.
    pub radius_px: f32,
    pub flags: FeatureFlags,
    pub selected: bool,
    /// Whether the last wheel-mode toggle left this body's joints revolute.
    pub wheel_mode: bool,
    /// Present iff the body is fragile.
    pub fracture: Option<FractureState>,
}

impl BodyRecord {
    /// Footprint area in square pixels.
    pub fn area_px2(&self) -> f32 {
        if self.kind == ShapeKind::Ball {
            return std::f32::consts::PI * self.radius_px * self.radius_px;
        }
        if self.local_verts_px.len() < 3 {
            let r = self.approx_radius_px();
            return r * r;
        }
        let mut area = 0.0;
        for (i, a) in self.local_verts_px.iter().enumerate() {
            let b = self.local_verts_px[(i + 1) % self.local_verts_px.len()];
            area += a.x * b.y - b.x * a.y;
        }
        (area.abs() * 0.5).max(1.0)
    }

    /// Conservative bounding radius in pixels.
    pub fn approx_radius_px(&self) -> f32 {
        if self.kind == ShapeKind::Ball {
            return self.radius_px.max(8.0);
        }
        self.local_verts_px
            .iter()
            .fold(0.0f32, |r, v| r.max(v.length()))
            .max(BASE_HALF_PX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JointKind {
    Weld,
    Wheel,
}

/// One constraint between two bodies, keyed by body identity rather than
/// record position.
#[derive(Debug, Clone, Copy)]
pub struct JointRecord {
    pub handle: ImpulseJointHandle,
    pub body_a: BodyKey,
    pub body_b: BodyKey,
    pub kind: JointKind,
}

/// Owner of all body and joint records plus the bounded spawn history.
#[derive(Default)]
pub struct Registry {
    pub bodies: Vec<BodyRecord>,
    pub joints: Vec<JointRecord>,
    spawn_order: Vec<BodyKey>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the record with the given stable key, if still present.
    pub fn index_of(&self, key: BodyKey) -> Option<usize> {
        self.bodies.iter().position(|record| record.handle == key)
    }

    pub(crate) fn push_record(&mut self, record: BodyRecord) -> usize {
        let key = record.handle;
        self.bodies.push(record);
        self.spawn_order.push(key);
        if self.spawn_order.len() > SPAWN_HISTORY_CAP {
            self.spawn_order.drain(..SPAWN_HISTORY_EVICT);
        }
        self.bodies.len() - 1
    }

    /// Destroy the body at `index`: every joint touching it goes first,
    /// then the engine body, the record, and its spawn-history entry.
    pub fn delete(&mut self, index: usize, physics: &mut PhysicsWorld) {
        let Some(record) = self.bodies.get(index) else {
            return;
        };
        let key = record.handle;
        if !physics.is_valid(key) {
            self.bodies.remove(index);
            self.spawn_order.retain(|&k| k != key);
            return;
        }

        self.joints.retain(|joint| {
            let valid = physics.impulse_joints.get(joint.handle).is_some();
            let touches = joint.body_a == key || joint.body_b == key;
            if valid && touches {
                physics.impulse_joints.remove(joint.handle, true);
            }
            valid && !touches
        });

        physics.remove_body(key);
        self.bodies.remove(index);
        self.spawn_order.retain(|&k| k != key);
        debug!("deleted body {key:?}");
    }

    /// Pop spawn history until a still-live body is found and delete it.
    pub fn undo_last_spawn(&mut self, physics: &mut PhysicsWorld) {
        while let Some(key) = self.spawn_order.pop() {
            if let Some(index) = self.index_of(key) {
                if physics.is_valid(key) {
                    self.delete(index, physics);
                    return;
                }
            }
        }
    }

    /// Indices of every body reachable from `index` through valid joints,
    /// including the starting body itself.
    pub fn linked_group(&self, index: usize, physics: &PhysicsWorld) -> Vec<usize> {
        let Some(record) = self.bodies.get(index) else {
            return Vec::new();
        };
        let mut visited: HashSet<BodyKey> = HashSet::new();
        let mut queue: VecDeque<BodyKey> = VecDeque::new();
        visited.insert(record.handle);
        queue.push_back(record.handle);

        while let Some(current) = queue.pop_front() {
            for joint in &self.joints {
                if physics.impulse_joints.get(joint.handle).is_none() {
                    continue;
                }
                let other = if joint.body_a == current {
                    joint.body_b
                } else if joint.body_b == current {
                    joint.body_a
                } else {
                    continue;
                };
                if visited.insert(other) {
                    queue.push_back(other);
                }
            }
        }

        self.bodies
            .iter()
            .enumerate()
            .filter(|(_, record)| {
                physics.is_valid(record.handle) && visited.contains(&record.handle)
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Drop records whose engine handle is gone and joints whose engine
    /// joint or either endpoint is gone. Runs once per frame.
    pub fn reap_invalid(&mut self, physics: &PhysicsWorld) {
        self.bodies.retain(|record| physics.is_valid(record.handle));
        self.joints.retain(|joint| {
            physics.impulse_joints.get(joint.handle).is_some()
                && physics.is_valid(joint.body_a)
                && physics.is_valid(joint.body_b)
        });
    }

    pub fn clear_selection(&mut self) {
        for record in &mut self.bodies {
            record.selected = false;
        }
    }

    pub fn selected_indices(&self, physics: &PhysicsWorld) -> Vec<usize> {
        self.bodies
            .iter()
            .enumerate()
            .filter(|(_, record)| record.selected && physics.is_valid(record.handle))
            .map(|(i, _)| i)
            .collect()
    }

    /// Flip a semantic feature flag; surface params are re-derived by the
    /// caller. Returns the new flag value.
    pub fn toggle_flag(&mut self, index: usize, feature: Feature, grace_ticks: u32) -> Option<bool> {
        let record = self.bodies.get_mut(index)?;
        let on = match feature {
            Feature::Bouncy => {
                record.flags.bouncy = !record.flags.bouncy;
                record.flags.bouncy
            }
            Feature::Slippery => {
                record.flags.slippery = !record.flags.slippery;
                record.flags.slippery
            }
            Feature::Sticky => {
                record.flags.sticky = !record.flags.sticky;
                record.flags.sticky
            }
            Feature::Fragile => {
                record.flags.fragile = !record.flags.fragile;
                record.fracture = record
                    .flags
                    .fragile
                    .then(|| FractureState::armed(grace_ticks));
                record.flags.fragile
            }
        };
        Some(on)
    }
}

/// Togglable body features, one per manipulation tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Feature {
    Bouncy,
    Slippery,
    Sticky,
    Fragile,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(kind: ShapeKind, verts: Vec<Vec2>, radius: f32) -> BodyRecord {
        BodyRecord {
            handle: RigidBodyHandle::from_raw_parts(7, 0),
            kind,
            local_verts_px: verts,
            radius_px: radius,
            flags: FeatureFlags::default(),
            selected: false,
            wheel_mode: false,
            fracture: None,
        }
    }

    #[test]
    fn test_ball_area_uses_radius() {
        let r = record(ShapeKind::Ball, Vec::new(), 10.0);
        assert!((r.area_px2() - std::f32::consts::PI * 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_polygon_area_shoelace() {
        let square = vec![
            Vec2::new(-10.0, -10.0),
            Vec2::new(10.0, -10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(-10.0, 10.0),
        ];
        let r = record(ShapeKind::Box, square, 0.0);
        assert!((r.area_px2() - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_toggle_fragile_arms_fracture() {
        let mut registry = Registry::new();
        registry.bodies.push(record(ShapeKind::Box, Vec::new(), 0.0));
        registry.toggle_flag(0, Feature::Fragile, 60);
        assert!(matches!(
            registry.bodies[0].fracture,
            Some(FractureState::Armed { ticks_left: 60 })
        ));
        registry.toggle_flag(0, Feature::Fragile, 60);
        assert!(registry.bodies[0].fracture.is_none());
    }
}
