//! Weld and wheel constraints between bodies.
//!
//! Welds are rigid fixed joints; wheels are plain revolute joints with no
//! motor, limit or spring. Both are recorded by body identity so records
//! stay meaningful while the registry reorders.

use std::collections::HashSet;

use bevy_math::Vec2;
use log::debug;
use rapier2d::math::Isometry;
use rapier2d::prelude::{FixedJointBuilder, RevoluteJointBuilder};

use crate::physics::PhysicsWorld;
use crate::units;

use super::{BodyKey, JointKind, JointRecord, Registry};

/// Create a rigid weld between `a` and `b` anchored at a shared world
/// point. Fails (without side effects) on invalid or identical bodies.
pub fn create_weld(
    registry: &mut Registry,
    physics: &mut PhysicsWorld,
    a: BodyKey,
    b: BodyKey,
    world_anchor_px: Vec2,
) -> bool {
    if !physics.is_valid(a) || !physics.is_valid(b) || a == b {
        return false;
    }
    let world_frame = Isometry::new(units::vec_to_meters(world_anchor_px), 0.0);
    let (Some(body_a), Some(body_b)) = (physics.bodies.get(a), physics.bodies.get(b)) else {
        return false;
    };
    let joint = FixedJointBuilder::new()
        .local_frame1(body_a.position().inv_mul(&world_frame))
        .local_frame2(body_b.position().inv_mul(&world_frame));
    let handle = physics.impulse_joints.insert(a, b, joint, true);
    registry.joints.push(JointRecord {
        handle,
        body_a: a,
        body_b: b,
        kind: JointKind::Weld,
    });
    true
}

/// Create a motorless revolute joint letting `wheel` spin around a shared
/// world anchor on `host`.
pub fn create_wheel(
    registry: &mut Registry,
    physics: &mut PhysicsWorld,
    host: BodyKey,
    wheel: BodyKey,
    world_anchor_px: Vec2,
) -> bool {
    if !physics.is_valid(host) || !physics.is_valid(wheel) || host == wheel {
        return false;
    }
    let anchor = units::point_to_meters(world_anchor_px);
    let (Some(body_a), Some(body_b)) =
        (physics.bodies.get(host), physics.bodies.get(wheel))
    else {
        return false;
    };
    let joint = RevoluteJointBuilder::new()
        .local_anchor1(body_a.position().inverse_transform_point(&anchor))
        .local_anchor2(body_b.position().inverse_transform_point(&anchor));
    let handle = physics.impulse_joints.insert(host, wheel, joint, true);
    registry.joints.push(JointRecord {
        handle,
        body_a: host,
        body_b: wheel,
        kind: JointKind::Wheel,
    });
    true
}

/// Uniformly flip every joint touching the body at `index` between weld
/// and wheel mode.
///
/// The direction is global: if any attached joint is currently a wheel
/// joint the whole set becomes welds, otherwise the whole set becomes
/// wheels. Wheels re-anchor at the body's center; welds at the midpoint
/// between the body and each host. No-op for bodies without joints.
pub fn toggle_wheel_mode(registry: &mut Registry, physics: &mut PhysicsWorld, index: usize) {
    let Some(record) = registry.bodies.get(index) else {
        return;
    };
    let wheel_key = record.handle;
    if !physics.is_valid(wheel_key) {
        return;
    }

    let mut has_any = false;
    let mut has_wheel = false;
    for joint in &registry.joints {
        let touches = joint.body_a == wheel_key || joint.body_b == wheel_key;
        if touches && physics.impulse_joints.get(joint.handle).is_some() {
            has_any = true;
            has_wheel |= joint.kind == JointKind::Wheel;
        }
    }
    if !has_any {
        return;
    }

    let Some(anchor_px) = physics.position_px(wheel_key) else {
        return;
    };

    // Collect hosts first, then mutate; replacing joints while scanning the
    // record list would reprocess the replacements.
    let mut seen: HashSet<BodyKey> = HashSet::new();
    let mut hosts: Vec<BodyKey> = Vec::new();
    for joint in &registry.joints {
        if physics.impulse_joints.get(joint.handle).is_none() {
            continue;
        }
        let host = if joint.body_a == wheel_key {
            joint.body_b
        } else if joint.body_b == wheel_key {
            joint.body_a
        } else {
            continue;
        };
        if host != wheel_key && physics.is_valid(host) && seen.insert(host) {
            hosts.push(host);
        }
    }

    registry.joints.retain(|joint| {
        let valid = physics.impulse_joints.get(joint.handle).is_some();
        let touches = joint.body_a == wheel_key || joint.body_b == wheel_key;
        if valid && touches {
            physics.impulse_joints.remove(joint.handle, true);
        }
        valid && !touches
    });

    for host in hosts {
        if has_wheel {
            let Some(host_px) = physics.position_px(host) else {
                continue;
            };
            create_weld(registry, physics, host, wheel_key, (host_px + anchor_px) * 0.5);
        } else {
            create_wheel(registry, physics, host, wheel_key, anchor_px);
        }
    }

    if let Some(record) = registry.bodies.get_mut(index) {
        record.wheel_mode = !has_wheel;
    }
    debug!(
        "toggled joints on {wheel_key:?} to {}",
        if has_wheel { "weld" } else { "wheel" }
    );
}
