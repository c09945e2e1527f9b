//! Read-only views for the presentation layer.
//!
//! The host renders from these snapshots; the core never calls into
//! rendering. Everything is in pixel space.

use bevy_math::Vec2;

use crate::physics::PhysicsWorld;
use crate::registry::{FeatureFlags, JointKind, Registry, ShapeKind};
use crate::water::WaveField;

/// World-space geometry of one body.
#[derive(Debug, Clone)]
pub enum ShapeSnapshot {
    Circle { center: Vec2, radius: f32 },
    Polygon { verts: Vec<Vec2> },
}

#[derive(Debug, Clone)]
pub struct BodySnapshot {
    pub kind: ShapeKind,
    pub shape: ShapeSnapshot,
    pub flags: FeatureFlags,
    pub selected: bool,
    pub wheel_mode: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct JointSnapshot {
    pub kind: JointKind,
    pub anchor_a: Vec2,
    pub anchor_b: Vec2,
}

/// Snapshot every live body, in paint (spawn) order.
pub fn bodies(registry: &Registry, physics: &PhysicsWorld) -> Vec<BodySnapshot> {
    registry
        .bodies
        .iter()
        .filter_map(|record| {
            let center = physics.position_px(record.handle)?;
            let shape = if record.kind == ShapeKind::Ball {
                ShapeSnapshot::Circle {
                    center,
                    radius: record.radius_px,
                }
            } else {
                let angle = physics.rotation_angle(record.handle)?;
                let (sin, cos) = angle.sin_cos();
                ShapeSnapshot::Polygon {
                    verts: record
                        .local_verts_px
                        .iter()
                        .map(|v| {
                            center + Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
                        })
                        .collect(),
                }
            };
            Some(BodySnapshot {
                kind: record.kind,
                shape,
                flags: record.flags,
                selected: record.selected,
                wheel_mode: record.wheel_mode,
            })
        })
        .collect()
}

/// Snapshot every live joint as a pair of endpoint body centers.
pub fn joints(registry: &Registry, physics: &PhysicsWorld) -> Vec<JointSnapshot> {
    registry
        .joints
        .iter()
        .filter_map(|joint| {
            Some(JointSnapshot {
                kind: joint.kind,
                anchor_a: physics.position_px(joint.body_a)?,
                anchor_b: physics.position_px(joint.body_b)?,
            })
        })
        .collect()
}

/// The wave surface as a polyline of pixel points, left to right.
pub fn wave_surface(wave: &WaveField) -> Vec<Vec2> {
    wave.displacements()
        .iter()
        .enumerate()
        .map(|(i, d)| Vec2::new(i as f32 * wave.step_px(), wave.baseline_y() + d))
        .collect()
}
