//! Picking, selection, dragging and rotation of bodies.
//!
//! A drag session exists only between pointer press and release. While it
//! lives, held bodies are pose-forced to the pointer and carry the
//! pointer's estimated velocity, so they leave the hand "thrown" instead
//! of frozen-then-launched.

use bevy_math::Vec2;
use rapier2d::math::{Point, Real};

use crate::constants::INV_PIXELS_PER_METER;
use crate::physics::PhysicsWorld;
use crate::registry::{joints, BodyKey, Registry, ShapeKind};
use crate::units;

/// Pick tolerance around a body's bounding box, in meters (~15 px).
const PICK_PAD_M: f32 = 0.3;
/// Spin fraction applied to thrown balls.
const THROW_SPIN_SCALE: f32 = 0.8;
/// Minimum pointer travel before a freeform stroke records a new point.
const STROKE_MIN_SPACING_PX: f32 = 5.0;

/// Transient state of a multi-body drag.
struct DragSession {
    /// Grabbed bodies with their pixel offset from the pointer at grab.
    grabs: Vec<(BodyKey, Vec2)>,
    last_pointer: Vec2,
    last_time: f32,
    /// Provisional release velocity in m/s, re-estimated every move.
    release_vel_m: Vec2,
}

/// Interactive manipulation state: at most one of drag, rectangle
/// selection or pending weld pick is live at a time.
#[derive(Default)]
pub struct Manipulator {
    drag: Option<DragSession>,
    selecting: Option<(Vec2, Vec2)>,
    pending_weld: Option<BodyKey>,
}

/// Topmost body under `point_px`: latest-spawned first with a precise
/// shape test, then nearest center within a padded bounding box.
pub fn pick_body(registry: &Registry, physics: &PhysicsWorld, point_px: Vec2) -> Option<usize> {
    let point_m: Point<Real> = units::point_to_meters(point_px);
    let mut nearest: Option<usize> = None;
    let mut nearest_dist2 = f32::MAX;

    for index in (0..registry.bodies.len()).rev() {
        let record = &registry.bodies[index];
        if !physics.is_valid(record.handle) {
            continue;
        }
        if physics.contains_point(record.handle, point_px) {
            return Some(index);
        }

        let Some((mins, maxs)) = physics.padded_aabb(record.handle, PICK_PAD_M) else {
            continue;
        };
        if point_m.x >= mins.x && point_m.x <= maxs.x && point_m.y >= mins.y && point_m.y <= maxs.y
        {
            if let Some(center) = physics.position_px(record.handle) {
                let d2 = center.distance_squared(point_px);
                if d2 < nearest_dist2 {
                    nearest_dist2 = d2;
                    nearest = Some(index);
                }
            }
        }
    }
    nearest
}

impl Manipulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Current selection rectangle (normalized min/max), if one is being
    /// dragged out.
    pub fn selection_rect(&self) -> Option<(Vec2, Vec2)> {
        self.selecting.map(|(a, b)| (a.min(b), a.max(b)))
    }

    pub fn pending_weld(&self) -> Option<BodyKey> {
        self.pending_weld
    }

    /// Pointer press with the grab tool: grab the body under the pointer
    /// (collapsing the selection to it if it was unselected), or start a
    /// rectangle selection over empty space.
    pub fn press(
        &mut self,
        registry: &mut Registry,
        physics: &mut PhysicsWorld,
        pointer: Vec2,
        now: f32,
    ) {
        let Some(index) = pick_body(registry, physics, pointer) else {
            self.selecting = Some((pointer, pointer));
            return;
        };

        if !registry.bodies[index].selected {
            registry.clear_selection();
            registry.bodies[index].selected = true;
        }

        let mut grabs = Vec::new();
        for selected in registry.selected_indices(physics) {
            let key = registry.bodies[selected].handle;
            let Some(center) = physics.position_px(key) else {
                continue;
            };
            grabs.push((key, center - pointer));
            if let Some(body) = physics.bodies.get_mut(key) {
                body.wake_up(true);
            }
        }

        self.drag = Some(DragSession {
            grabs,
            last_pointer: pointer,
            last_time: now,
            release_vel_m: Vec2::ZERO,
        });
    }

    /// Pointer motion: re-estimate the release velocity from real elapsed
    /// time and force-set held bodies to follow, or grow the selection
    /// rectangle.
    pub fn moved(&mut self, physics: &mut PhysicsWorld, pointer: Vec2, now: f32) {
        if let Some((_, current)) = &mut self.selecting {
            *current = pointer;
        }
        let Some(drag) = &mut self.drag else {
            return;
        };

        let elapsed = now - drag.last_time;
        if elapsed > 1.0e-4 {
            let vel_px = (pointer - drag.last_pointer) / elapsed;
            drag.release_vel_m = vel_px * INV_PIXELS_PER_METER;
            drag.last_pointer = pointer;
            drag.last_time = now;
        }

        for (key, offset) in &drag.grabs {
            let Some(body) = physics.bodies.get_mut(*key) else {
                continue;
            };
            body.set_translation(units::vec_to_meters(pointer + *offset), true);
            body.set_linvel(
                nalgebra::vector![drag.release_vel_m.x, drag.release_vel_m.y],
                true,
            );
            body.set_angvel(0.0, true);
        }
    }

    /// Pointer release: throw held bodies with the clamped release
    /// velocity (balls also spin), or commit the rectangle selection.
    pub fn release(
        &mut self,
        registry: &mut Registry,
        physics: &mut PhysicsWorld,
        max_throw_speed: f32,
    ) {
        if let Some(drag) = self.drag.take() {
            let mut velocity = drag.release_vel_m;
            let speed = velocity.length();
            if speed > max_throw_speed && speed > 0.0 {
                velocity *= max_throw_speed / speed;
            }

            for (key, _) in &drag.grabs {
                let is_ball_radius = registry
                    .index_of(*key)
                    .map(|i| &registry.bodies[i])
                    .filter(|record| record.kind == ShapeKind::Ball)
                    .map(|record| record.radius_px);
                let Some(body) = physics.bodies.get_mut(*key) else {
                    continue;
                };
                body.set_linvel(nalgebra::vector![velocity.x, velocity.y], true);
                if let Some(radius_px) = is_ball_radius {
                    let radius_m = units::px_to_m(radius_px).max(0.01);
                    body.set_angvel(velocity.x / radius_m * THROW_SPIN_SCALE, true);
                }
            }
        }

        if let Some((a, b)) = self.selecting.take() {
            select_by_rect(registry, physics, a.min(b), a.max(b));
        }
    }

    /// Abandon any in-progress drag, selection or weld pick.
    pub fn cancel(&mut self) {
        self.drag = None;
        self.selecting = None;
        self.pending_weld = None;
    }

    /// Weld-tool click on the body at `index`: first click marks it,
    /// clicking it again cancels, clicking another body welds the pair at
    /// the midpoint of their centers.
    pub fn weld_pick(
        &mut self,
        registry: &mut Registry,
        physics: &mut PhysicsWorld,
        index: usize,
    ) {
        let Some(record) = registry.bodies.get(index) else {
            return;
        };
        let key = record.handle;
        match self.pending_weld.take() {
            None => self.pending_weld = Some(key),
            Some(first) if first == key => {}
            Some(first) => {
                let (Some(a), Some(b)) =
                    (physics.position_px(first), physics.position_px(key))
                else {
                    return;
                };
                joints::create_weld(registry, physics, first, key, (a + b) * 0.5);
            }
        }
    }
}

/// Select exactly the bodies whose center lies inside the rectangle.
pub fn select_by_rect(
    registry: &mut Registry,
    physics: &PhysicsWorld,
    min: Vec2,
    max: Vec2,
) {
    for record in &mut registry.bodies {
        record.selected = false;
        if !physics.is_valid(record.handle) {
            continue;
        }
        if let Some(center) = physics.position_px(record.handle) {
            record.selected =
                center.x >= min.x && center.x <= max.x && center.y >= min.y && center.y <= max.y;
        }
    }
}

/// Rotate every selected body by `delta_rad`, optionally snapping the
/// result to 15-degree increments. Angular velocity is zeroed and the
/// body woken so the new pose takes hold immediately.
pub fn rotate_selection(
    registry: &Registry,
    physics: &mut PhysicsWorld,
    delta_rad: f32,
    snap: bool,
) {
    const SNAP_RAD: f32 = 15.0 * std::f32::consts::PI / 180.0;
    for index in registry.selected_indices(physics) {
        let key = registry.bodies[index].handle;
        let Some(body) = physics.bodies.get_mut(key) else {
            continue;
        };
        let current = body.rotation().angle();
        let target = if snap {
            ((current + delta_rad) / SNAP_RAD).round() * SNAP_RAD
        } else {
            current + delta_rad
        };
        body.set_rotation(nalgebra::UnitComplex::new(target), true);
        body.set_angvel(0.0, true);
        body.wake_up(true);
    }
}

/// Freehand stroke recorder; drops points closer than the minimum spacing
/// so hull input stays well-conditioned.
#[derive(Default)]
pub struct Stroke {
    points: Vec<Vec2>,
}

impl Stroke {
    pub fn begin(&mut self, point: Vec2) {
        self.points.clear();
        self.points.push(point);
    }

    pub fn push(&mut self, point: Vec2) {
        match self.points.last() {
            Some(last) if last.distance(point) <= STROKE_MIN_SPACING_PX => {}
            _ => self.points.push(point),
        }
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stroke_thins_close_points() {
        let mut stroke = Stroke::default();
        stroke.begin(Vec2::ZERO);
        stroke.push(Vec2::new(1.0, 0.0));
        stroke.push(Vec2::new(10.0, 0.0));
        stroke.push(Vec2::new(11.0, 0.0));
        assert_eq!(stroke.points().len(), 2);
    }
}
