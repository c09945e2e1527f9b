//! Spawn operations: primitives, drag-sized shapes and freeform strokes.
//!
//! All spawns clamp their position into the scene above the active ground.
//! Freeform/polygon spawns run through a convex hull and are rejected as a
//! no-op when the hull degenerates; their density shrinks with footprint
//! area so large drawings stay liftable.

use bevy_math::Vec2;
use log::debug;
use rapier2d::math::{Point, Real};
use rapier2d::parry::transformation::convex_hull;
use rapier2d::prelude::ColliderBuilder;

use crate::constants::{BASE_HALF_PX, BASE_SIZE_PX, SPAWN_MARGIN_PX};
use crate::physics::PhysicsWorld;
use crate::scene::Scene;
use crate::surface;
use crate::units;

use super::{BodyRecord, FeatureFlags, Registry, ShapeKind};

/// Baseline friction for polygonal shapes; balls roll with less.
const POLYGON_FRICTION: f32 = 1.6;
const BALL_FRICTION: f32 = 0.95;

/// Freeform strokes are resampled down to this many points before hulling.
const FREEFORM_MAX_POINTS: usize = 48;

/// Density multiplier for a shape of the given pixel area, relative to the
/// default shape footprint. Clamped so nothing gets absurdly heavy or
/// feather-light.
pub(crate) fn density_scale(area_px2: f32) -> f32 {
    let base_area = BASE_SIZE_PX * BASE_SIZE_PX;
    (base_area / area_px2.max(1.0)).sqrt().clamp(0.25, 1.0)
}

/// Signed shoelace area of a pixel-space polygon, floored at one.
pub(crate) fn polygon_area_px2(verts: &[Vec2]) -> f32 {
    if verts.len() < 3 {
        return 1.0;
    }
    let mut area = 0.0;
    for (i, a) in verts.iter().enumerate() {
        let b = verts[(i + 1) % verts.len()];
        area += a.x * b.y - b.x * a.y;
    }
    (area.abs() * 0.5).max(1.0)
}

fn clamp_spawn(scene: &Scene, pos: Vec2, half_w: f32, half_h: f32) -> Vec2 {
    let min_x = half_w + SPAWN_MARGIN_PX;
    let max_x = scene.width_px - half_w - SPAWN_MARGIN_PX;
    let min_y = half_h + SPAWN_MARGIN_PX;
    let max_y = scene.ground_top_y() - half_h - SPAWN_MARGIN_PX;
    Vec2::new(
        pos.x.clamp(min_x, max_x.max(min_x)),
        pos.y.clamp(min_y, max_y.max(min_y)),
    )
}

fn finish_spawn(
    registry: &mut Registry,
    physics: &mut PhysicsWorld,
    record: BodyRecord,
) -> usize {
    let index = registry.push_record(record);
    surface::apply(&registry.bodies[index], physics);
    index
}

/// Spawn the default box at `pos`.
pub fn spawn_box(
    registry: &mut Registry,
    physics: &mut PhysicsWorld,
    scene: &Scene,
    pos: Vec2,
) -> Option<usize> {
    let spawn = clamp_spawn(scene, pos, BASE_HALF_PX, BASE_HALF_PX);
    let body = physics.create_dynamic_body(spawn);
    let half_m = units::px_to_m(BASE_HALF_PX);
    physics.attach_collider(
        body,
        ColliderBuilder::cuboid(half_m, half_m),
        1.0,
        POLYGON_FRICTION,
    );

    let record = BodyRecord {
        handle: body,
        kind: ShapeKind::Box,
        local_verts_px: vec![
            Vec2::new(-BASE_HALF_PX, -BASE_HALF_PX),
            Vec2::new(BASE_HALF_PX, -BASE_HALF_PX),
            Vec2::new(BASE_HALF_PX, BASE_HALF_PX),
            Vec2::new(-BASE_HALF_PX, BASE_HALF_PX),
        ],
        radius_px: 0.0,
        flags: FeatureFlags::default(),
        selected: false,
        wheel_mode: false,
        fracture: None,
    };
    Some(finish_spawn(registry, physics, record))
}

fn spawn_ball_with_radius(
    registry: &mut Registry,
    physics: &mut PhysicsWorld,
    scene: &Scene,
    pos: Vec2,
    radius_px: f32,
    density: f32,
) -> Option<usize> {
    let spawn = clamp_spawn(scene, pos, radius_px, radius_px);
    let body = physics.create_dynamic_body(spawn);
    physics.attach_collider(
        body,
        ColliderBuilder::ball(units::px_to_m(radius_px)),
        density,
        BALL_FRICTION,
    );

    let record = BodyRecord {
        handle: body,
        kind: ShapeKind::Ball,
        local_verts_px: Vec::new(),
        radius_px,
        flags: FeatureFlags::default(),
        selected: false,
        wheel_mode: false,
        fracture: None,
    };
    Some(finish_spawn(registry, physics, record))
}

/// Spawn the default ball at `pos`.
pub fn spawn_ball(
    registry: &mut Registry,
    physics: &mut PhysicsWorld,
    scene: &Scene,
    pos: Vec2,
) -> Option<usize> {
    spawn_ball_with_radius(registry, physics, scene, pos, BASE_HALF_PX, 1.0)
}

/// Spawn the default equilateral triangle at `pos`.
pub fn spawn_triangle(
    registry: &mut Registry,
    physics: &mut PhysicsWorld,
    scene: &Scene,
    pos: Vec2,
) -> Option<usize> {
    let h = BASE_SIZE_PX;
    let half_base = h / 3.0f32.sqrt();
    let verts = [
        Vec2::new(0.0, -h * 0.5),
        Vec2::new(half_base, h * 0.5),
        Vec2::new(-half_base, h * 0.5),
    ];
    spawn_polygon_body(registry, physics, scene, ShapeKind::Triangle, pos, &verts)
}

/// Spawn a convex body from local pixel vertices around `center_px`.
///
/// Returns `None` without creating anything when fewer than three vertices
/// are supplied or the convex hull collapses.
pub fn spawn_polygon(
    registry: &mut Registry,
    physics: &mut PhysicsWorld,
    scene: &Scene,
    center_px: Vec2,
    local_verts_px: &[Vec2],
) -> Option<usize> {
    spawn_polygon_body(
        registry,
        physics,
        scene,
        ShapeKind::Polygon,
        center_px,
        local_verts_px,
    )
}

fn spawn_polygon_body(
    registry: &mut Registry,
    physics: &mut PhysicsWorld,
    scene: &Scene,
    kind: ShapeKind,
    center_px: Vec2,
    local_verts_px: &[Vec2],
) -> Option<usize> {
    if local_verts_px.len() < 3 {
        return None;
    }

    let mut min = local_verts_px[0];
    let mut max = local_verts_px[0];
    for v in local_verts_px {
        min = min.min(*v);
        max = max.max(*v);
    }
    let half_w = min.x.abs().max(max.x.abs());
    let half_h = min.y.abs().max(max.y.abs());
    let spawn = clamp_spawn(scene, center_px, half_w, half_h);

    let points: Vec<Point<Real>> = local_verts_px
        .iter()
        .map(|v| units::point_to_meters(*v))
        .collect();
    let hull = convex_hull(&points);
    if hull.len() < 3 {
        debug!("rejecting degenerate polygon spawn ({} hull verts)", hull.len());
        return None;
    }

    let body = physics.create_dynamic_body(spawn);
    let Some(builder) = ColliderBuilder::convex_hull(&hull) else {
        physics.remove_body(body);
        return None;
    };
    let density = density_scale(polygon_area_px2(local_verts_px));
    physics.attach_collider(body, builder, density, POLYGON_FRICTION);

    let record = BodyRecord {
        handle: body,
        kind,
        local_verts_px: hull.iter().map(units::point_to_pixels).collect(),
        radius_px: 0.0,
        flags: FeatureFlags::default(),
        selected: false,
        wheel_mode: false,
        fracture: None,
    };
    Some(finish_spawn(registry, physics, record))
}

/// Spawn a rectangle sized by a pointer drag. Tiny drags are ignored and
/// extreme aspect ratios are squashed back to something solvable.
pub fn spawn_quad_from_drag(
    registry: &mut Registry,
    physics: &mut PhysicsWorld,
    scene: &Scene,
    a: Vec2,
    b: Vec2,
) -> Option<usize> {
    let min = a.min(b);
    let max = a.max(b);
    let mut w = max.x - min.x;
    let mut h = max.y - min.y;
    if w < 10.0 || h < 10.0 {
        return None;
    }

    const MIN_DIM: f32 = 22.0;
    const MAX_ASPECT: f32 = 12.0;
    w = w.max(MIN_DIM);
    h = h.max(MIN_DIM);
    if w.max(h) / w.min(h).max(1.0) > MAX_ASPECT {
        if w > h {
            h = w / MAX_ASPECT;
        } else {
            w = h / MAX_ASPECT;
        }
    }

    let center = (min + max) * 0.5;
    let local = [
        Vec2::new(-w * 0.5, -h * 0.5),
        Vec2::new(w * 0.5, -h * 0.5),
        Vec2::new(w * 0.5, h * 0.5),
        Vec2::new(-w * 0.5, h * 0.5),
    ];
    spawn_polygon(registry, physics, scene, center, &local)
}

/// Spawn a ball sized by a pointer drag. `perfect` forces the diameter to
/// the drag's larger extent.
pub fn spawn_ball_from_drag(
    registry: &mut Registry,
    physics: &mut PhysicsWorld,
    scene: &Scene,
    a: Vec2,
    b: Vec2,
    perfect: bool,
) -> Option<usize> {
    let min = a.min(b);
    let max = a.max(b);
    let mut w = max.x - min.x;
    let mut h = max.y - min.y;
    if perfect {
        let d = w.max(h).max(12.0);
        w = d;
        h = d;
    }
    let diameter = w.min(h);
    if diameter < 12.0 {
        return None;
    }

    let center = (min + max) * 0.5;
    let radius = diameter * 0.5;
    let area = std::f32::consts::PI * radius * radius;
    spawn_ball_with_radius(registry, physics, scene, center, radius, density_scale(area))
}

/// Spawn an equilateral triangle fitted into a pointer-drag rectangle.
pub fn spawn_triangle_from_drag(
    registry: &mut Registry,
    physics: &mut PhysicsWorld,
    scene: &Scene,
    a: Vec2,
    b: Vec2,
) -> Option<usize> {
    let min = a.min(b);
    let max = a.max(b);
    let rect = max - min;
    if rect.x < 12.0 || rect.y < 12.0 {
        return None;
    }
    let mut h = rect.y;
    let mut w = 2.0 * h / 3.0f32.sqrt();
    if w > rect.x {
        w = rect.x;
        h = w * 3.0f32.sqrt() * 0.5;
    }
    let center = min + rect * 0.5;
    let local = [
        Vec2::new(0.0, -h * 0.5),
        Vec2::new(w * 0.5, h * 0.5),
        Vec2::new(-w * 0.5, h * 0.5),
    ];
    spawn_polygon(registry, physics, scene, center, &local)
}

/// Spawn a convex body from a freehand stroke: resample, center on the
/// stroke centroid, hull.
pub fn spawn_freeform(
    registry: &mut Registry,
    physics: &mut PhysicsWorld,
    scene: &Scene,
    stroke: &[Vec2],
) -> Option<usize> {
    if stroke.len() < 3 {
        return None;
    }

    let mut points: Vec<Vec2> = stroke.to_vec();
    if points.len() > FREEFORM_MAX_POINTS {
        let step = (points.len() - 1) as f32 / (FREEFORM_MAX_POINTS - 1) as f32;
        points = (0..FREEFORM_MAX_POINTS)
            .map(|i| {
                let idx = ((i as f32 * step).round() as usize).min(stroke.len() - 1);
                stroke[idx]
            })
            .collect();
    }

    let centroid = points.iter().copied().sum::<Vec2>() / points.len() as f32;
    let local: Vec<Vec2> = points.iter().map(|p| *p - centroid).collect();
    spawn_polygon(registry, physics, scene, centroid, &local)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_density_scale_clamps() {
        // Reference-sized shapes keep full density.
        assert!((density_scale(BASE_SIZE_PX * BASE_SIZE_PX) - 1.0).abs() < 1e-6);
        // Very large shapes bottom out at a quarter density.
        assert!((density_scale(1.0e9) - 0.25).abs() < 1e-6);
        // Tiny shapes never exceed the reference density.
        assert!((density_scale(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_spawn_keeps_body_above_ground() {
        let scene = Scene::new(1536.0, 960.0);
        let spawned = clamp_spawn(&scene, Vec2::new(-50.0, 5000.0), 28.0, 28.0);
        assert!(spawned.x >= 28.0);
        assert!(spawned.y + 28.0 <= scene.ground_top_y());
    }

    #[test]
    fn test_polygon_area_of_triangle() {
        let tri = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!((polygon_area_px2(&tri) - 50.0).abs() < 1e-3);
    }
}
