//! Thin ownership wrapper around the rapier rigid-body engine.
//!
//! Everything the registry, fracture and buoyancy layers need from the
//! engine goes through [`PhysicsWorld`]: body/collider/joint storage, the
//! fixed step with adaptive solver quality, the contact material policy and
//! impact-event collection.

pub mod events;

use std::collections::HashMap;
use std::num::NonZeroUsize;

use bevy_math::Vec2;
use nalgebra::vector;
use rapier2d::math::{Isometry, Point, Real, Vector};
use rapier2d::parry::query::PointQuery;
use rapier2d::prelude::*;

use crate::constants::{GROUND_HALF_THICKNESS_PX, INV_PIXELS_PER_METER};
use crate::units;

pub use events::ImpactEvent;

use events::ForceEventCollector;

/// Baseline damping applied to freshly spawned dynamic bodies; the surface
/// model overrides both as soon as the record exists.
const SPAWN_LINEAR_DAMPING: f32 = 0.04;
const SPAWN_ANGULAR_DAMPING: f32 = 0.45;

/// Owns the engine-side world: body, collider and joint sets plus the
/// stepping machinery. All positions entering or leaving this type are in
/// pixel space; meters stay internal.
pub struct PhysicsWorld {
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    ccd: CCDSolver,
    pipeline: PhysicsPipeline,
    params: IntegrationParameters,
    gravity: Vector<Real>,
    collector: ForceEventCollector,
    prev_linvel: HashMap<RigidBodyHandle, Vector<Real>>,
    impact_force_threshold: f32,
    ground: RigidBodyHandle,
    ground_center_px: Vec2,
}

impl PhysicsWorld {
    /// Create the engine world with a static ground slab centred on
    /// `ground_center_px` and spanning 70% of the scene width.
    pub fn new(
        scene_width_px: f32,
        ground_center_px: Vec2,
        gravity: f32,
        impact_force_threshold: f32,
    ) -> Self {
        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        let ground = bodies.insert(
            RigidBodyBuilder::fixed().translation(units::vec_to_meters(ground_center_px)),
        );
        let half_w = scene_width_px * 0.7 * INV_PIXELS_PER_METER;
        let half_h = GROUND_HALF_THICKNESS_PX * INV_PIXELS_PER_METER;
        colliders.insert_with_parent(
            ColliderBuilder::cuboid(half_w, half_h)
                .friction(1.4)
                .restitution(0.0)
                .friction_combine_rule(CoefficientCombineRule::Max)
                .restitution_combine_rule(CoefficientCombineRule::Min),
            ground,
            &mut bodies,
        );

        Self {
            bodies,
            colliders,
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd: CCDSolver::new(),
            pipeline: PhysicsPipeline::new(),
            params: IntegrationParameters::default(),
            gravity: vector![0.0, gravity],
            collector: ForceEventCollector::default(),
            prev_linvel: HashMap::new(),
            impact_force_threshold,
            ground,
            ground_center_px,
        }
    }

    /// Advance the engine by one fixed step, returning the impact events it
    /// reported. `substeps` maps onto the solver iteration count.
    pub fn step(&mut self, dt: f32, substeps: usize) -> Vec<ImpactEvent> {
        self.prev_linvel.clear();
        for (handle, body) in self.bodies.iter() {
            if body.is_dynamic() {
                self.prev_linvel.insert(handle, *body.linvel());
            }
        }

        self.params.dt = dt;
        self.params.num_solver_iterations =
            NonZeroUsize::new(substeps).unwrap_or(NonZeroUsize::MIN);

        self.collector.clear();
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &self.collector,
        );
        self.collector.drain(&self.prev_linvel)
    }

    pub fn is_valid(&self, handle: RigidBodyHandle) -> bool {
        self.bodies.contains(handle)
    }

    pub fn is_dynamic(&self, handle: RigidBodyHandle) -> bool {
        self.bodies
            .get(handle)
            .is_some_and(|body| body.is_dynamic())
    }

    /// Body center in pixels, if the body still exists.
    pub fn position_px(&self, handle: RigidBodyHandle) -> Option<Vec2> {
        self.bodies
            .get(handle)
            .map(|body| units::vec_to_pixels(body.translation()))
    }

    pub fn rotation_angle(&self, handle: RigidBodyHandle) -> Option<f32> {
        self.bodies.get(handle).map(|body| body.rotation().angle())
    }

    pub fn mass(&self, handle: RigidBodyHandle) -> f32 {
        self.bodies.get(handle).map_or(1.0, |body| body.mass())
    }

    /// Spawn a dynamic body at a pixel position with spawn-time damping.
    pub fn create_dynamic_body(&mut self, pos_px: Vec2) -> RigidBodyHandle {
        self.bodies.insert(
            RigidBodyBuilder::dynamic()
                .translation(units::vec_to_meters(pos_px))
                .linear_damping(SPAWN_LINEAR_DAMPING)
                .angular_damping(SPAWN_ANGULAR_DAMPING)
                .can_sleep(true),
        )
    }

    /// Attach a collider, completing it with the contact-material policy
    /// (max friction / min restitution) and impact-event reporting.
    pub fn attach_collider(
        &mut self,
        body: RigidBodyHandle,
        builder: ColliderBuilder,
        density: f32,
        friction: f32,
    ) -> ColliderHandle {
        let collider = builder
            .density(density)
            .friction(friction)
            .restitution(0.0)
            .friction_combine_rule(CoefficientCombineRule::Max)
            .restitution_combine_rule(CoefficientCombineRule::Min)
            .active_events(ActiveEvents::CONTACT_FORCE_EVENTS)
            .contact_force_event_threshold(self.impact_force_threshold);
        self.colliders
            .insert_with_parent(collider, body, &mut self.bodies)
    }

    /// Destroy a body together with its colliders and attached joints.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Precise point-in-shape test over every collider of the body.
    pub fn contains_point(&self, handle: RigidBodyHandle, point_px: Vec2) -> bool {
        let Some(body) = self.bodies.get(handle) else {
            return false;
        };
        let point = units::point_to_meters(point_px);
        body.colliders().iter().any(|&collider| {
            self.colliders
                .get(collider)
                .is_some_and(|c| c.shape().contains_point(c.position(), &point))
        })
    }

    /// World-space AABB of the body in meters, grown by `pad` meters.
    pub fn padded_aabb(
        &self,
        handle: RigidBodyHandle,
        pad: f32,
    ) -> Option<(Point<Real>, Point<Real>)> {
        let body = self.bodies.get(handle)?;
        let mut mins: Option<Point<Real>> = None;
        let mut maxs: Option<Point<Real>> = None;
        for &collider in body.colliders() {
            let Some(c) = self.colliders.get(collider) else {
                continue;
            };
            let aabb = c.compute_aabb();
            mins = Some(match mins {
                None => aabb.mins,
                Some(m) => nalgebra::point![m.x.min(aabb.mins.x), m.y.min(aabb.mins.y)],
            });
            maxs = Some(match maxs {
                None => aabb.maxs,
                Some(m) => nalgebra::point![m.x.max(aabb.maxs.x), m.y.max(aabb.maxs.y)],
            });
        }
        let (mins, maxs) = (mins?, maxs?);
        Some((
            nalgebra::point![mins.x - pad, mins.y - pad],
            nalgebra::point![maxs.x + pad, maxs.y + pad],
        ))
    }

    /// Number of dynamic bodies currently alive (drives solver quality).
    pub fn dynamic_body_count(&self) -> usize {
        self.bodies.iter().filter(|(_, b)| b.is_dynamic()).count()
    }

    /// Snap the ground slab to a new center line if it moved noticeably.
    pub fn snap_ground(&mut self, center_px: Vec2, epsilon_px: f32) {
        if (center_px.y - self.ground_center_px.y).abs() <= epsilon_px {
            return;
        }
        if let Some(ground) = self.bodies.get_mut(self.ground) {
            ground.set_position(
                Isometry::new(units::vec_to_meters(center_px), 0.0),
                true,
            );
            self.ground_center_px = center_px;
        }
    }

    pub fn ground_handle(&self) -> RigidBodyHandle {
        self.ground
    }

    /// Drop any persistent external forces on every dynamic body.
    pub fn reset_forces(&mut self) {
        for (_, body) in self.bodies.iter_mut() {
            if body.is_dynamic() {
                body.reset_forces(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world() -> PhysicsWorld {
        PhysicsWorld::new(1536.0, Vec2::new(768.0, 710.0), 18.0, 40.0)
    }

    #[test]
    fn test_dynamic_body_count_ignores_ground() {
        let mut physics = world();
        assert_eq!(physics.dynamic_body_count(), 0);
        let body = physics.create_dynamic_body(Vec2::new(100.0, 100.0));
        physics.attach_collider(body, ColliderBuilder::ball(0.5), 1.0, 0.95);
        assert_eq!(physics.dynamic_body_count(), 1);
    }

    #[test]
    fn test_contains_point_hits_collider() {
        let mut physics = world();
        let body = physics.create_dynamic_body(Vec2::new(100.0, 100.0));
        physics.attach_collider(body, ColliderBuilder::ball(0.5), 1.0, 0.95);
        assert!(physics.contains_point(body, Vec2::new(100.0, 110.0)));
        assert!(!physics.contains_point(body, Vec2::new(200.0, 100.0)));
    }

    #[test]
    fn test_remove_body_invalidates_handle() {
        let mut physics = world();
        let body = physics.create_dynamic_body(Vec2::new(100.0, 100.0));
        assert!(physics.is_valid(body));
        physics.remove_body(body);
        assert!(!physics.is_valid(body));
    }

    #[test]
    fn test_free_fall_moves_body_downward() {
        let mut physics = world();
        let body = physics.create_dynamic_body(Vec2::new(100.0, 100.0));
        physics.attach_collider(body, ColliderBuilder::ball(0.5), 1.0, 0.95);
        for _ in 0..30 {
            physics.step(1.0 / 55.0, 3);
        }
        let pos = physics.position_px(body).unwrap();
        assert!(pos.y > 100.0, "body should fall toward +y, got {pos:?}");
    }
}
