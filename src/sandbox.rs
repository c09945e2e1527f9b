//! The simulation context tying every subsystem together.
//!
//! One [`Sandbox`] value is the whole mutable state of a scene; the host
//! event loop calls into it once per displayed frame (input first, then
//! [`Sandbox::update`]) and renders from the snapshot views. Everything
//! runs on the calling thread.

use bevy_math::Vec2;
use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::SandboxConfig;
use crate::constants::GROUND_SNAP_EPSILON_PX;
use crate::debris::DebrisField;
use crate::fracture::{self, FractureState};
use crate::manipulation::{self, Manipulator};
use crate::physics::PhysicsWorld;
use crate::registry::{joints, spawn, Feature, Registry};
use crate::scene::{Scene, SceneLocation};
use crate::snapshot::{self, BodySnapshot, JointSnapshot};
use crate::stepper::{substeps_for, FixedStepper};
use crate::units;
use crate::water::buoyancy::{self, DepthTracker};
use crate::water::WaveField;

pub struct Sandbox {
    pub(crate) config: SandboxConfig,
    pub(crate) scene: Scene,
    pub(crate) physics: PhysicsWorld,
    pub(crate) registry: Registry,
    pub(crate) wave: WaveField,
    pub(crate) depths: DepthTracker,
    pub(crate) debris: DebrisField,
    pub(crate) manipulator: Manipulator,
    pub(crate) stepper: FixedStepper,
    pub(crate) rng: StdRng,
}

impl Sandbox {
    pub fn new(width_px: f32, height_px: f32, config: SandboxConfig) -> Self {
        Self::with_rng(width_px, height_px, config, StdRng::from_entropy())
    }

    /// Deterministic construction for tests and replays.
    pub fn new_seeded(width_px: f32, height_px: f32, config: SandboxConfig, seed: u64) -> Self {
        Self::with_rng(width_px, height_px, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(width_px: f32, height_px: f32, config: SandboxConfig, rng: StdRng) -> Self {
        let scene = Scene::new(width_px, height_px);
        let physics = PhysicsWorld::new(
            width_px,
            Vec2::new(width_px * 0.5, scene.ground_center_y()),
            config.gravity,
            config.impact_force_threshold,
        );
        let wave = WaveField::new(width_px, scene.water_baseline_y());
        let stepper = FixedStepper::new(config.fixed_dt);
        Self {
            config,
            scene,
            physics,
            registry: Registry::new(),
            wave,
            depths: DepthTracker::default(),
            debris: DebrisField::default(),
            manipulator: Manipulator::new(),
            stepper,
            rng,
        }
    }

    // ---- frame ---------------------------------------------------------

    /// Advance the simulation by one displayed frame.
    pub fn update(&mut self, frame_dt: f32) {
        let steps = self.stepper.drain(frame_dt);
        if steps > 0 {
            let ground_center =
                Vec2::new(self.scene.width_px * 0.5, self.scene.ground_center_y());
            self.physics.snap_ground(ground_center, GROUND_SNAP_EPSILON_PX);
        }
        for _ in 0..steps {
            let dt = self.stepper.fixed_dt();
            if self.scene.is_water() {
                self.wave.update(dt);
            }

            let substeps = substeps_for(self.physics.dynamic_body_count());
            let impacts = self.physics.step(dt, substeps);

            let broken = fracture::evaluate(&mut self.registry, &self.physics, &impacts, dt);
            for index in broken.into_iter().rev() {
                self.shatter(index);
            }

            if self.scene.is_water() {
                buoyancy::apply(
                    &mut self.depths,
                    &self.registry,
                    &mut self.physics,
                    &mut self.wave,
                    &mut self.debris,
                    &mut self.rng,
                    self.config.water_spray_enabled,
                    dt,
                );
            }
        }

        self.debris
            .update(frame_dt, self.scene.bounds(), self.scene.is_water());
        self.registry.reap_invalid(&self.physics);
    }

    fn shatter(&mut self, index: usize) {
        let Some(record) = self.registry.bodies.get_mut(index) else {
            return;
        };
        record.fracture = Some(FractureState::Broken);

        let record = &self.registry.bodies[index];
        let key = record.handle;
        if let (Some(center), Some(body)) =
            (self.physics.position_px(key), self.physics.bodies.get(key))
        {
            let inherit = units::vec_to_pixels(body.linvel());
            self.debris
                .spawn_shards(&mut self.rng, center, inherit, record.area_px2());
        }
        debug!("body {key:?} shattered");
        self.delete_body(index);
    }

    // ---- registry operations -------------------------------------------

    pub fn spawn_box(&mut self, pos: Vec2) -> Option<usize> {
        spawn::spawn_box(&mut self.registry, &mut self.physics, &self.scene, pos)
    }

    pub fn spawn_ball(&mut self, pos: Vec2) -> Option<usize> {
        spawn::spawn_ball(&mut self.registry, &mut self.physics, &self.scene, pos)
    }

    pub fn spawn_triangle(&mut self, pos: Vec2) -> Option<usize> {
        spawn::spawn_triangle(&mut self.registry, &mut self.physics, &self.scene, pos)
    }

    pub fn spawn_polygon(&mut self, center: Vec2, local_verts: &[Vec2]) -> Option<usize> {
        spawn::spawn_polygon(
            &mut self.registry,
            &mut self.physics,
            &self.scene,
            center,
            local_verts,
        )
    }

    pub fn spawn_quad_from_drag(&mut self, a: Vec2, b: Vec2) -> Option<usize> {
        spawn::spawn_quad_from_drag(&mut self.registry, &mut self.physics, &self.scene, a, b)
    }

    pub fn spawn_ball_from_drag(&mut self, a: Vec2, b: Vec2, perfect: bool) -> Option<usize> {
        spawn::spawn_ball_from_drag(
            &mut self.registry,
            &mut self.physics,
            &self.scene,
            a,
            b,
            perfect,
        )
    }

    pub fn spawn_triangle_from_drag(&mut self, a: Vec2, b: Vec2) -> Option<usize> {
        spawn::spawn_triangle_from_drag(&mut self.registry, &mut self.physics, &self.scene, a, b)
    }

    pub fn spawn_freeform(&mut self, stroke: &[Vec2]) -> Option<usize> {
        spawn::spawn_freeform(&mut self.registry, &mut self.physics, &self.scene, stroke)
    }

    /// Delete the body at `index`, cascading to its joints and cached
    /// per-body state.
    pub fn delete_body(&mut self, index: usize) {
        if let Some(record) = self.registry.bodies.get(index) {
            self.depths.forget(record.handle);
        }
        self.registry.delete(index, &mut self.physics);
    }

    /// Delete whatever body sits under `point`, if any.
    pub fn delete_body_at(&mut self, point: Vec2) {
        if let Some(index) = manipulation::pick_body(&self.registry, &self.physics, point) {
            self.delete_body(index);
        }
    }

    pub fn undo_last_spawn(&mut self) {
        self.registry.undo_last_spawn(&mut self.physics);
    }

    /// Indices of every body connected to `index` through live joints.
    pub fn linked_group(&self, index: usize) -> Vec<usize> {
        self.registry.linked_group(index, &self.physics)
    }

    /// Weld the bodies at two indices together, anchored at `world_anchor`.
    pub fn weld_bodies(&mut self, a: usize, b: usize, world_anchor: Vec2) -> bool {
        let (Some(ra), Some(rb)) = (self.registry.bodies.get(a), self.registry.bodies.get(b))
        else {
            return false;
        };
        let (ka, kb) = (ra.handle, rb.handle);
        joints::create_weld(&mut self.registry, &mut self.physics, ka, kb, world_anchor)
    }

    /// Attach `wheel` to `host` with a free-spinning joint at `world_anchor`.
    pub fn wheel_bodies(&mut self, host: usize, wheel: usize, world_anchor: Vec2) -> bool {
        let (Some(rh), Some(rw)) = (
            self.registry.bodies.get(host),
            self.registry.bodies.get(wheel),
        ) else {
            return false;
        };
        let (kh, kw) = (rh.handle, rw.handle);
        joints::create_wheel(&mut self.registry, &mut self.physics, kh, kw, world_anchor)
    }

    /// Uniformly flip all joints on the body at `index` between weld and
    /// wheel mode.
    pub fn toggle_wheel_mode(&mut self, index: usize) {
        joints::toggle_wheel_mode(&mut self.registry, &mut self.physics, index);
    }

    /// Toggle a semantic feature on the body at `index` and re-derive its
    /// surface parameters.
    pub fn toggle_feature(&mut self, index: usize, feature: Feature) {
        if self
            .registry
            .toggle_flag(index, feature, self.config.fracture_grace_ticks)
            .is_some()
        {
            crate::surface::apply(&self.registry.bodies[index], &mut self.physics);
        }
    }

    // ---- manipulation ---------------------------------------------------

    pub fn pick_body(&self, point: Vec2) -> Option<usize> {
        manipulation::pick_body(&self.registry, &self.physics, point)
    }

    /// Pointer press with the grab tool. `now` is host wall-clock seconds.
    pub fn pointer_pressed(&mut self, point: Vec2, now: f32) {
        self.manipulator
            .press(&mut self.registry, &mut self.physics, point, now);
    }

    pub fn pointer_moved(&mut self, point: Vec2, now: f32) {
        self.manipulator.moved(&mut self.physics, point, now);
    }

    pub fn pointer_released(&mut self) {
        self.manipulator.release(
            &mut self.registry,
            &mut self.physics,
            self.config.max_throw_speed,
        );
    }

    /// Weld-tool click at `point`; welds on the second picked body.
    pub fn weld_click(&mut self, point: Vec2) {
        if let Some(index) = manipulation::pick_body(&self.registry, &self.physics, point) {
            self.manipulator
                .weld_pick(&mut self.registry, &mut self.physics, index);
        }
    }

    pub fn rotate_selection(&mut self, delta_rad: f32, snap: bool) {
        manipulation::rotate_selection(&self.registry, &mut self.physics, delta_rad, snap);
    }

    /// Abandon any in-progress drag, selection rectangle or weld pick.
    pub fn cancel_interaction(&mut self) {
        self.manipulator.cancel();
    }

    pub fn selection_rect(&self) -> Option<(Vec2, Vec2)> {
        self.manipulator.selection_rect()
    }

    // ---- scene ----------------------------------------------------------

    pub fn scene_location(&self) -> SceneLocation {
        self.scene.location
    }

    /// Switch between land and water. The ground snaps on the next frame;
    /// stale buoyancy forces are dropped immediately.
    pub fn set_scene(&mut self, location: SceneLocation) {
        if self.scene.location == location {
            return;
        }
        self.scene.location = location;
        self.physics.reset_forces();
    }

    /// Remove every body and flatten all transient state.
    pub fn reset_scene(&mut self) {
        for index in (0..self.registry.bodies.len()).rev() {
            self.delete_body(index);
        }
        self.manipulator.cancel();
        self.wave.reset();
        self.depths.clear();
        self.debris.clear();
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.stepper.time_scale = scale.max(0.0);
    }

    pub fn time_scale(&self) -> f32 {
        self.stepper.time_scale
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.stepper.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.stepper.paused
    }

    /// Host-driven agitation of the water surface (clicks, key kicks).
    pub fn disturb_water(&mut self, x_px: f32, impulse: f32) {
        if self.scene.is_water() {
            self.wave.disturb(x_px, impulse);
        }
    }

    /// Host-driven splash at a point on the surface.
    pub fn splash_water(&mut self, at: Vec2, energy: f32) {
        if self.scene.is_water() && self.config.water_spray_enabled {
            self.debris.spawn_splash(&mut self.rng, at, energy);
        }
    }

    /// Local water-surface height at `x_px` (baseline outside water mode).
    pub fn water_height_at(&self, x_px: f32) -> f32 {
        self.wave.height_at(x_px)
    }

    // ---- views ----------------------------------------------------------

    pub fn body_snapshots(&self) -> Vec<BodySnapshot> {
        snapshot::bodies(&self.registry, &self.physics)
    }

    pub fn joint_snapshots(&self) -> Vec<JointSnapshot> {
        snapshot::joints(&self.registry, &self.physics)
    }

    pub fn wave_surface(&self) -> Vec<Vec2> {
        snapshot::wave_surface(&self.wave)
    }

    pub fn debris(&self) -> &DebrisField {
        &self.debris
    }

    pub fn body_count(&self) -> usize {
        self.registry.bodies.len()
    }

    pub fn joint_count(&self) -> usize {
        self.registry.joints.len()
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BASE_HALF_PX, FIXED_DT};
    use crate::physics::ImpactEvent;
    use crate::registry::JointKind;

    fn sandbox() -> Sandbox {
        Sandbox::new_seeded(1536.0, 960.0, SandboxConfig::default(), 7)
    }

    fn run_frames(sb: &mut Sandbox, frames: usize) {
        for _ in 0..frames {
            sb.update(FIXED_DT);
        }
    }

    #[test]
    fn test_box_settles_on_land_ground() {
        let mut sb = sandbox();
        let index = sb.spawn_box(Vec2::new(400.0, 60.0)).unwrap();
        let key = sb.registry.bodies[index].handle;

        run_frames(&mut sb, 2000);
        let rest_y = sb.scene.ground_top_y() - BASE_HALF_PX;
        let settled = sb.physics.position_px(key).unwrap();
        assert!(
            (settled.y - rest_y).abs() < 4.0,
            "box should rest on the ground line, got {settled:?} vs {rest_y}"
        );

        // No jitter afterwards.
        run_frames(&mut sb, 120);
        let after = sb.physics.position_px(key).unwrap();
        assert!((after - settled).length() < 2.0);
    }

    #[test]
    fn test_weld_then_delete_clears_joints() {
        let mut sb = sandbox();
        let a = sb.spawn_box(Vec2::new(300.0, 200.0)).unwrap();
        let b = sb.spawn_box(Vec2::new(380.0, 200.0)).unwrap();
        assert!(sb.weld_bodies(a, b, Vec2::new(340.0, 200.0)));
        assert_eq!(sb.joint_count(), 1);

        sb.delete_body(a);
        assert_eq!(sb.joint_count(), 0);
        assert_eq!(sb.body_count(), 1);
    }

    #[test]
    fn test_weld_rejects_self_and_invalid() {
        let mut sb = sandbox();
        let a = sb.spawn_box(Vec2::new(300.0, 200.0)).unwrap();
        assert!(!sb.weld_bodies(a, a, Vec2::new(300.0, 200.0)));
        assert!(!sb.weld_bodies(a, 99, Vec2::new(300.0, 200.0)));
        assert_eq!(sb.joint_count(), 0);
    }

    #[test]
    fn test_toggle_wheel_mode_is_involutive() {
        let mut sb = sandbox();
        let a = sb.spawn_box(Vec2::new(300.0, 200.0)).unwrap();
        let b = sb.spawn_ball(Vec2::new(380.0, 200.0)).unwrap();
        assert!(sb.weld_bodies(a, b, Vec2::new(340.0, 200.0)));

        sb.toggle_wheel_mode(b);
        assert_eq!(sb.joint_count(), 1);
        assert_eq!(sb.registry.joints[0].kind, JointKind::Wheel);

        sb.toggle_wheel_mode(b);
        assert_eq!(sb.joint_count(), 1);
        assert_eq!(sb.registry.joints[0].kind, JointKind::Weld);
    }

    #[test]
    fn test_toggle_wheel_mode_without_joints_is_noop() {
        let mut sb = sandbox();
        let a = sb.spawn_box(Vec2::new(300.0, 200.0)).unwrap();
        sb.toggle_wheel_mode(a);
        assert_eq!(sb.joint_count(), 0);
        assert!(!sb.registry.bodies[a].wheel_mode);
    }

    #[test]
    fn test_linked_group_is_closed_and_symmetric() {
        let mut sb = sandbox();
        let a = sb.spawn_box(Vec2::new(300.0, 200.0)).unwrap();
        let b = sb.spawn_box(Vec2::new(380.0, 200.0)).unwrap();
        let c = sb.spawn_ball(Vec2::new(460.0, 200.0)).unwrap();
        let lone = sb.spawn_box(Vec2::new(700.0, 200.0)).unwrap();
        sb.weld_bodies(a, b, Vec2::new(340.0, 200.0));
        sb.wheel_bodies(b, c, Vec2::new(460.0, 200.0));

        let mut from_a = sb.linked_group(a);
        let mut from_c = sb.linked_group(c);
        from_a.sort_unstable();
        from_c.sort_unstable();
        assert_eq!(from_a, vec![a, b, c]);
        assert_eq!(from_a, from_c);
        assert_eq!(sb.linked_group(lone), vec![lone]);
    }

    #[test]
    fn test_fragile_survives_grace_then_breaks_on_impact() {
        let mut sb = sandbox();
        let pane = sb.spawn_box(Vec2::new(300.0, 200.0)).unwrap();
        let hammer = sb.spawn_box(Vec2::new(600.0, 200.0)).unwrap();
        sb.toggle_feature(pane, Feature::Fragile);

        let pane_key = sb.registry.bodies[pane].handle;
        let hammer_key = sb.registry.bodies[hammer].handle;
        let smash = [ImpactEvent {
            body_a: pane_key,
            body_b: hammer_key,
            approach_speed: 1.0e5,
        }];

        // Grace window: the impact is ignored for 60 ticks.
        for tick in 1..=60 {
            let broken =
                crate::fracture::evaluate(&mut sb.registry, &sb.physics, &smash, FIXED_DT);
            assert!(broken.is_empty(), "broke during grace at tick {tick}");
        }

        // First post-grace tick with the same impact shatters it.
        let broken = crate::fracture::evaluate(&mut sb.registry, &sb.physics, &smash, FIXED_DT);
        assert_eq!(broken, vec![pane]);
    }

    #[test]
    fn test_shatter_removes_body_and_spawns_debris() {
        let mut sb = sandbox();
        let pane = sb.spawn_box(Vec2::new(300.0, 200.0)).unwrap();
        sb.spawn_box(Vec2::new(600.0, 200.0)).unwrap();
        sb.toggle_feature(pane, Feature::Fragile);
        sb.registry.bodies[pane].fracture =
            Some(FractureState::Active { stress: 1.0e9 });

        sb.update(FIXED_DT);
        assert_eq!(sb.body_count(), 1);
        assert!(!sb.debris().shards.is_empty());
    }

    #[test]
    fn test_drag_release_velocity_is_clamped_along_drag_direction() {
        let mut sb = sandbox();
        let index = sb.spawn_box(Vec2::new(400.0, 200.0)).unwrap();
        let key = sb.registry.bodies[index].handle;
        let center = sb.physics.position_px(key).unwrap();

        sb.pointer_pressed(center, 0.0);
        // 200 px in 50 ms is 80 m/s, far past the cap.
        sb.pointer_moved(center + Vec2::new(200.0, 0.0), 0.05);
        sb.pointer_released();

        let vel = *sb.physics.bodies.get(key).unwrap().linvel();
        let speed = (vel.x * vel.x + vel.y * vel.y).sqrt();
        assert!(
            (speed - sb.config.max_throw_speed).abs() < 1e-3,
            "speed {speed} should clamp to the throw cap"
        );
        assert!(vel.x > 0.0 && vel.y.abs() < 1e-3);
    }

    #[test]
    fn test_thrown_ball_spins_with_horizontal_velocity() {
        let mut sb = sandbox();
        let index = sb.spawn_ball(Vec2::new(400.0, 200.0)).unwrap();
        let key = sb.registry.bodies[index].handle;
        let center = sb.physics.position_px(key).unwrap();

        sb.pointer_pressed(center, 0.0);
        sb.pointer_moved(center + Vec2::new(50.0, 0.0), 0.1);
        sb.pointer_released();

        let body = sb.physics.bodies.get(key).unwrap();
        assert!(body.angvel() > 0.0);
    }

    #[test]
    fn test_pick_prefers_latest_spawn() {
        let mut sb = sandbox();
        sb.spawn_box(Vec2::new(400.0, 200.0)).unwrap();
        let top = sb.spawn_box(Vec2::new(400.0, 200.0)).unwrap();
        assert_eq!(sb.pick_body(Vec2::new(400.0, 200.0)), Some(top));
    }

    #[test]
    fn test_press_on_empty_space_starts_selection() {
        let mut sb = sandbox();
        sb.spawn_box(Vec2::new(200.0, 200.0)).unwrap();
        sb.spawn_box(Vec2::new(260.0, 200.0)).unwrap();

        sb.pointer_pressed(Vec2::new(600.0, 90.0), 0.0);
        assert!(sb.selection_rect().is_some());
        sb.pointer_moved(Vec2::new(100.0, 300.0), 0.1);
        sb.pointer_released();

        assert_eq!(sb.registry.selected_indices(&sb.physics).len(), 2);
    }

    #[test]
    fn test_undo_removes_only_last_spawn() {
        let mut sb = sandbox();
        let first = sb.spawn_box(Vec2::new(200.0, 200.0)).unwrap();
        let first_key = sb.registry.bodies[first].handle;
        sb.spawn_ball(Vec2::new(400.0, 200.0)).unwrap();

        sb.undo_last_spawn();
        assert_eq!(sb.body_count(), 1);
        assert_eq!(sb.registry.bodies[0].handle, first_key);

        sb.undo_last_spawn();
        assert_eq!(sb.body_count(), 0);
        // History exhausted: further undo is a no-op.
        sb.undo_last_spawn();
        assert_eq!(sb.body_count(), 0);
    }

    #[test]
    fn test_freeform_degenerate_stroke_rejected() {
        let mut sb = sandbox();
        let collinear: Vec<Vec2> = (0..10).map(|i| Vec2::new(i as f32 * 20.0, 100.0)).collect();
        assert!(sb.spawn_freeform(&collinear).is_none());
        assert_eq!(sb.body_count(), 0);
    }

    #[test]
    fn test_scene_switch_snaps_ground() {
        let mut sb = sandbox();
        sb.set_scene(SceneLocation::Water);
        sb.update(FIXED_DT);
        let ground = sb.physics.position_px(sb.physics.ground_handle()).unwrap();
        assert!((ground.y - 960.0 * 0.94).abs() < 1.0);
    }

    #[test]
    fn test_box_floats_in_water() {
        let mut sb = sandbox();
        sb.set_scene(SceneLocation::Water);
        let index = sb.spawn_box(Vec2::new(500.0, 400.0)).unwrap();
        let key = sb.registry.bodies[index].handle;

        run_frames(&mut sb, 1500);
        let pos = sb.physics.position_px(key).unwrap();
        let baseline = sb.scene.water_baseline_y();
        assert!(
            (pos.y - baseline).abs() < 120.0,
            "box should float near the water line, got {pos:?} vs baseline {baseline}"
        );
        assert!(pos.y < sb.scene.ground_top_y() - BASE_HALF_PX * 0.5);
    }

    #[test]
    fn test_reset_scene_clears_world() {
        let mut sb = sandbox();
        sb.set_scene(SceneLocation::Water);
        let a = sb.spawn_box(Vec2::new(300.0, 200.0)).unwrap();
        let b = sb.spawn_box(Vec2::new(380.0, 200.0)).unwrap();
        sb.weld_bodies(a, b, Vec2::new(340.0, 200.0));
        sb.disturb_water(400.0, 0.5);
        run_frames(&mut sb, 5);

        sb.reset_scene();
        assert_eq!(sb.body_count(), 0);
        assert_eq!(sb.joint_count(), 0);
        assert_eq!(sb.wave.total_displacement(), 0.0);
        assert!(sb.debris().shards.is_empty() && sb.debris().droplets.is_empty());
    }

    #[test]
    fn test_paused_sandbox_does_not_move_bodies() {
        let mut sb = sandbox();
        let index = sb.spawn_box(Vec2::new(400.0, 100.0)).unwrap();
        let key = sb.registry.bodies[index].handle;
        let before = sb.physics.position_px(key).unwrap();

        sb.set_paused(true);
        run_frames(&mut sb, 30);
        let after = sb.physics.position_px(key).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_snapshots_reflect_world() {
        let mut sb = sandbox();
        let a = sb.spawn_box(Vec2::new(300.0, 200.0)).unwrap();
        let b = sb.spawn_ball(Vec2::new(420.0, 200.0)).unwrap();
        sb.weld_bodies(a, b, Vec2::new(360.0, 200.0));

        let bodies = sb.body_snapshots();
        assert_eq!(bodies.len(), 2);
        let joints = sb.joint_snapshots();
        assert_eq!(joints.len(), 1);

        let surface = sb.wave_surface();
        assert_eq!(surface.len(), sb.wave.len());
    }
}
