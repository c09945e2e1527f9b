//! Ephemeral debris particles: glass shards and water droplets.
//!
//! Debris has no identity and never touches the physics engine; particles
//! are spawned by events, aged every frame and discarded at zero life or
//! out of bounds.

use bevy_math::Vec2;
use rand::Rng;

/// One short-lived particle in pixel space.
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub life: f32,
    pub max_life: f32,
}

impl Particle {
    /// Remaining life in `0.0..=1.0`, for fade-out rendering.
    pub fn life_fraction(&self) -> f32 {
        (self.life / self.max_life.max(0.001)).clamp(0.0, 1.0)
    }
}

struct AgingParams {
    gravity_px: f32,
    drag_x: f32,
    drag_y: f32,
}

const SHARD_AGING: AgingParams = AgingParams {
    gravity_px: 1700.0,
    drag_x: 0.94,
    drag_y: 0.96,
};

const DROPLET_AGING: AgingParams = AgingParams {
    gravity_px: 980.0,
    drag_x: 0.97,
    drag_y: 0.985,
};

fn age(particles: &mut Vec<Particle>, params: &AgingParams, dt: f32) {
    let frame_drag_x = params.drag_x.powf(dt * 60.0);
    let frame_drag_y = params.drag_y.powf(dt * 60.0);
    for p in particles.iter_mut() {
        p.life -= dt;
        p.vel.y += params.gravity_px * dt;
        p.vel.x *= frame_drag_x;
        p.vel.y *= frame_drag_y;
        p.pos += p.vel * dt;
    }
}

/// All live debris, split by kind because they age differently.
#[derive(Default)]
pub struct DebrisField {
    pub shards: Vec<Particle>,
    pub droplets: Vec<Particle>,
}

impl DebrisField {
    /// Age and cull every particle. Droplets only exist in the water
    /// scene; elsewhere they are dropped wholesale.
    pub fn update(&mut self, dt: f32, bounds: Vec2, water_active: bool) {
        age(&mut self.shards, &SHARD_AGING, dt);
        self.shards.retain(|p| p.life > 0.0);

        if !water_active {
            self.droplets.clear();
            return;
        }
        age(&mut self.droplets, &DROPLET_AGING, dt);
        self.droplets.retain(|p| {
            p.life > 0.0
                && p.pos.x > -80.0
                && p.pos.x < bounds.x + 80.0
                && p.pos.y < bounds.y + 120.0
        });
    }

    /// Burst of shards for a shattered body. Count and spread scale with
    /// footprint area; each shard inherits part of the parent velocity
    /// plus a randomized radial kick.
    pub fn spawn_shards(
        &mut self,
        rng: &mut impl Rng,
        center: Vec2,
        inherit_vel_px: Vec2,
        area_px2: f32,
    ) {
        let count = ((area_px2 / 800.0) as i32).clamp(14, 90);
        let spread = (area_px2.sqrt() * 0.09).clamp(6.0, 26.0);
        let base_radius = (area_px2.sqrt() * 0.02).max(1.0);

        for _ in 0..count {
            let angle = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = spread * (0.75 + rng.gen_range(0.0..1.0) * 0.6);
            let max_life = 0.45 + rng.gen_range(0.0..1.0) * 0.35;
            self.shards.push(Particle {
                pos: center,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed + inherit_vel_px * 0.45,
                radius: base_radius * (0.6 + rng.gen_range(0.0..1.0)),
                life: max_life,
                max_life,
            });
        }
    }

    /// Droplets thrown up when a body plunges into the surface. Velocities
    /// are in engine meters; droplet speeds come out in pixels.
    pub fn spawn_entry_splash(
        &mut self,
        rng: &mut impl Rng,
        center_x: f32,
        water_y: f32,
        vel_m: Vec2,
    ) {
        let count = ((4.0 + vel_m.y.abs() * 0.8) as i32).clamp(4, 18);
        let base_speed = 55.0 + vel_m.y.abs() * 18.0;
        for _ in 0..count {
            let angle = rng.gen_range(-80.0f32..=80.0).to_radians();
            let speed = base_speed * (0.55 + rng.gen_range(0.0..1.0) * 0.7);
            let max_life = 0.3 + rng.gen_range(0.0..1.0) * 0.45;
            self.droplets.push(Particle {
                pos: Vec2::new(
                    center_x + rng.gen_range(-20.0..=20.0),
                    water_y + rng.gen_range(-6.0..=4.0),
                ),
                vel: Vec2::new(
                    angle.cos() * speed + vel_m.x * 8.0,
                    angle.sin() * speed - vel_m.y.abs() * 6.0,
                ),
                radius: 1.4 + rng.gen_range(0.0..1.0) * 2.8,
                life: max_life,
                max_life,
            });
        }
    }

    /// Free-standing splash at a point, e.g. from host-driven agitation.
    pub fn spawn_splash(&mut self, rng: &mut impl Rng, at: Vec2, energy: f32) {
        let count = ((5.0 + energy * 35.0) as i32).clamp(5, 24);
        for _ in 0..count {
            let angle = rng.gen_range(-85.0f32..=85.0).to_radians();
            let speed = (80.0 + energy * 180.0) * (0.5 + rng.gen_range(0.0..1.0) * 0.8);
            let max_life = 0.26 + rng.gen_range(0.0..1.0) * 0.5;
            self.droplets.push(Particle {
                pos: at + Vec2::new(rng.gen_range(-16.0..=16.0), rng.gen_range(-4.0..=4.0)),
                vel: Vec2::new(angle.cos() * speed, angle.sin() * speed - speed * 0.15),
                radius: 1.2 + rng.gen_range(0.0..1.0) * 3.0,
                life: max_life,
                max_life,
            });
        }
    }

    pub fn clear(&mut self) {
        self.shards.clear();
        self.droplets.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_shard_batch_size_scales_with_area_within_bounds() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut debris = DebrisField::default();
        debris.spawn_shards(&mut rng, Vec2::ZERO, Vec2::ZERO, 100.0);
        let small = debris.shards.len();
        debris.clear();
        debris.spawn_shards(&mut rng, Vec2::ZERO, Vec2::ZERO, 1.0e9);
        let huge = debris.shards.len();
        assert_eq!(small, 14);
        assert_eq!(huge, 90);
    }

    #[test]
    fn test_particles_die_after_max_life() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut debris = DebrisField::default();
        debris.spawn_shards(&mut rng, Vec2::ZERO, Vec2::ZERO, 5000.0);
        assert!(!debris.shards.is_empty());
        for _ in 0..120 {
            debris.update(1.0 / 60.0, Vec2::new(1000.0, 1000.0), false);
        }
        assert!(debris.shards.is_empty());
    }

    #[test]
    fn test_droplets_cleared_outside_water_scene() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut debris = DebrisField::default();
        debris.spawn_splash(&mut rng, Vec2::new(100.0, 100.0), 0.5);
        assert!(!debris.droplets.is_empty());
        debris.update(1.0 / 60.0, Vec2::new(1000.0, 1000.0), false);
        assert!(debris.droplets.is_empty());
    }

    #[test]
    fn test_life_fraction_monotonic() {
        let mut p = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            radius: 2.0,
            life: 1.0,
            max_life: 1.0,
        };
        assert_eq!(p.life_fraction(), 1.0);
        p.life = 0.25;
        assert!((p.life_fraction() - 0.25).abs() < 1e-6);
    }
}
