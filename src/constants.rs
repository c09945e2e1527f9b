//! Tuning constants shared across the simulation.
//!
//! World space is screen-like: y grows downward and 50 pixels equal one
//! meter, so gravity points toward +y and buoyancy toward -y.

/// Pixels per simulation meter.
pub const PIXELS_PER_METER: f32 = 50.0;
/// Inverse of [`PIXELS_PER_METER`].
pub const INV_PIXELS_PER_METER: f32 = 1.0 / PIXELS_PER_METER;

/// Edge length of the default spawned shapes, in pixels.
pub const BASE_SIZE_PX: f32 = 56.0;
/// Half of [`BASE_SIZE_PX`].
pub const BASE_HALF_PX: f32 = BASE_SIZE_PX * 0.5;

/// Half thickness of the static ground slab, in pixels.
pub const GROUND_HALF_THICKNESS_PX: f32 = 24.0;
/// Ground is re-snapped when the active ground line moved further than this.
pub const GROUND_SNAP_EPSILON_PX: f32 = 0.5;

/// Keep-out margin when clamping spawn positions to the scene, in pixels.
pub const SPAWN_MARGIN_PX: f32 = 4.0;

/// Spawn history is truncated in bulk once it grows past this many entries.
pub const SPAWN_HISTORY_CAP: usize = 4096;
/// Number of oldest entries evicted when the cap is exceeded.
pub const SPAWN_HISTORY_EVICT: usize = 2048;

/// Fixed simulation step released by the scheduler.
pub const FIXED_DT: f32 = 1.0 / 55.0;
/// At most one fixed step per displayed frame; excess time is dropped.
pub const MAX_STEPS_PER_FRAME: usize = 1;

/// Wave field tuning.
pub mod wave {
    /// Horizontal spacing between surface samples, in pixels.
    pub const STEP_PX: f32 = 8.0;
    /// Spring restoration toward the baseline.
    pub const SPRING: f32 = 27.0;
    /// Velocity damping of each sample.
    pub const DAMPING: f32 = 0.038;
    /// Fraction of the neighbour displacement difference exchanged per pass.
    pub const SPREAD: f32 = 0.28;
    /// Neighbour-coupling passes per update; more passes propagate further.
    pub const PASSES: usize = 6;
    /// Half width, in samples, of the `disturb` impulse window.
    pub const DISTURB_WINDOW: i32 = 3;
}

/// Fracture model tuning.
pub mod fracture {
    /// Ticks after arming during which stress cannot accumulate.
    pub const GRACE_TICKS: u32 = 60;
    /// Linear stress decay per second.
    pub const DECAY_PER_SECOND: f32 = 10.0;
    /// Contact impulses below this are ignored.
    pub const IMPULSE_DEAD_ZONE: f32 = 0.85;
    /// Scale from surviving contact impulse to stress per tick.
    pub const IMPULSE_SCALE: f32 = 0.75;
    /// A resting body only counts as load once it outweighs the pane by this.
    pub const LOAD_MASS_MARGIN: f32 = 2.2;
    /// Scale from excess resting mass to stress per second.
    pub const LOAD_SCALE: f32 = 4.0;
    /// Scale applied to `approach speed x impacting mass` impact stress.
    pub const IMPACT_SCALE: f32 = 0.9;
    /// Other bodies must sit at least this many pixels above to count as load.
    pub const LOAD_ABOVE_PX: f32 = 4.0;
}

/// Buoyancy coupling tuning. Forces are in meter space, debris in pixels.
pub mod buoyancy {
    /// Base upward acceleration multiplier applied per unit mass.
    pub const LIFT: f32 = 24.0;
    /// Depth-independent part of the lift curve.
    pub const LIFT_FLOOR: f32 = 0.72;
    /// Depth-proportional part of the lift curve.
    pub const LIFT_DEPTH: f32 = 0.78;
    /// Submersion depth is clamped to this many body spans.
    pub const MAX_DEPTH: f32 = 1.25;
    /// Horizontal velocity damping per second per unit depth.
    pub const DAMP_X: f32 = 0.45;
    /// Vertical velocity damping per second per unit depth.
    pub const DAMP_Y: f32 = 0.65;
    /// Angular velocity damping per second per unit depth.
    pub const DAMP_ANGULAR: f32 = 0.6;
    /// Wake impulse per m/s of downward body speed.
    pub const WAKE_IMPULSE: f32 = 0.055;
    /// One wake sample per this many pixels of body width.
    pub const WAKE_SAMPLE_SPACING_PX: f32 = 30.0;
    /// Depth increase in one tick that counts as a plunge.
    pub const SPLASH_DEPTH_DELTA: f32 = 0.18;
    /// Vertical speed (m/s) required for an entry splash.
    pub const SPLASH_ENTRY_SPEED: f32 = 3.0;
}

/// Surface model: rapier has no rolling-resistance channel, so the rolling
/// term is folded into angular damping with this scale.
pub const ROLLING_RESISTANCE_TO_DAMPING: f32 = 10.0;
