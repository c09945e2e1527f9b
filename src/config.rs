//! Runtime configuration for the sandbox core.

use serde::{Deserialize, Serialize};

use crate::constants;

/// Host-tunable parameters, applied once at construction.
///
/// Values the host does not care about come from [`Default`], which mirrors
/// the documented constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Gravity in m/s². Positive is downward (screen-space +y).
    pub gravity: f32,
    /// Duration of one fixed simulation step, in seconds.
    pub fixed_dt: f32,
    /// Release velocity of dragged bodies is clamped to this, in m/s.
    pub max_throw_speed: f32,
    /// Whether splash debris is emitted on water entry.
    pub water_spray_enabled: bool,
    /// Contact force magnitude above which the engine reports impact events.
    pub impact_force_threshold: f32,
    /// Grace ticks granted when a body is toggled fragile.
    pub fracture_grace_ticks: u32,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            gravity: 18.0,
            fixed_dt: constants::FIXED_DT,
            max_throw_speed: 30.0,
            water_spray_enabled: true,
            impact_force_threshold: 40.0,
            fracture_grace_ticks: constants::fracture::GRACE_TICKS,
        }
    }
}

impl SandboxConfig {
    /// Override the throw-speed cap.
    pub fn with_max_throw_speed(mut self, speed: f32) -> Self {
        self.max_throw_speed = speed.max(0.0);
        self
    }

    /// Enable or disable splash debris.
    pub fn with_water_spray(mut self, enabled: bool) -> Self {
        self.water_spray_enabled = enabled;
        self
    }
}
