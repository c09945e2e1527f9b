//! Scene modes and derived geometry (ground line, water baseline).

use bevy_math::Vec2;
use serde::{Deserialize, Serialize};

use crate::constants::GROUND_HALF_THICKNESS_PX;

/// Which backdrop the sandbox is running in. `Water` activates the wave
/// field and buoyancy coupling and lowers the ground line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneLocation {
    Land,
    Water,
}

/// Scene extents plus the active mode. Ground and baseline positions are
/// derived fractions of the scene height so mode switches are instant.
#[derive(Debug, Clone, Copy)]
pub struct Scene {
    pub location: SceneLocation,
    pub width_px: f32,
    pub height_px: f32,
}

impl Scene {
    pub fn new(width_px: f32, height_px: f32) -> Self {
        Self {
            location: SceneLocation::Land,
            width_px,
            height_px,
        }
    }

    pub fn is_water(&self) -> bool {
        self.location == SceneLocation::Water
    }

    /// Center line of the ground slab for the active mode.
    pub fn ground_center_y(&self) -> f32 {
        match self.location {
            SceneLocation::Land => self.height_px * 0.74,
            SceneLocation::Water => self.height_px * 0.94,
        }
    }

    /// Top surface of the ground slab for the active mode.
    pub fn ground_top_y(&self) -> f32 {
        self.ground_center_y() - GROUND_HALF_THICKNESS_PX
    }

    /// Resting water line, in pixels from the top of the scene.
    pub fn water_baseline_y(&self) -> f32 {
        self.height_px * 0.58
    }

    pub fn bounds(&self) -> Vec2 {
        Vec2::new(self.width_px, self.height_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_water_ground_sits_lower() {
        let mut scene = Scene::new(1536.0, 960.0);
        let land = scene.ground_top_y();
        scene.location = SceneLocation::Water;
        assert!(scene.ground_top_y() > land);
    }
}
