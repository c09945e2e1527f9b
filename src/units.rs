//! Conversions between pixel-space game geometry and engine-space math.
//!
//! Game logic works in `bevy_math::Vec2` pixels; the physics engine works in
//! nalgebra meters. Keeping the conversion in one place avoids unit mix-ups.

use bevy_math::Vec2;
use nalgebra::{point, vector};
use rapier2d::math::{Point, Real, Vector};

use crate::constants::{INV_PIXELS_PER_METER, PIXELS_PER_METER};

/// Pixel vector to engine meters.
pub fn vec_to_meters(v: Vec2) -> Vector<Real> {
    vector![v.x * INV_PIXELS_PER_METER, v.y * INV_PIXELS_PER_METER]
}

/// Pixel point to engine meters.
pub fn point_to_meters(p: Vec2) -> Point<Real> {
    point![p.x * INV_PIXELS_PER_METER, p.y * INV_PIXELS_PER_METER]
}

/// Engine vector to pixels.
pub fn vec_to_pixels(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x * PIXELS_PER_METER, v.y * PIXELS_PER_METER)
}

/// Engine point to pixels.
pub fn point_to_pixels(p: &Point<Real>) -> Vec2 {
    Vec2::new(p.x * PIXELS_PER_METER, p.y * PIXELS_PER_METER)
}

/// Scalar pixels to meters.
pub fn px_to_m(px: f32) -> f32 {
    px * INV_PIXELS_PER_METER
}

/// Scalar meters to pixels.
pub fn m_to_px(m: f32) -> f32 {
    m * PIXELS_PER_METER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let p = Vec2::new(123.0, -48.5);
        let back = point_to_pixels(&point_to_meters(p));
        assert!((back - p).length() < 1e-3);
    }

    #[test]
    fn test_scale() {
        assert!((px_to_m(50.0) - 1.0).abs() < 1e-6);
        assert!((m_to_px(2.0) - 100.0).abs() < 1e-6);
    }
}
