//! Mapping from semantic feature flags to physical surface parameters.
//!
//! The mapping is a pure function so it can be tested in isolation; the
//! apply step pushes the result into every collider of the body plus its
//! damping. Flags are evaluated slippery, then sticky, then bouncy, each
//! only pushing values further toward its own extreme, so sticky wins the
//! friction channel when both are set.
//!
//! When two bodies touch, the engine combines their materials with max
//! friction and min restitution (configured per collider at spawn), which
//! gives sticky and bouncy surfaces dominance in the direction players
//! expect.

use crate::constants::ROLLING_RESISTANCE_TO_DAMPING;
use crate::physics::PhysicsWorld;
use crate::registry::{BodyRecord, FeatureFlags, ShapeKind};

/// Physical surface values derived from feature flags.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceParams {
    pub friction: f32,
    pub restitution: f32,
    pub rolling_resistance: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

/// Derive surface parameters for a shape kind and flag set.
pub fn surface_params(kind: ShapeKind, flags: FeatureFlags) -> SurfaceParams {
    let mut friction: f32 = if kind == ShapeKind::Ball { 0.95 } else { 1.6 };
    let mut restitution: f32 = 0.0;
    let mut rolling: f32 = 0.0;

    if flags.slippery {
        friction = friction.min(0.015);
        rolling = 0.0;
    }
    if flags.sticky {
        friction = friction.max(3.2);
        rolling = rolling.max(0.02f32);
    }
    if flags.bouncy {
        restitution = restitution.max(0.78f32);
    }

    let mut linear_damping: f32 = 0.08;
    let mut angular_damping: f32 = if kind == ShapeKind::Ball { 0.03 } else { 1.2 };
    if flags.slippery {
        linear_damping = 0.015;
        angular_damping = angular_damping.min(0.05);
    }
    if flags.sticky {
        linear_damping = linear_damping.max(0.09f32);
        angular_damping = angular_damping.max(1.0);
    }
    if flags.bouncy {
        linear_damping = linear_damping.min(0.03);
    }

    SurfaceParams {
        friction,
        restitution,
        rolling_resistance: rolling,
        linear_damping,
        angular_damping,
    }
}

/// Re-apply the derived surface to every shape on the body and to its
/// damping. The engine has no rolling-resistance channel, so the rolling
/// term contributes extra angular damping instead.
pub fn apply(record: &BodyRecord, physics: &mut PhysicsWorld) {
    let params = surface_params(record.kind, record.flags);
    let Some(body) = physics.bodies.get_mut(record.handle) else {
        return;
    };
    body.set_linear_damping(params.linear_damping);
    body.set_angular_damping(
        params.angular_damping + params.rolling_resistance * ROLLING_RESISTANCE_TO_DAMPING,
    );
    let shapes: Vec<_> = body.colliders().to_vec();
    for handle in shapes {
        if let Some(collider) = physics.colliders.get_mut(handle) {
            collider.set_friction(params.friction);
            collider.set_restitution(params.restitution);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(bouncy: bool, slippery: bool, sticky: bool) -> FeatureFlags {
        FeatureFlags {
            bouncy,
            slippery,
            sticky,
            fragile: false,
        }
    }

    #[test]
    fn test_baseline_depends_on_shape_kind() {
        let ball = surface_params(ShapeKind::Ball, FeatureFlags::default());
        let poly = surface_params(ShapeKind::Box, FeatureFlags::default());
        assert!(ball.friction < poly.friction);
        assert!(ball.angular_damping < poly.angular_damping);
        assert_eq!(ball.restitution, 0.0);
    }

    #[test]
    fn test_slippery_floors_friction() {
        let p = surface_params(ShapeKind::Box, flags(false, true, false));
        assert!(p.friction <= 0.015);
        assert_eq!(p.rolling_resistance, 0.0);
        assert!(p.linear_damping <= 0.015);
    }

    #[test]
    fn test_sticky_wins_over_slippery() {
        let p = surface_params(ShapeKind::Box, flags(false, true, true));
        assert!(p.friction >= 3.2);
        assert!(p.rolling_resistance > 0.0);
    }

    #[test]
    fn test_bouncy_raises_restitution_only() {
        let p = surface_params(ShapeKind::Ball, flags(true, false, false));
        assert!(p.restitution >= 0.78);
        let base = surface_params(ShapeKind::Ball, FeatureFlags::default());
        assert_eq!(p.friction, base.friction);
        assert!(p.linear_damping <= base.linear_damping);
    }

    #[test]
    fn test_flags_never_revert_each_other() {
        // With every flag set, each channel sits at the extreme of the flag
        // that owns it.
        let p = surface_params(ShapeKind::Box, flags(true, true, true));
        assert!(p.friction >= 3.2);
        assert!(p.restitution >= 0.78);
    }
}
