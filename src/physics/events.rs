//! Collection of engine impact events.
//!
//! Rapier reports strong contacts as force events during the step. The
//! collector turns them into [`ImpactEvent`]s carrying an approach speed,
//! reconstructed from the pre-step velocities of the two bodies projected
//! on the reported contact normal.

use std::collections::HashMap;
use std::sync::Mutex;

use rapier2d::geometry::ContactPair;
use rapier2d::math::{Real, Vector};
use rapier2d::prelude::{
    CollisionEvent, ColliderSet, EventHandler, RigidBodyHandle, RigidBodySet,
};

/// A high-energy collision reported by the engine for one fixed step.
#[derive(Debug, Clone, Copy)]
pub struct ImpactEvent {
    pub body_a: RigidBodyHandle,
    pub body_b: RigidBodyHandle,
    /// Closing speed along the contact normal just before the step, m/s.
    pub approach_speed: f32,
}

#[derive(Debug, Clone, Copy)]
struct RawContact {
    body_a: RigidBodyHandle,
    body_b: RigidBodyHandle,
    normal: Vector<Real>,
}

/// Accumulates force events raised by one `PhysicsPipeline::step`.
///
/// Rapier invokes the handler through a shared reference, hence the mutex;
/// the simulation itself is single-threaded so it is never contended.
#[derive(Default)]
pub struct ForceEventCollector {
    raw: Mutex<Vec<RawContact>>,
}

impl ForceEventCollector {
    /// Resolve the step's raw contacts into impact events using the
    /// velocities snapshotted before the step.
    pub fn drain(
        &self,
        prev_linvel: &HashMap<RigidBodyHandle, Vector<Real>>,
    ) -> Vec<ImpactEvent> {
        let mut raw = match self.raw.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        raw.drain(..)
            .filter_map(|contact| {
                let va = prev_linvel.get(&contact.body_a).copied()?;
                let vb = prev_linvel.get(&contact.body_b).copied()?;
                let approach = (va - vb).dot(&contact.normal);
                (approach > 0.0).then_some(ImpactEvent {
                    body_a: contact.body_a,
                    body_b: contact.body_b,
                    approach_speed: approach,
                })
            })
            .collect()
    }

    pub fn clear(&self) {
        if let Ok(mut raw) = self.raw.lock() {
            raw.clear();
        }
    }
}

impl EventHandler for ForceEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        colliders: &ColliderSet,
        contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
        let (Some(c1), Some(c2)) = (
            colliders.get(contact_pair.collider1),
            colliders.get(contact_pair.collider2),
        ) else {
            return;
        };
        let (Some(body_a), Some(body_b)) = (c1.parent(), c2.parent()) else {
            return;
        };
        let Some(normal) = contact_pair.manifolds.first().map(|m| m.data.normal) else {
            return;
        };
        if let Ok(mut raw) = self.raw.lock() {
            raw.push(RawContact {
                body_a,
                body_b,
                normal,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn test_drain_keeps_only_approaching_contacts() {
        let collector = ForceEventCollector::default();
        let a = RigidBodyHandle::from_raw_parts(0, 0);
        let b = RigidBodyHandle::from_raw_parts(1, 0);
        {
            let mut raw = collector.raw.lock().unwrap();
            // a moving toward b along +x, and the reverse (separating).
            raw.push(RawContact {
                body_a: a,
                body_b: b,
                normal: vector![1.0, 0.0],
            });
            raw.push(RawContact {
                body_a: b,
                body_b: a,
                normal: vector![1.0, 0.0],
            });
        }
        let mut prev = HashMap::new();
        prev.insert(a, vector![5.0, 0.0]);
        prev.insert(b, vector![0.0, 0.0]);

        let events = collector.drain(&prev);
        assert_eq!(events.len(), 1);
        assert!((events[0].approach_speed - 5.0).abs() < 1e-6);
        assert_eq!(events[0].body_a, a);
    }
}
