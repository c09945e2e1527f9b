//! Core simulation layer for an interactive 2-D physics sandbox.
//!
//! Users spawn rigid shapes, connect them with weld/wheel constraints, tag
//! them with behavioral materials (bouncy, slippery, sticky, fragile) and
//! drag, rotate or break them. Rigid-body dynamics are delegated to the
//! rapier engine; this crate owns everything between the engine and the
//! user: entity/constraint bookkeeping, surface materials derived from
//! feature flags, a 1-D wave field with two-way buoyancy coupling, a
//! stress-accumulation fracture model, manipulation with correct velocity
//! semantics, and a fixed-step scheduler.
//!
//! The host application (window, input, renderer) constructs one
//! [`Sandbox`], forwards pointer/tool input to it and calls
//! [`Sandbox::update`] once per displayed frame, then draws from the
//! snapshot views. The crate performs no I/O and never calls back into the
//! host.

pub mod config;
pub mod constants;
pub mod debris;
pub mod fracture;
pub mod manipulation;
pub mod physics;
pub mod registry;
pub mod sandbox;
pub mod scene;
pub mod snapshot;
pub mod stepper;
pub mod surface;
pub mod units;
pub mod water;

pub use config::SandboxConfig;
pub use debris::Particle;
pub use registry::{Feature, FeatureFlags, JointKind, ShapeKind};
pub use sandbox::Sandbox;
pub use scene::SceneLocation;
pub use snapshot::{BodySnapshot, JointSnapshot, ShapeSnapshot};
