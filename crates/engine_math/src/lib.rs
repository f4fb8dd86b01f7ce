//! # engine_math
//!
//! Math types for the scene editor runtime. Re-exports [`glam`] for linear
//! algebra and defines the [`Transform`] component, which implements
//! [`Component`](engine_component::Component).

pub mod transform;

// Re-export glam types for convenience.
pub use glam::Vec3;

pub use transform::Transform;
