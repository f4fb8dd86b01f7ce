//! # engine_component
//!
//! Entity identity and component storage for the scene editor runtime.
//!
//! - [`Entity`]: a plain `u64` id.
//! - [`EntityRegistry`]: monotonic id allocation plus the live set.
//! - [`Component`]: the trait every attachable data type implements.
//! - [`ComponentStore`]: one sparse, ordered map per component type.

pub mod component;
pub mod entity;
pub mod store;

pub use component::Component;
pub use entity::{Entity, EntityRegistry};
pub use store::ComponentStore;
