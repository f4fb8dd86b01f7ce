//! # engine_script
//!
//! Sandboxed per-entity scripting. Scripts are Rhai source snippets that run
//! once per tick with a capability-scoped view of the world: the entity id,
//! the tick delta, and a handle to the transform store. Nothing else from the
//! host is reachable.
//!
//! ```rust
//! use engine_component::{ComponentStore, Entity};
//! use engine_math::Transform;
//! use engine_script::{ScriptEngine, TransformsHandle};
//!
//! let mut store = ComponentStore::new();
//! store.set(Entity::from_raw(1), Transform::IDENTITY);
//! let transforms = TransformsHandle::new(store);
//!
//! let mut engine = ScriptEngine::default();
//! engine
//!     .run("transforms.translate(entity_id, delta, 0.0, 0.0);", Entity::from_raw(1), 1.0, &transforms)
//!     .unwrap();
//! ```

pub mod api;
pub mod config;
pub mod engine;
pub mod error;

pub use api::TransformsHandle;
pub use config::ScriptConfig;
pub use engine::ScriptEngine;
pub use error::ScriptError;
