//! # engine_world
//!
//! The simulation half of the scene editor runtime: the [`World`] that owns
//! every component store, the built-in systems, and the [`Scheduler`] that
//! runs them once per frame.
//!
//! ```rust
//! use engine_math::{Transform, Vec3};
//! use engine_world::components::Velocity;
//! use engine_world::{InputState, Scheduler, World};
//!
//! let mut world = World::new();
//! let cube = world.create_entity();
//! world.insert(cube, Transform::IDENTITY).unwrap();
//! world.insert(cube, Velocity::new(1.0, 0.0, 0.0)).unwrap();
//!
//! let mut scheduler = Scheduler::default();
//! scheduler.tick(&mut world, &InputState::new(), 2.0);
//!
//! assert_eq!(world.get::<Transform>(cube).unwrap().position, Vec3::new(2.0, 0.0, 0.0));
//! ```

pub mod components;
pub mod config;
pub mod error;
pub mod input;
pub mod scheduler;
pub mod systems;
pub mod world;

pub use config::SimulationConfig;
pub use error::WorldError;
pub use input::{InputState, Key};
pub use scheduler::{FrameClock, PlayState, Scheduler, TickReport};
pub use world::{HasStore, World};
