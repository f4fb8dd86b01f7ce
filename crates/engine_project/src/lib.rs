//! # engine_project
//!
//! Persistence for the scene editor runtime.
//!
//! - [`snapshot`] / [`restore`] move the persisted components (position,
//!   name, mesh) between a [`World`](engine_world::World) and a
//!   [`ProjectDocument`].
//! - [`Catalog`] keeps every saved project in a [`KeyValueStore`].
//! - [`export_to_file`] / [`import_from_file`] handle standalone files.

pub mod catalog;
pub mod document;
pub mod error;
pub mod file;
pub mod snapshot;
pub mod storage;

pub use catalog::Catalog;
pub use document::{EntityRecord, ProjectDocument, SavedProject};
pub use error::{DocumentError, ProjectError};
pub use file::{export_to_file, import_from_file, import_from_str};
pub use snapshot::{new_project, restore, snapshot};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageConfig};
