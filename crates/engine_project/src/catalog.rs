//! The save catalog: every saved project, kept as one JSON array under a
//! single storage key. The whole catalog is read on every access and
//! rewritten on every change.

use std::time::{SystemTime, UNIX_EPOCH};

use engine_world::World;
use tracing::{info, warn};
use uuid::Uuid;

use crate::document::{ProjectDocument, SavedProject};
use crate::error::ProjectError;
use crate::snapshot::{restore, snapshot};
use crate::storage::KeyValueStore;

/// Storage key the catalog lives under.
pub const CATALOG_KEY: &str = "projects";

/// Saved projects on top of a [`KeyValueStore`].
#[derive(Debug)]
pub struct Catalog<S> {
    store: S,
}

impl<S: KeyValueStore> Catalog<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Every saved project, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or parsed.
    pub fn list_saved(&self) -> Result<Vec<SavedProject>, ProjectError> {
        let mut docs = self.read_all()?;
        docs.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(docs.iter().map(ProjectDocument::summary).collect())
    }

    /// Snapshot `world` under a fresh save-slot id and store it.
    ///
    /// Returns the stored document so the caller can also export it.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or written.
    pub fn save_named(&mut self, world: &World, name: &str) -> Result<ProjectDocument, ProjectError> {
        let mut doc = snapshot(world, name);
        doc.id = Uuid::new_v4().to_string();
        doc.updated_at = now_millis();
        self.save_document(doc.clone())?;
        info!(id = %doc.id, name, entities = doc.entities.len(), "project saved");
        Ok(doc)
    }

    /// Put `doc` at the front of the catalog, replacing any entry with the
    /// same id. The document is stored as given.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or written.
    pub fn save_document(&mut self, doc: ProjectDocument) -> Result<(), ProjectError> {
        let mut docs = self.read_all()?;
        docs.retain(|d| d.id != doc.id);
        docs.insert(0, doc);
        self.write_all(&docs)
    }

    /// Look up a saved project.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or parsed.
    pub fn get(&self, id: &str) -> Result<Option<ProjectDocument>, ProjectError> {
        Ok(self.read_all()?.into_iter().find(|d| d.id == id))
    }

    /// Restore the saved project `id` into `world`.
    ///
    /// Returns `Ok(false)` without touching the world if no such project is
    /// saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or the stored
    /// document is invalid.
    pub fn load_by_id(&self, world: &mut World, id: &str) -> Result<bool, ProjectError> {
        let Some(doc) = self.get(id)? else {
            warn!(id, "no saved project with this id");
            return Ok(false);
        };
        restore(world, &doc)?;
        Ok(true)
    }

    /// Remove a saved project. Returns `Ok(false)` if it was not there.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or written.
    pub fn delete_by_id(&mut self, id: &str) -> Result<bool, ProjectError> {
        let mut docs = self.read_all()?;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() == before {
            return Ok(false);
        }
        self.write_all(&docs)?;
        info!(id, "project deleted");
        Ok(true)
    }

    fn read_all(&self) -> Result<Vec<ProjectDocument>, ProjectError> {
        match self.store.read(CATALOG_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(ProjectError::Parse),
            None => Ok(Vec::new()),
        }
    }

    fn write_all(&mut self, docs: &[ProjectDocument]) -> Result<(), ProjectError> {
        let raw = serde_json::to_string(docs).map_err(ProjectError::Serialize)?;
        self.store.write(CATALOG_KEY, &raw)
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
}
