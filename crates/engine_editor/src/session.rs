//! Editor session: the state a UI drives.
//!
//! An [`EditorSession`] owns the world, the scheduler, the input state, and
//! the save catalog. A host calls [`EditorSession::frame`] once per rendered
//! frame; the world only advances while the session is playing.

use std::path::Path;
use std::time::Instant;

use engine_component::Entity;
use engine_math::{Transform, Vec3};
use engine_project::{Catalog, KeyValueStore, ProjectDocument, SavedProject};
use engine_world::components::{Geometry, Mesh, Name, PlayerControlled, Script, Velocity};
use engine_world::{
    FrameClock, HasStore, InputState, PlayState, Scheduler, SimulationConfig, TickReport, World,
};
use tracing::{debug, info, warn};

use crate::error::EditorError;

/// Spacing between consecutively added entities along `x`.
const SPAWN_STEP: f32 = 2.0;

/// Color given to entities added from the toolbar.
pub const SPAWN_COLOR: &str = "white";

pub struct EditorSession<S> {
    world: World,
    scheduler: Scheduler,
    input: InputState,
    clock: FrameClock,
    state: PlayState,
    catalog: Catalog<S>,
    last_spawn: Vec3,
    selected: Option<Entity>,
}

impl<S: KeyValueStore> EditorSession<S> {
    #[must_use]
    pub fn new(config: SimulationConfig, catalog: Catalog<S>) -> Self {
        let clock = FrameClock::new(config.max_frame_delta);
        Self {
            world: World::new(),
            scheduler: Scheduler::new(config),
            input: InputState::new(),
            clock,
            state: PlayState::Stopped,
            catalog,
            last_spawn: Vec3::new(-SPAWN_STEP, 0.0, 0.0),
            selected: None,
        }
    }

    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog<S> {
        &self.catalog
    }

    #[must_use]
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    // -- Play / stop --

    #[must_use]
    pub fn play_state(&self) -> PlayState {
        self.state
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    /// Start ticking. The first frame after this has a zero delta.
    pub fn play(&mut self) {
        if self.is_playing() {
            return;
        }
        self.state = PlayState::Playing;
        self.clock.reset();
        self.prepare_selected();
        info!(tick_id = self.scheduler.tick_id(), "play");
    }

    /// Stop ticking. The world is left exactly as the last tick wrote it.
    pub fn stop(&mut self) {
        if !self.is_playing() {
            return;
        }
        self.state = PlayState::Stopped;
        self.clock.reset();
        self.input.clear();
        info!(tick_id = self.scheduler.tick_id(), "stop");
    }

    pub fn toggle_play(&mut self) {
        if self.is_playing() {
            self.stop();
        } else {
            self.play();
        }
    }

    /// Per-frame hook. Ticks with the wall-clock delta while playing.
    pub fn frame(&mut self, now: Instant) -> Option<TickReport> {
        if !self.is_playing() {
            return None;
        }
        let delta = self.clock.advance(now);
        Some(self.scheduler.tick(&mut self.world, &self.input, delta))
    }

    /// Tick with a caller-chosen delta while playing.
    pub fn step(&mut self, delta: f64) -> Option<TickReport> {
        if !self.is_playing() {
            return None;
        }
        Some(self.scheduler.tick(&mut self.world, &self.input, delta))
    }

    // -- Entities --

    /// Add an entity of the given shape, two units along `x` from the
    /// previously added one.
    pub fn add_entity(&mut self, geometry: Geometry) -> Entity {
        let position = Vec3::new(self.last_spawn.x + SPAWN_STEP, 0.0, self.last_spawn.z);
        self.last_spawn = position;

        let entity = self.world.create_entity();
        HasStore::<Name>::store_mut(&mut self.world).set(entity, Name::new(geometry.as_str()));
        HasStore::<Transform>::store_mut(&mut self.world).set(entity, Transform::from_position(position));
        HasStore::<Mesh>::store_mut(&mut self.world).set(entity, Mesh::new(geometry, SPAWN_COLOR));
        HasStore::<Velocity>::store_mut(&mut self.world).set(entity, Velocity::ZERO);

        debug!(%entity, %geometry, x = position.x, "entity added");
        entity
    }

    /// Delete an entity and every component it has.
    pub fn delete_entity(&mut self, entity: Entity) -> bool {
        if self.selected == Some(entity) {
            self.selected = None;
        }
        self.world.delete_entity(entity)
    }

    /// Select an entity (or clear the selection). While playing, the
    /// selected entity is given a velocity and transform if it lacks them.
    pub fn select(&mut self, entity: Option<Entity>) {
        self.selected = entity.filter(|e| self.world.is_live(*e));
        if self.is_playing() {
            self.prepare_selected();
        }
    }

    #[must_use]
    pub fn selected(&self) -> Option<Entity> {
        self.selected
    }

    /// Entities currently under keyboard control, in id order.
    pub fn controlled(&self) -> impl Iterator<Item = Entity> + '_ {
        self.world
            .entities()
            .filter(|e| self.world.has::<PlayerControlled>(*e))
    }

    /// Toggle keyboard control for `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::World`] if `entity` was never issued.
    pub fn set_player_controlled(&mut self, entity: Entity, controlled: bool) -> Result<(), EditorError> {
        if controlled {
            self.world.insert(entity, PlayerControlled)?;
        } else {
            self.world.remove::<PlayerControlled>(entity);
        }
        Ok(())
    }

    /// Attach a script after checking that it compiles.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::Script`] if the source does not compile, or
    /// [`EditorError::World`] if `entity` was never issued.
    pub fn set_script(&mut self, entity: Entity, source: &str) -> Result<(), EditorError> {
        self.scheduler.check_script(source)?;
        self.world.insert(entity, Script::new(source))?;
        Ok(())
    }

    /// Parent `child` under `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::World`] if either id is unknown or the edge
    /// would create a cycle.
    pub fn set_parent(&mut self, child: Entity, parent: Entity) -> Result<(), EditorError> {
        self.world.set_parent(child, parent)?;
        Ok(())
    }

    /// The first entity with camera geometry, if any.
    #[must_use]
    pub fn camera_entity(&self) -> Option<Entity> {
        self.world
            .entities()
            .find(|e| self.world.get::<Mesh>(*e).is_some_and(|m| m.geometry == Geometry::Camera))
    }

    fn prepare_selected(&mut self) {
        let Some(entity) = self.selected else {
            return;
        };
        if !self.world.has::<Velocity>(entity) {
            if let Err(err) = self.world.insert(entity, Velocity::ZERO) {
                warn!(%entity, error = %err, "cannot give selection a velocity");
            }
        }
        if !self.world.has::<Transform>(entity) {
            if let Err(err) = self.world.insert(entity, Transform::IDENTITY) {
                warn!(%entity, error = %err, "cannot give selection a transform");
            }
        }
    }

    // -- Projects --

    /// Replace the scene with the default single-cube project.
    pub fn new_project(&mut self) -> Entity {
        self.stop();
        self.selected = None;
        engine_project::new_project(&mut self.world)
    }

    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read.
    pub fn list_saved(&self) -> Result<Vec<SavedProject>, EditorError> {
        Ok(self.catalog.list_saved()?)
    }

    /// Save the scene under a new save-slot id.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be written.
    pub fn save(&mut self, name: &str) -> Result<ProjectDocument, EditorError> {
        Ok(self.catalog.save_named(&self.world, name)?)
    }

    /// Load a saved project. Returns `Ok(false)` if `id` is not saved.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read or holds an invalid
    /// document.
    pub fn load(&mut self, id: &str) -> Result<bool, EditorError> {
        self.stop();
        let loaded = self.catalog.load_by_id(&mut self.world, id)?;
        if loaded {
            self.selected = None;
        }
        Ok(loaded)
    }

    /// # Errors
    ///
    /// Returns an error if the catalog cannot be written.
    pub fn delete_saved(&mut self, id: &str) -> Result<bool, EditorError> {
        Ok(self.catalog.delete_by_id(id)?)
    }

    /// Write the current scene to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn export(&self, name: &str, path: &Path) -> Result<ProjectDocument, EditorError> {
        let doc = engine_project::snapshot(&self.world, name);
        engine_project::export_to_file(&doc, path)?;
        Ok(doc)
    }

    /// Load a project file into the scene.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed; the scene is
    /// unchanged in that case.
    pub fn import(&mut self, path: &Path) -> Result<ProjectDocument, EditorError> {
        self.stop();
        let doc = engine_project::import_from_file(&mut self.world, path)?;
        self.selected = None;
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use engine_project::MemoryStore;
    use engine_world::Key;

    use super::*;

    fn session() -> EditorSession<MemoryStore> {
        EditorSession::new(SimulationConfig::default(), Catalog::new(MemoryStore::new()))
    }

    fn position(session: &EditorSession<MemoryStore>, e: Entity) -> Vec3 {
        session.world().get::<Transform>(e).unwrap().position
    }

    #[test]
    fn test_add_entity_spacing_and_defaults() {
        let mut s = session();
        let a = s.add_entity(Geometry::Box);
        let b = s.add_entity(Geometry::Sphere);

        assert_eq!(position(&s, a), Vec3::ZERO);
        assert_eq!(position(&s, b), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(s.world().get::<Name>(b), Some(&Name::new("sphere")));
        let mesh = s.world().get::<Mesh>(b).unwrap();
        assert_eq!(mesh.color, SPAWN_COLOR);
        assert_eq!(s.world().get::<Velocity>(a), Some(&Velocity::ZERO));
    }

    #[test]
    fn test_ticks_only_while_playing() {
        let mut s = session();
        let e = s.add_entity(Geometry::Box);
        s.world_mut().get_mut::<Velocity>(e).unwrap().linear = Vec3::X;

        assert!(s.step(1.0).is_none());
        assert_eq!(position(&s, e), Vec3::ZERO);

        s.play();
        s.step(1.0);
        s.stop();
        assert!(s.step(1.0).is_none());
        assert_eq!(position(&s, e), Vec3::X);

        s.play();
        s.step(1.0);
        assert_eq!(position(&s, e), Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_first_frame_after_play_is_zero() {
        let mut s = session();
        let e = s.add_entity(Geometry::Box);
        s.world_mut().get_mut::<Velocity>(e).unwrap().linear = Vec3::X;

        s.play();
        let report = s.frame(Instant::now()).unwrap();

        assert_eq!(report.delta, 0.0);
        assert_eq!(position(&s, e), Vec3::ZERO);
    }

    #[test]
    fn test_player_control_drives_selected_entity() {
        let mut s = session();
        let e = s.add_entity(Geometry::Box);
        s.set_player_controlled(e, true).unwrap();
        s.select(Some(e));
        s.play();
        s.input_mut().press(Key::Right);

        s.step(1.0);

        assert_eq!(position(&s, e), Vec3::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn test_controlled_reads_the_world() {
        let mut s = session();
        let e = s.add_entity(Geometry::Box);
        s.set_player_controlled(e, true).unwrap();
        assert_eq!(s.controlled().collect::<Vec<_>>(), vec![e]);

        s.set_player_controlled(e, false).unwrap();
        assert_eq!(s.controlled().count(), 0);

        s.set_player_controlled(e, true).unwrap();
        assert!(s.delete_entity(e));
        assert_eq!(s.controlled().count(), 0);
    }

    #[test]
    fn test_selecting_while_playing_adds_motion_components() {
        let mut s = session();
        let e = s.world_mut().create_entity();
        s.play();
        s.select(Some(e));

        assert!(s.world().has::<Velocity>(e));
        assert_eq!(s.world().get::<Transform>(e), Some(&Transform::IDENTITY));
    }

    #[test]
    fn test_set_script_rejects_bad_source() {
        let mut s = session();
        let e = s.add_entity(Geometry::Box);

        assert!(matches!(s.set_script(e, "let = ;"), Err(EditorError::Script(_))));
        assert!(!s.world().has::<Script>(e));

        s.set_script(e, "transforms.translate(entity_id, 0.0, delta, 0.0);").unwrap();
        s.play();
        s.step(1.0);
        assert_eq!(position(&s, e), Vec3::Y);
    }

    #[test]
    fn test_delete_entity_clears_selection() {
        let mut s = session();
        let e = s.add_entity(Geometry::Box);
        s.select(Some(e));
        assert!(s.delete_entity(e));
        assert_eq!(s.selected(), None);
        assert!(!s.world().has::<Mesh>(e));
    }

    #[test]
    fn test_camera_entity() {
        let mut s = session();
        s.add_entity(Geometry::Box);
        assert_eq!(s.camera_entity(), None);
        let cam = s.add_entity(Geometry::Camera);
        assert_eq!(s.camera_entity(), Some(cam));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let mut s = session();
        let e = s.add_entity(Geometry::Sphere);
        let saved = s.save("Scene").unwrap();

        s.world_mut().get_mut::<Transform>(e).unwrap().position = Vec3::splat(7.0);
        assert!(s.load(&saved.id).unwrap());
        assert_eq!(position(&s, e), Vec3::ZERO);

        assert!(!s.load("missing").unwrap());
        assert_eq!(s.list_saved().unwrap().len(), 1);
        assert!(s.delete_saved(&saved.id).unwrap());
        assert!(s.list_saved().unwrap().is_empty());
    }

    #[test]
    fn test_export_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");

        let mut s = session();
        let e = s.add_entity(Geometry::Camera);
        s.export("Exported", &path).unwrap();

        let mut other = session();
        let doc = other.import(&path).unwrap();
        assert_eq!(doc.name, "Exported");
        assert_eq!(other.camera_entity(), Some(e));
    }

    #[test]
    fn test_new_project() {
        let mut s = session();
        s.add_entity(Geometry::Sphere);
        s.play();
        let cube = s.new_project();

        assert!(!s.is_playing());
        assert_eq!(s.world().get::<Name>(cube), Some(&Name::new("Cube")));
        assert_eq!(engine_project::snapshot(s.world(), "x").entities.len(), 1);
    }
}
