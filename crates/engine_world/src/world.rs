//! World state: the entity registry plus one store per component kind.
//!
//! The [`World`] is the single owner of all simulation state. Systems take
//! `&mut World`, so a tick and a project load can never interleave.

use engine_component::{Component, ComponentStore, Entity, EntityRegistry};
use engine_math::Transform;
use tracing::debug;

use crate::components::{Collision, Mesh, Name, Parent, PlayerControlled, Script, Velocity};
use crate::error::WorldError;

/// Typed access to the store that holds components of type `T`.
///
/// Implemented by [`World`] once per component kind; this is what lets the
/// generic [`World::insert`]/[`World::get`] family pick the right store.
pub trait HasStore<T: Component> {
    fn store(&self) -> &ComponentStore<T>;

    /// Raw mutable access. Bypasses the issued-id check done by
    /// [`World::insert`].
    fn store_mut(&mut self) -> &mut ComponentStore<T>;

    /// Extra validation run by [`World::insert`] before writing.
    fn validate(&self, _entity: Entity, _value: &T) -> Result<(), WorldError> {
        Ok(())
    }
}

/// The scene's simulation state.
#[derive(Debug, Clone, Default)]
pub struct World {
    pub(crate) registry: EntityRegistry,
    pub(crate) transforms: ComponentStore<Transform>,
    pub(crate) velocities: ComponentStore<Velocity>,
    pub(crate) meshes: ComponentStore<Mesh>,
    pub(crate) names: ComponentStore<Name>,
    pub(crate) parents: ComponentStore<Parent>,
    pub(crate) player_controlled: ComponentStore<PlayerControlled>,
    pub(crate) collisions: ComponentStore<Collision>,
    pub(crate) scripts: ComponentStore<Script>,
}

impl World {
    /// Create a new empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Entity lifecycle --

    /// Issue a fresh entity id with no components.
    pub fn create_entity(&mut self) -> Entity {
        self.registry.create()
    }

    /// Mark an id coming from outside (e.g. a loaded document) as live.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::IdOutOfRange`] if the id is above
    /// [`Entity::MAX_ID`].
    pub fn reserve_entity(&mut self, entity: Entity) -> Result<(), WorldError> {
        if self.registry.reserve(entity) {
            Ok(())
        } else {
            Err(WorldError::IdOutOfRange(entity))
        }
    }

    /// Destroy an entity and remove it from every component store.
    ///
    /// Children of the entity lose their parent edge and become roots.
    /// Returns `false` if the entity was not live; stores are still scrubbed
    /// in that case so stale entries cannot linger.
    pub fn delete_entity(&mut self, entity: Entity) -> bool {
        let was_live = self.registry.destroy(entity);

        self.transforms.delete(entity);
        self.velocities.delete(entity);
        self.meshes.delete(entity);
        self.names.delete(entity);
        self.parents.delete(entity);
        self.player_controlled.delete(entity);
        self.collisions.delete(entity);
        self.scripts.delete(entity);

        for child in self.children_of(entity) {
            self.parents.delete(child);
        }

        debug!(%entity, was_live, "entity deleted");
        was_live
    }

    /// Live entities in ascending id order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.registry.all()
    }

    #[must_use]
    pub fn is_live(&self, entity: Entity) -> bool {
        self.registry.is_live(entity)
    }

    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.registry.len()
    }

    #[must_use]
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    // -- Generic component access --

    /// Attach (or overwrite) a component.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::UnknownEntity`] if `entity` was never issued, or
    /// whatever the component's own validation rejects (e.g. a parent cycle).
    pub fn insert<T: Component>(&mut self, entity: Entity, value: T) -> Result<Option<T>, WorldError>
    where
        Self: HasStore<T>,
    {
        if !self.registry.was_issued(entity) {
            return Err(WorldError::UnknownEntity(entity));
        }
        <Self as HasStore<T>>::validate(self, entity, &value)?;
        Ok(<Self as HasStore<T>>::store_mut(self).set(entity, value))
    }

    /// Detach a component, returning it if present.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T>
    where
        Self: HasStore<T>,
    {
        <Self as HasStore<T>>::store_mut(self).delete(entity)
    }

    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T>
    where
        Self: HasStore<T>,
    {
        <Self as HasStore<T>>::store(self).get(entity)
    }

    /// Mutable access to an existing component (e.g. for gizmo edits).
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T>
    where
        Self: HasStore<T>,
    {
        <Self as HasStore<T>>::store_mut(self).get_mut(entity)
    }

    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool
    where
        Self: HasStore<T>,
    {
        <Self as HasStore<T>>::store(self).has(entity)
    }

    // -- Names --

    /// The entity's name, or `"Entity {id}"` when it has none.
    #[must_use]
    pub fn display_name(&self, entity: Entity) -> String {
        self.names
            .get(entity)
            .map_or_else(|| format!("Entity {}", entity.id()), |name| name.value.clone())
    }

    // -- Hierarchy --

    /// Set `parent` as the parent of `child`.
    ///
    /// # Errors
    ///
    /// Rejects unknown ids and any edge that would create a cycle.
    pub fn set_parent(&mut self, child: Entity, parent: Entity) -> Result<(), WorldError> {
        if !self.registry.was_issued(parent) {
            return Err(WorldError::UnknownEntity(parent));
        }
        self.insert(child, Parent { parent }).map(|_| ())
    }

    /// Remove `child`'s parent edge. Returns the previous parent.
    pub fn clear_parent(&mut self, child: Entity) -> Option<Entity> {
        self.parents.delete(child).map(|p| p.parent)
    }

    #[must_use]
    pub fn parent_of(&self, child: Entity) -> Option<Entity> {
        self.parents.get(child).map(|p| p.parent)
    }

    /// Direct children of `parent` (one level, linear scan).
    #[must_use]
    pub fn children_of(&self, parent: Entity) -> Vec<Entity> {
        self.parents
            .entries()
            .filter(|(_, p)| p.parent == parent)
            .map(|(child, _)| child)
            .collect()
    }

    /// Ancestors of `entity`, nearest first. Terminates because cycles are
    /// rejected on write.
    #[must_use]
    pub fn ancestors_of(&self, entity: Entity) -> Vec<Entity> {
        let mut ancestors = Vec::new();
        let mut current = self.parent_of(entity);
        while let Some(parent) = current {
            ancestors.push(parent);
            current = self.parent_of(parent);
        }
        ancestors
    }

    // -- Bulk --

    /// Replace the transform, name, and mesh stores in one step.
    ///
    /// Every id present in the new stores is reserved in the registry. Used
    /// by project loading, which builds the replacement stores up front so a
    /// failed load never leaves the world half-cleared.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::IdOutOfRange`] if any key is above
    /// [`Entity::MAX_ID`]; the world is unchanged in that case.
    pub fn replace_persisted(
        &mut self,
        transforms: ComponentStore<Transform>,
        names: ComponentStore<Name>,
        meshes: ComponentStore<Mesh>,
    ) -> Result<(), WorldError> {
        let out_of_range = transforms
            .keys()
            .chain(names.keys())
            .chain(meshes.keys())
            .find(|e| e.id() > Entity::MAX_ID);
        if let Some(entity) = out_of_range {
            return Err(WorldError::IdOutOfRange(entity));
        }
        for entity in transforms.keys().chain(names.keys()).chain(meshes.keys()) {
            self.registry.reserve(entity);
        }
        self.transforms = transforms;
        self.names = names;
        self.meshes = meshes;
        Ok(())
    }

    /// Empty the transform, name, and mesh stores.
    pub fn clear_persisted(&mut self) {
        self.transforms.clear();
        self.names.clear();
        self.meshes.clear();
    }
}

impl HasStore<Transform> for World {
    fn store(&self) -> &ComponentStore<Transform> {
        &self.transforms
    }
    fn store_mut(&mut self) -> &mut ComponentStore<Transform> {
        &mut self.transforms
    }
    fn validate(&self, entity: Entity, value: &Transform) -> Result<(), WorldError> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(WorldError::NonFinite { entity, component: Transform::type_name() })
        }
    }
}

impl HasStore<Velocity> for World {
    fn store(&self) -> &ComponentStore<Velocity> {
        &self.velocities
    }
    fn store_mut(&mut self) -> &mut ComponentStore<Velocity> {
        &mut self.velocities
    }
    fn validate(&self, entity: Entity, value: &Velocity) -> Result<(), WorldError> {
        if value.linear.is_finite() {
            Ok(())
        } else {
            Err(WorldError::NonFinite { entity, component: Velocity::type_name() })
        }
    }
}

impl HasStore<Mesh> for World {
    fn store(&self) -> &ComponentStore<Mesh> {
        &self.meshes
    }
    fn store_mut(&mut self) -> &mut ComponentStore<Mesh> {
        &mut self.meshes
    }
}

impl HasStore<Name> for World {
    fn store(&self) -> &ComponentStore<Name> {
        &self.names
    }
    fn store_mut(&mut self) -> &mut ComponentStore<Name> {
        &mut self.names
    }
}

impl HasStore<Parent> for World {
    fn store(&self) -> &ComponentStore<Parent> {
        &self.parents
    }
    fn store_mut(&mut self) -> &mut ComponentStore<Parent> {
        &mut self.parents
    }

    fn validate(&self, child: Entity, value: &Parent) -> Result<(), WorldError> {
        let cycle = WorldError::ParentCycle {
            child,
            parent: value.parent,
        };
        if value.parent == child {
            return Err(cycle);
        }
        // Walking up from the new parent must never reach the child.
        if self.ancestors_of(value.parent).contains(&child) {
            return Err(cycle);
        }
        Ok(())
    }
}

impl HasStore<PlayerControlled> for World {
    fn store(&self) -> &ComponentStore<PlayerControlled> {
        &self.player_controlled
    }
    fn store_mut(&mut self) -> &mut ComponentStore<PlayerControlled> {
        &mut self.player_controlled
    }
}

impl HasStore<Collision> for World {
    fn store(&self) -> &ComponentStore<Collision> {
        &self.collisions
    }
    fn store_mut(&mut self) -> &mut ComponentStore<Collision> {
        &mut self.collisions
    }
}

impl HasStore<Script> for World {
    fn store(&self) -> &ComponentStore<Script> {
        &self.scripts
    }
    fn store_mut(&mut self) -> &mut ComponentStore<Script> {
        &mut self.scripts
    }
}
