//! Sparse, typed component storage.
//!
//! A [`ComponentStore`] is an independent mapping from [`Entity`] to one kind
//! of component. Stores know nothing about each other: keeping e.g. "every
//! entity with a mesh also has a transform" true is the caller's job.
//!
//! Entries are kept ordered by entity id so that systems iterating a store
//! visit entities in the same order on every tick.

use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::component::Component;
use crate::entity::Entity;

/// Sparse storage for components of type `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentStore<T: Component> {
    entries: BTreeMap<Entity, T>,
}

impl<T: Component> ComponentStore<T> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert or overwrite the component for `entity`.
    ///
    /// Returns the previous value, if any.
    pub fn set(&mut self, entity: Entity, value: T) -> Option<T> {
        self.entries.insert(entity, value)
    }

    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.entries.get(&entity)
    }

    #[must_use]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.entries.get_mut(&entity)
    }

    #[must_use]
    pub fn has(&self, entity: Entity) -> bool {
        self.entries.contains_key(&entity)
    }

    /// Remove the component for `entity`, returning it if it was present.
    pub fn delete(&mut self, entity: Entity) -> Option<T> {
        self.entries.remove(&entity)
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entities that have this component, in ascending id order.
    pub fn keys(&self) -> impl Iterator<Item = Entity> + '_ {
        self.entries.keys().copied()
    }

    /// `(entity, component)` pairs in ascending id order.
    pub fn entries(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        self.entries.iter().map(|(e, v)| (*e, v))
    }

    /// Mutable `(entity, component)` pairs in ascending id order.
    pub fn entries_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> + '_ {
        self.entries.iter_mut().map(|(e, v)| (*e, v))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The component type name, for diagnostics.
    #[must_use]
    pub fn component_name(&self) -> &'static str {
        T::type_name()
    }
}

impl<T: Component> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> FromIterator<(Entity, T)> for ComponentStore<T> {
    fn from_iter<I: IntoIterator<Item = (Entity, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<T: Component> IntoIterator for ComponentStore<T> {
    type Item = (Entity, T);
    type IntoIter = btree_map::IntoIter<Entity, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Label(String);

    impl Component for Label {
        fn type_name() -> &'static str {
            "Label"
        }
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Marker;

    impl Component for Marker {
        fn type_name() -> &'static str {
            "Marker"
        }
    }

    fn e(id: u64) -> Entity {
        Entity::from_raw(id)
    }

    #[test]
    fn test_set_get_overwrite() {
        let mut store = ComponentStore::new();
        assert!(store.set(e(1), Label("a".into())).is_none());
        let previous = store.set(e(1), Label("b".into()));
        assert_eq!(previous, Some(Label("a".into())));
        assert_eq!(store.get(e(1)), Some(&Label("b".into())));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_has_and_delete() {
        let mut store = ComponentStore::new();
        store.set(e(3), Label("x".into()));
        assert!(store.has(e(3)));
        assert_eq!(store.delete(e(3)), Some(Label("x".into())));
        assert!(!store.has(e(3)));
        assert!(store.delete(e(3)).is_none());
    }

    #[test]
    fn test_iteration_is_ordered() {
        let mut store = ComponentStore::new();
        for id in [5, 1, 3] {
            store.set(e(id), Label(id.to_string()));
        }
        let keys: Vec<u64> = store.keys().map(Entity::id).collect();
        assert_eq!(keys, vec![1, 3, 5]);
    }

    #[test]
    fn test_entries_mut_updates_in_place() {
        let mut store = ComponentStore::new();
        store.set(e(1), Label("a".into()));
        store.set(e(2), Label("b".into()));
        for (_, label) in store.entries_mut() {
            label.0.push('!');
        }
        assert_eq!(store.get(e(2)), Some(&Label("b!".into())));
    }

    #[test]
    fn test_clear() {
        let mut store: ComponentStore<Marker> = (1..=4).map(|id| (e(id), Marker)).collect();
        assert_eq!(store.len(), 4);
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn test_component_name() {
        let store: ComponentStore<Label> = ComponentStore::new();
        assert_eq!(store.component_name(), "Label");
    }
}
