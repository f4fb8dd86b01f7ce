//! Moving persisted components between a [`World`] and a [`ProjectDocument`].

use std::collections::BTreeSet;

use engine_component::{ComponentStore, Entity};
use engine_math::{Transform, Vec3};
use engine_world::components::{Geometry, Mesh, Name};
use engine_world::{HasStore, World};
use tracing::info;

use crate::document::{ComponentRecords, EntityRecord, ProjectDocument};
use crate::error::ProjectError;

/// Collect every entity that has a position, name, or mesh into a document.
///
/// Records are in ascending entity order and carry only the components the
/// entity actually has. The document's `id` and `updated_at` are left empty
/// for the caller (usually the catalog) to fill in.
#[must_use]
pub fn snapshot(world: &World, name: &str) -> ProjectDocument {
    let transforms = HasStore::<Transform>::store(world);
    let names = HasStore::<Name>::store(world);
    let meshes = HasStore::<Mesh>::store(world);

    let ids: BTreeSet<Entity> = transforms
        .keys()
        .chain(names.keys())
        .chain(meshes.keys())
        .collect();

    let mut doc = ProjectDocument::new(String::new(), name, 0);
    doc.entities = ids
        .into_iter()
        .map(|id| EntityRecord {
            id,
            components: ComponentRecords {
                position: transforms.get(id).map(|t| t.position.into()),
                name: names.get(id).cloned(),
                mesh: meshes.get(id).cloned(),
            },
        })
        .collect();
    doc
}

/// Replace the world's transforms, names, and meshes with the document's.
///
/// This is a destructive load: entities absent from the document lose those
/// three components. Other components (velocity, scripts, ...) are left
/// alone. An entity that already had a transform keeps its rotation and
/// scale; a new transform starts from identity.
///
/// The document is validated before anything is touched.
///
/// # Errors
///
/// Returns [`ProjectError::Invalid`] if the document fails validation. The
/// world is unchanged in that case.
pub fn restore(world: &mut World, doc: &ProjectDocument) -> Result<(), ProjectError> {
    doc.validate()?;

    let current = HasStore::<Transform>::store(&*world);
    let mut transforms = ComponentStore::new();
    let mut names = ComponentStore::new();
    let mut meshes = ComponentStore::new();

    for record in &doc.entities {
        let c = &record.components;
        if let Some(position) = c.position {
            let mut transform = current.get(record.id).copied().unwrap_or_default();
            transform.position = Vec3::from(position);
            transforms.set(record.id, transform);
        }
        if let Some(name) = &c.name {
            names.set(record.id, name.clone());
        }
        if let Some(mesh) = &c.mesh {
            meshes.set(record.id, mesh.clone());
        }
    }

    world.replace_persisted(transforms, names, meshes)?;
    for record in &doc.entities {
        world.reserve_entity(record.id)?;
    }

    info!(
        project = %doc.name,
        entities = doc.entities.len(),
        "project restored"
    );
    Ok(())
}

/// Reset the persisted stores to a fresh scene: one pink box named "Cube" at
/// the origin.
pub fn new_project(world: &mut World) -> Entity {
    world.clear_persisted();

    let cube = world.create_entity();
    let _ = HasStore::<Transform>::store_mut(world).set(cube, Transform::IDENTITY);
    let _ = HasStore::<Name>::store_mut(world).set(cube, Name::new("Cube"));
    let _ = HasStore::<Mesh>::store_mut(world).set(cube, Mesh::new(Geometry::Box, Mesh::DEFAULT_COLOR));

    info!(%cube, "new project created");
    cube
}
