//! The persisted project format.
//!
//! ```json
//! {
//!   "id": "0f8e…",
//!   "name": "My scene",
//!   "updatedAt": 1718000000000,
//!   "version": 1,
//!   "entities": [
//!     { "id": 1, "components": {
//!         "position": { "x": 0, "y": 0, "z": 0 },
//!         "name": "Cube",
//!         "mesh": { "geometry": "box", "color": "hotpink" } } }
//!   ]
//! }
//! ```
//!
//! Only position, name, and mesh are persisted. Velocity, scripts, player
//! control, and collision policy are session state.

use std::collections::BTreeSet;

use engine_component::Entity;
use engine_math::Vec3;
use engine_world::components::{Mesh, Name};
use serde::{Deserialize, Serialize};

use crate::error::DocumentError;

/// Current document schema version.
pub const DOCUMENT_VERSION: u32 = 1;

fn default_version() -> u32 {
    DOCUMENT_VERSION
}

/// A saved scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDocument {
    /// Save-slot id. Unrelated to entity ids. Files holding only
    /// `entities` read the slot fields as empty.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Epoch milliseconds.
    #[serde(default)]
    pub updated_at: u64,
    /// Absent in documents written before versioning; read as 1.
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub entities: Vec<EntityRecord>,
}

/// One entity and whichever persisted components it has.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: Entity,
    #[serde(default)]
    pub components: ComponentRecords,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentRecords {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Name>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mesh: Option<Mesh>,
}

impl ComponentRecords {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.name.is_none() && self.mesh.is_none()
    }
}

/// `{ "x": …, "y": …, "z": … }`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PositionRecord {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl From<Vec3> for PositionRecord {
    fn from(v: Vec3) -> Self {
        Self {
            x: v.x,
            y: v.y,
            z: v.z,
        }
    }
}

impl From<PositionRecord> for Vec3 {
    fn from(p: PositionRecord) -> Self {
        Vec3::new(p.x, p.y, p.z)
    }
}

/// Catalog listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedProject {
    pub id: String,
    pub name: String,
    pub updated_at: u64,
}

impl ProjectDocument {
    /// An empty document.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, updated_at: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            updated_at,
            version: DOCUMENT_VERSION,
            entities: Vec::new(),
        }
    }

    #[must_use]
    pub fn summary(&self) -> SavedProject {
        SavedProject {
            id: self.id.clone(),
            name: self.name.clone(),
            updated_at: self.updated_at,
        }
    }

    /// Check the document can be loaded as a whole.
    ///
    /// # Errors
    ///
    /// Returns the first [`DocumentError`] found: an entity id above
    /// [`Entity::MAX_ID`], a duplicated entity id, or a non-finite position.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut seen = BTreeSet::new();
        for record in &self.entities {
            if record.id.id() > Entity::MAX_ID {
                return Err(DocumentError::EntityIdOutOfRange(record.id));
            }
            if !seen.insert(record.id) {
                return Err(DocumentError::DuplicateEntity(record.id));
            }
            if let Some(p) = record.components.position {
                if !Vec3::from(p).is_finite() {
                    return Err(DocumentError::NonFinitePosition(record.id));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use engine_world::components::Geometry;

    use super::*;

    #[test]
    fn test_parse_documented_shape() {
        let json = r#"{
            "id": "slot-1",
            "name": "Scene",
            "updatedAt": 1700000000000,
            "entities": [
                { "id": 3, "components": {
                    "position": { "x": 1, "y": 2.5, "z": -3 },
                    "name": "Cube",
                    "mesh": { "geometry": "sphere", "color": "white", "texture": "grid.png" } } },
                { "id": 4, "components": {} }
            ]
        }"#;
        let doc: ProjectDocument = serde_json::from_str(json).unwrap();

        assert_eq!(doc.version, 1);
        assert_eq!(doc.updated_at, 1_700_000_000_000);
        assert_eq!(doc.entities.len(), 2);

        let first = &doc.entities[0].components;
        assert_eq!(first.position, Some(PositionRecord { x: 1.0, y: 2.5, z: -3.0 }));
        assert_eq!(first.name, Some(Name::new("Cube")));
        let mesh = first.mesh.as_ref().unwrap();
        assert_eq!(mesh.geometry, Geometry::Sphere);
        assert_eq!(mesh.texture.as_deref(), Some("grid.png"));
        assert!(doc.entities[1].components.is_empty());
    }

    #[test]
    fn test_serialize_uses_camel_case_and_omits_absent() {
        let mut doc = ProjectDocument::new("slot", "Scene", 5);
        doc.entities.push(EntityRecord {
            id: Entity::from_raw(1),
            components: ComponentRecords {
                name: Some(Name::new("Only a name")),
                ..Default::default()
            },
        });
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["updatedAt"], 5);
        let components = &value["entities"][0]["components"];
        assert_eq!(components["name"], "Only a name");
        assert!(components.get("position").is_none());
        assert!(components.get("mesh").is_none());
    }

    #[test]
    fn test_validate_rejects_duplicates_and_huge_ids() {
        let record = |id| EntityRecord {
            id: Entity::from_raw(id),
            components: ComponentRecords::default(),
        };

        let mut doc = ProjectDocument::new("slot", "Scene", 0);
        doc.entities = vec![record(1), record(2)];
        assert_eq!(doc.validate(), Ok(()));

        doc.entities.push(record(1));
        assert_eq!(
            doc.validate(),
            Err(DocumentError::DuplicateEntity(Entity::from_raw(1)))
        );

        doc.entities = vec![record(0), record(Entity::MAX_ID)];
        assert_eq!(doc.validate(), Ok(()));

        doc.entities = vec![record(u64::MAX)];
        assert_eq!(
            doc.validate(),
            Err(DocumentError::EntityIdOutOfRange(Entity::from_raw(u64::MAX)))
        );
    }

    #[test]
    fn test_parse_entities_only_file() {
        let json = r#"{ "entities": [ { "id": 0, "components": { "name": "Cube" } } ] }"#;
        let doc: ProjectDocument = serde_json::from_str(json).unwrap();

        assert_eq!(doc.id, "");
        assert_eq!(doc.name, "");
        assert_eq!(doc.updated_at, 0);
        assert_eq!(doc.version, DOCUMENT_VERSION);
        assert_eq!(doc.entities[0].id, Entity::from_raw(0));
        assert_eq!(doc.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_non_finite_position() {
        let mut doc = ProjectDocument::new("slot", "Scene", 0);
        doc.entities.push(EntityRecord {
            id: Entity::from_raw(7),
            components: ComponentRecords {
                position: Some(PositionRecord { x: f32::NAN, y: 0.0, z: 0.0 }),
                ..Default::default()
            },
        });
        assert_eq!(
            doc.validate(),
            Err(DocumentError::NonFinitePosition(Entity::from_raw(7)))
        );
    }
}
