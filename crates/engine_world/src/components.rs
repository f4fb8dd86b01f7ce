//! Component kinds attached to scene entities.
//!
//! [`Transform`](engine_math::Transform) lives in `engine_math`; everything
//! else an entity can carry is defined here.

use engine_component::{Component, Entity};
use engine_math::Vec3;
use serde::{Deserialize, Serialize};

/// Linear velocity in world units per second.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Velocity {
    pub linear: Vec3,
}

impl Velocity {
    /// Zero velocity.
    pub const ZERO: Self = Self { linear: Vec3::ZERO };

    /// Create a new velocity.
    #[must_use]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            linear: Vec3::new(x, y, z),
        }
    }
}

impl Default for Velocity {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Component for Velocity {
    fn type_name() -> &'static str {
        "Velocity"
    }
}

/// Primitive shape drawn by the renderer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Geometry {
    #[default]
    Box,
    Sphere,
    Camera,
}

impl std::str::FromStr for Geometry {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "box" => Ok(Self::Box),
            "sphere" => Ok(Self::Sphere),
            "camera" => Ok(Self::Camera),
            other => Err(format!("unknown geometry '{other}'")),
        }
    }
}

impl Geometry {
    /// The lowercase name used in project files.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Box => "box",
            Self::Sphere => "sphere",
            Self::Camera => "camera",
        }
    }
}

impl std::fmt::Display for Geometry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual appearance. Purely descriptive; consumed by the renderer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Mesh {
    pub geometry: Geometry,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub texture: Option<String>,
}

impl Mesh {
    /// Default color for freshly created meshes.
    pub const DEFAULT_COLOR: &'static str = "hotpink";

    #[must_use]
    pub fn new(geometry: Geometry, color: impl Into<String>) -> Self {
        Self {
            geometry,
            color: color.into(),
            texture: None,
        }
    }

    #[must_use]
    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.texture = Some(texture.into());
        self
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new(Geometry::Box, Self::DEFAULT_COLOR)
    }
}

impl Component for Mesh {
    fn type_name() -> &'static str {
        "Mesh"
    }
}

/// Display label shown in the hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Name {
    pub value: String,
}

impl Name {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { value: name.into() }
    }
}

impl Component for Name {
    fn type_name() -> &'static str {
        "Name"
    }
}

/// Edge from a child entity to its parent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parent {
    pub parent: Entity,
}

impl Component for Parent {
    fn type_name() -> &'static str {
        "Parent"
    }
}

/// Marker: the input system drives this entity's velocity from key state.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerControlled;

impl Component for PlayerControlled {
    fn type_name() -> &'static str {
        "PlayerControlled"
    }
}

/// Intended collision response. Data only; no collision detection runs in
/// the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Collision {
    pub destroy_on_collision: bool,
    /// Only collide with entities carrying this tag, when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collision_tag: Option<String>,
}

impl Component for Collision {
    fn type_name() -> &'static str {
        "Collision"
    }
}

/// Per-entity script source, replaced wholesale on edit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Script {
    pub source: String,
}

impl Script {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl Component for Script {
    fn type_name() -> &'static str {
        "Script"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_json_shape() {
        let mesh = Mesh::new(Geometry::Sphere, "white");
        let value = serde_json::to_value(&mesh).unwrap();
        assert_eq!(value, serde_json::json!({"geometry": "sphere", "color": "white"}));

        let textured = mesh.with_texture("brick.png");
        let value = serde_json::to_value(&textured).unwrap();
        assert_eq!(value["texture"], "brick.png");
    }

    #[test]
    fn test_mesh_rejects_unknown_geometry() {
        let result: Result<Mesh, _> =
            serde_json::from_str(r#"{"geometry": "torus", "color": "red"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_geometry_from_str() {
        assert_eq!("camera".parse::<Geometry>(), Ok(Geometry::Camera));
        assert!("cone".parse::<Geometry>().is_err());
    }

    #[test]
    fn test_name_is_plain_string() {
        let json = serde_json::to_string(&Name::new("Cube")).unwrap();
        assert_eq!(json, "\"Cube\"");
    }

    #[test]
    fn test_mesh_default() {
        let mesh = Mesh::default();
        assert_eq!(mesh.geometry, Geometry::Box);
        assert_eq!(mesh.color, "hotpink");
    }
}
