//! Project-layer error types.

use std::path::PathBuf;

use engine_component::Entity;
use engine_world::WorldError;

/// Errors raised while saving, loading, or storing projects.
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// The input was not a well-formed project document (or catalog).
    #[error("failed to parse project document: {0}")]
    Parse(#[source] serde_json::Error),

    /// A document could not be serialized.
    #[error("failed to serialize project document: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The document parsed but describes an impossible world.
    #[error("invalid project document: {0}")]
    Invalid(#[from] DocumentError),

    /// The world refused the loaded ids.
    #[error(transparent)]
    World(#[from] WorldError),

    /// Reading or writing a file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Structural problems found by [`ProjectDocument::validate`](crate::ProjectDocument::validate).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    /// The id is above [`Entity::MAX_ID`].
    #[error("{0} is above the largest allowed entity id")]
    EntityIdOutOfRange(Entity),

    /// The same entity appears in more than one record.
    #[error("{0} appears more than once")]
    DuplicateEntity(Entity),

    /// A position contains NaN or infinity.
    #[error("{0} has a non-finite position")]
    NonFinitePosition(Entity),
}
