//! Editor-session error types.

use engine_project::ProjectError;
use engine_script::ScriptError;
use engine_world::WorldError;

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error(transparent)]
    World(#[from] WorldError),

    #[error(transparent)]
    Project(#[from] ProjectError),

    /// A script was rejected before being attached.
    #[error("script rejected: {0}")]
    Script(#[from] ScriptError),
}
