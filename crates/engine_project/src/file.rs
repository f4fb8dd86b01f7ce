//! Exporting and importing single project documents as JSON files.

use std::fs;
use std::path::Path;

use engine_world::World;
use tracing::info;

use crate::document::ProjectDocument;
use crate::error::ProjectError;
use crate::snapshot::restore;

/// Write `doc` to `path` as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the document cannot be serialized or the file cannot
/// be written.
pub fn export_to_file(doc: &ProjectDocument, path: &Path) -> Result<(), ProjectError> {
    let json = serde_json::to_string_pretty(doc).map_err(ProjectError::Serialize)?;
    fs::write(path, json).map_err(|source| ProjectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), project = %doc.name, "project exported");
    Ok(())
}

/// Parse `json` as a project document and restore it into `world`.
///
/// Nothing in the world changes unless the whole document parses and
/// validates.
///
/// # Errors
///
/// Returns [`ProjectError::Parse`] or [`ProjectError::Invalid`].
pub fn import_from_str(world: &mut World, json: &str) -> Result<ProjectDocument, ProjectError> {
    let doc: ProjectDocument = serde_json::from_str(json).map_err(ProjectError::Parse)?;
    restore(world, &doc)?;
    Ok(doc)
}

/// Read a project file and restore it into `world`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, or as [`import_from_str`].
pub fn import_from_file(world: &mut World, path: &Path) -> Result<ProjectDocument, ProjectError> {
    let json = fs::read_to_string(path).map_err(|source| ProjectError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc = import_from_str(world, &json)?;
    info!(path = %path.display(), project = %doc.name, "project imported");
    Ok(doc)
}
