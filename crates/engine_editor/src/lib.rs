//! # engine_editor
//!
//! A headless editor session over the scene runtime: play/stop, entity
//! creation and deletion, selection and player control, scripts, and
//! project save/load. A UI (or the bundled CLI) drives an
//! [`EditorSession`].

pub mod error;
pub mod session;

pub use error::EditorError;
pub use session::EditorSession;
