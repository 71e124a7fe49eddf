//! linebuf - line-oriented text editing core
//!
//! This crate provides the document model behind a text editor control:
//! a line buffer, caret and selection, the edit operations, undo/redo and
//! line-ending normalization. Rendering and input handling are left to the
//! host.

pub mod config;
pub mod config_paths;
pub mod debug_dump;
pub mod editable;
pub mod error;
pub mod line_ending;
pub mod tracing;
pub mod util;

// Re-export commonly used types
pub use config::EditorSettings;
pub use editable::{EditCommand, EditSession, EditorEvent};
pub use error::{EditError, Result};
pub use line_ending::LineEnding;
