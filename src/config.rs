//! Editor settings supplied by the host
//!
//! The core only reads these. Hosts typically keep them in a YAML file next to
//! the rest of their preferences and hand a parsed copy to each session.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config_paths;
use crate::line_ending::LineEnding;

/// Settings consumed by an [`EditSession`](crate::editable::EditSession)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorSettings {
    /// Reject every mutating operation
    pub read_only: bool,

    /// Record undo/redo history
    pub undo_enabled: bool,

    /// Spaces per indent level
    pub tab_width: usize,

    /// Indent with spaces instead of tabs
    pub use_spaces: bool,

    /// Repeat the current line's indent depth on newline
    pub auto_indent: bool,

    /// Pick `tab_width`/`use_spaces` from the text on load
    pub detect_indentation: bool,

    /// Maximum document size in characters (None = unlimited)
    pub max_characters: Option<usize>,

    /// Line ending used for documents without any line break
    pub default_line_ending: LineEnding,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            read_only: false,
            undo_enabled: true,
            tab_width: 4,
            use_spaces: true,
            auto_indent: true,
            detect_indentation: true,
            max_characters: None,
            default_line_ending: LineEnding::CrLf,
        }
    }
}

impl EditorSettings {
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(s)
    }

    pub fn to_yaml_string(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Load settings from disk, or return defaults if missing or unreadable
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            tracing::debug!(
                "Settings file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match Self::from_yaml_str(&content) {
                Ok(settings) => {
                    tracing::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    tracing::warn!("Failed to parse settings at {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Load from the default settings file, see [`config_paths::settings_file`]
    pub fn load_default() -> Self {
        match config_paths::settings_file() {
            Some(path) => Self::load(&path),
            None => {
                tracing::debug!("No config directory available, using default settings");
                Self::default()
            }
        }
    }

    /// The string inserted for one indent level
    pub fn indent_unit(&self) -> String {
        if self.use_spaces {
            " ".repeat(self.tab_width.max(1))
        } else {
            "\t".to_string()
        }
    }

    /// Check if growing the document would exceed `max_characters`
    pub fn would_exceed_max_characters(&self, current_len: usize, insert_len: usize) -> bool {
        if let Some(max) = self.max_characters {
            current_len.saturating_add(insert_len) > max
        } else {
            false
        }
    }
}
