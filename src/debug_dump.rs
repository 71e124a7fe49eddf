//! Session state dump for development diagnostics
//!
//! Serializes a snapshot of an [`EditSession`] to JSON so hosts can attach it
//! to bug reports. Document text is not included.

use serde::Serialize;

use crate::config::EditorSettings;
use crate::editable::EditSession;
use crate::line_ending::LineEnding;

#[derive(Debug, Clone, Serialize)]
pub struct SessionDump {
    pub line_count: usize,
    pub char_count: usize,
    pub longest_line: usize,
    pub line_ending: LineEnding,
    pub cursor: CursorDump,
    pub selection: Option<SelectionDump>,
    pub undo_stack_size: usize,
    pub redo_stack_size: usize,
    pub settings: EditorSettings,
}

#[derive(Debug, Clone, Serialize)]
pub struct CursorDump {
    pub line: usize,
    pub column: usize,
    pub desired_column: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SelectionDump {
    pub start_line: usize,
    pub start_column: usize,
    pub end_line: usize,
    pub end_column: usize,
    pub is_reversed: bool,
}

impl SessionDump {
    pub fn from_session(session: &EditSession) -> Self {
        let cursor = session.cursor();
        let selection = session.selection();
        let selection = match (selection.start, selection.end) {
            (Some(start), Some(end)) if selection.has_selection() => Some(SelectionDump {
                start_line: start.line,
                start_column: start.column,
                end_line: end.line,
                end_column: end.column,
                is_reversed: selection.is_reversed(),
            }),
            _ => None,
        };

        Self {
            line_count: session.line_count(),
            char_count: session.character_count(),
            longest_line: session.buffer().longest_line(),
            line_ending: session.line_ending(),
            cursor: CursorDump {
                line: cursor.line,
                column: cursor.column,
                desired_column: cursor.desired_column,
            },
            selection,
            undo_stack_size: session.undo_steps(),
            redo_stack_size: session.redo_steps(),
            settings: session.settings().clone(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }
}

impl EditSession {
    /// Snapshot of the session for diagnostics
    pub fn debug_dump(&self) -> SessionDump {
        SessionDump::from_session(self)
    }
}
