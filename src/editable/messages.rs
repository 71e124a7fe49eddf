//! Command type for driving an [`EditSession`] from key bindings or scripts.

use super::state::{EditSession, LineDirection};

/// Target for cursor movement operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveTarget {
    /// Move one character left
    Left,
    /// Move one character right
    Right,
    /// Move one line up
    Up,
    /// Move one line down
    Down,
    /// Move to start of line
    LineStart,
    /// Move to end of line
    LineEnd,
    /// Move one word left
    WordLeft,
    /// Move one word right
    WordRight,
    /// Move to start of document
    DocumentStart,
    /// Move to end of document
    DocumentEnd,
}

/// Every user-level editing action as a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    // === Movement ===
    /// Move cursor without affecting selection
    Move(MoveTarget),
    /// Move cursor and extend selection
    MoveWithSelection(MoveTarget),

    // === Insertion ===
    InsertChar(char),
    /// Insert a string (e.g. from paste)
    InsertText(String),
    InsertNewline,
    /// Tab key
    InsertTab,

    // === Deletion ===
    /// Backspace
    DeleteBackward,
    /// Delete
    DeleteForward,
    DeleteWordBackward,
    DeleteWordForward,
    /// Delete the caret line
    DeleteLine,

    // === Selection ===
    SelectAll,
    SelectWord,
    /// Select the caret line
    SelectLine,
    CollapseSelection,

    // === Undo/Redo ===
    Undo,
    Redo,

    // === Line operations ===
    Outdent,
    Duplicate,
    MoveLineUp,
    MoveLineDown,
}

impl EditCommand {
    /// Check if this command may modify the buffer
    pub fn is_editing(&self) -> bool {
        matches!(
            self,
            EditCommand::InsertChar(_)
                | EditCommand::InsertText(_)
                | EditCommand::InsertNewline
                | EditCommand::InsertTab
                | EditCommand::DeleteBackward
                | EditCommand::DeleteForward
                | EditCommand::DeleteWordBackward
                | EditCommand::DeleteWordForward
                | EditCommand::DeleteLine
                | EditCommand::Undo
                | EditCommand::Redo
                | EditCommand::Outdent
                | EditCommand::Duplicate
                | EditCommand::MoveLineUp
                | EditCommand::MoveLineDown
        )
    }

    pub fn is_movement(&self) -> bool {
        matches!(
            self,
            EditCommand::Move(_) | EditCommand::MoveWithSelection(_)
        )
    }

    pub fn is_selection(&self) -> bool {
        matches!(
            self,
            EditCommand::MoveWithSelection(_)
                | EditCommand::SelectAll
                | EditCommand::SelectWord
                | EditCommand::SelectLine
                | EditCommand::CollapseSelection
        )
    }
}

impl EditSession {
    /// Apply one command. Returns true if the document, caret or selection
    /// may have changed.
    pub fn apply(&mut self, command: &EditCommand) -> bool {
        if command.is_editing() && self.settings().read_only {
            tracing::debug!(target: "edit", ?command, "dropped edit on read-only session");
            return false;
        }
        match command {
            EditCommand::Move(target) => {
                self.apply_move(*target, false);
                true
            }
            EditCommand::MoveWithSelection(target) => {
                self.apply_move(*target, true);
                true
            }

            EditCommand::InsertChar(ch) => self.insert_char(*ch),
            EditCommand::InsertText(text) => self.insert_text(text),
            EditCommand::InsertNewline => self.insert_newline(),
            EditCommand::InsertTab => self.insert_tab(),

            EditCommand::DeleteBackward => self.delete_backward(false),
            EditCommand::DeleteForward => self.delete_forward(false, false),
            EditCommand::DeleteWordBackward => self.delete_backward(true),
            EditCommand::DeleteWordForward => self.delete_forward(true, false),
            EditCommand::DeleteLine => self.delete_forward(false, true),

            EditCommand::SelectAll => {
                self.select_all();
                true
            }
            EditCommand::SelectWord => self.select_word(),
            EditCommand::SelectLine => {
                let line = self.cursor_position().line;
                self.select_line(line)
            }
            EditCommand::CollapseSelection => {
                let had = self.has_selection();
                self.clear_selection();
                had
            }

            EditCommand::Undo => self.undo(),
            EditCommand::Redo => self.redo(),

            EditCommand::Outdent => self.outdent(),
            EditCommand::Duplicate => {
                let line = self.cursor_position().line;
                self.duplicate_line(line)
            }
            EditCommand::MoveLineUp => self.move_line(LineDirection::Up),
            EditCommand::MoveLineDown => self.move_line(LineDirection::Down),
        }
    }

    fn apply_move(&mut self, target: MoveTarget, extend: bool) {
        match target {
            MoveTarget::Left => self.move_left(extend),
            MoveTarget::Right => self.move_right(extend),
            MoveTarget::Up => self.move_up(extend),
            MoveTarget::Down => self.move_down(extend),
            MoveTarget::LineStart => self.move_line_start(extend),
            MoveTarget::LineEnd => self.move_line_end(extend),
            MoveTarget::WordLeft => self.move_word_left(extend),
            MoveTarget::WordRight => self.move_word_right(extend),
            MoveTarget::DocumentStart => self.move_document_start(extend),
            MoveTarget::DocumentEnd => self.move_document_end(extend),
        }
    }
}
