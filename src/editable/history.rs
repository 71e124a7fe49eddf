//! Undo/redo log.
//!
//! Every recorded action is a line-range delta: `undo_count` lines starting at
//! `start_line` looked like `undo_text` before the action and the `redo_count`
//! lines that replaced them look like `redo_text`. Line texts are joined with
//! `\n` since stored lines never contain a line break.

use std::collections::VecDeque;

use crate::line_ending::LineEnding;

use super::buffer::{LineBuffer, TextBuffer};
use super::cursor::CursorPosition;
use super::selection::TextSelection;

/// Cursor and selection to restore after replaying an item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub cursor: CursorPosition,
    pub selection: TextSelection,
}

impl SelectionState {
    pub fn new(cursor: CursorPosition, selection: TextSelection) -> Self {
        Self { cursor, selection }
    }

    /// Plain caret, nothing selected
    pub fn caret(cursor: CursorPosition) -> Self {
        Self::new(cursor, TextSelection::none())
    }
}

/// A single reversible line-range delta
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoRedoItem {
    pub start_line: usize,
    pub undo_text: String,
    pub redo_text: String,
    pub undo_count: usize,
    pub redo_count: usize,
    /// State before the action (restored by undo)
    pub before: SelectionState,
    /// State after the action (restored by redo)
    pub after: SelectionState,
}

impl UndoRedoItem {
    fn apply_undo(&self, lines: &mut LineBuffer) {
        if self.undo_count == 1 && self.redo_count == 1 {
            lines.set_line(self.start_line, self.undo_text.clone());
        } else {
            let restored = split_snapshot(&self.undo_text, self.undo_count);
            lines.replace_range(self.start_line, self.redo_count, restored);
        }
    }

    fn apply_redo(&self, lines: &mut LineBuffer) {
        if self.undo_count == 1 && self.redo_count == 1 {
            lines.set_line(self.start_line, self.redo_text.clone());
        } else {
            let replayed = split_snapshot(&self.redo_text, self.redo_count);
            lines.replace_range(self.start_line, self.undo_count, replayed);
        }
    }
}

/// Before-snapshot taken ahead of a mutation, finished by [`UndoRedoLog::commit`]
#[derive(Debug, Clone)]
pub struct PendingRecord {
    start_line: usize,
    undo_text: String,
    undo_count: usize,
    before: SelectionState,
}

/// One user-visible undo step
#[derive(Debug, Clone)]
enum HistoryEntry {
    Single(UndoRedoItem),
    /// Items recorded between `begin_group` and `end_group`, in recording order
    Group(Vec<UndoRedoItem>),
}

fn snapshot(lines: &LineBuffer, start: usize, count: usize) -> String {
    match count {
        0 => String::new(),
        1 => lines.line(start).to_string(),
        _ => lines.lines_as_string(start, count, LineEnding::Lf),
    }
}

fn split_snapshot(text: &str, count: usize) -> Vec<String> {
    match count {
        0 => Vec::new(),
        1 => vec![text.to_string()],
        _ => text.split('\n').map(String::from).collect(),
    }
}

/// Undo and redo stacks with optional action grouping
#[derive(Debug, Clone)]
pub struct UndoRedoLog {
    /// Oldest entry at the front so the step limit trims in O(1)
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    open_group: Option<Vec<UndoRedoItem>>,
    group_depth: usize,
    max_steps: usize,
}

impl Default for UndoRedoLog {
    fn default() -> Self {
        Self::new()
    }
}

impl UndoRedoLog {
    /// Create a new log keeping up to 1000 undo steps
    pub fn new() -> Self {
        Self::with_max_steps(1000)
    }

    pub fn with_max_steps(max_steps: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            open_group: None,
            group_depth: 0,
            max_steps: max_steps.max(1),
        }
    }

    /// Snapshot `count` lines at `start` before mutating them
    pub fn capture(
        &self,
        lines: &LineBuffer,
        start: usize,
        count: usize,
        before: SelectionState,
    ) -> PendingRecord {
        PendingRecord {
            start_line: start,
            undo_text: snapshot(lines, start, count),
            undo_count: count,
            before,
        }
    }

    /// Snapshot the `redo_count` lines that now occupy the captured range and
    /// push the finished item
    pub fn commit(
        &mut self,
        lines: &LineBuffer,
        pending: PendingRecord,
        redo_count: usize,
        after: SelectionState,
    ) {
        let item = UndoRedoItem {
            start_line: pending.start_line,
            redo_text: snapshot(lines, pending.start_line, redo_count),
            undo_text: pending.undo_text,
            undo_count: pending.undo_count,
            redo_count,
            before: pending.before,
            after,
        };
        self.push(item);
    }

    /// Snapshot, run `action`, snapshot again and record the delta.
    /// `action` returns the cursor/selection state after the edit.
    pub fn record_action(
        &mut self,
        lines: &mut LineBuffer,
        start_line: usize,
        undo_count: usize,
        redo_count: usize,
        before: SelectionState,
        action: impl FnOnce(&mut LineBuffer) -> SelectionState,
    ) -> SelectionState {
        let pending = self.capture(lines, start_line, undo_count, before);
        let after = action(lines);
        self.commit(lines, pending, redo_count, after);
        after
    }

    /// Record an action that replaces the ordered selection `start..end` with
    /// text spanning `added_lines` lines.
    ///
    /// The boundary lines always survive as the merged head and tail, so the
    /// affected range after the edit is exactly `added_lines` long.
    pub fn record_selection_action(
        &mut self,
        lines: &mut LineBuffer,
        start: CursorPosition,
        end: CursorPosition,
        added_lines: usize,
        before: SelectionState,
        action: impl FnOnce(&mut LineBuffer) -> SelectionState,
    ) -> SelectionState {
        let removed_lines = end.line - start.line + 1;
        self.record_action(
            lines,
            start.line,
            removed_lines,
            added_lines.max(1),
            before,
            action,
        )
    }

    fn push(&mut self, item: UndoRedoItem) {
        tracing::trace!(
            target: "undo",
            start = item.start_line,
            undo_count = item.undo_count,
            redo_count = item.redo_count,
            grouped = self.open_group.is_some(),
            "recorded action"
        );
        self.redo_stack.clear();
        match self.open_group.as_mut() {
            Some(group) => group.push(item),
            None => self.push_entry(HistoryEntry::Single(item)),
        }
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.undo_stack.push_back(entry);
        while self.undo_stack.len() > self.max_steps {
            self.undo_stack.pop_front();
        }
    }

    /// Start batching recorded actions into one undo step. Groups nest; only
    /// the outermost `end_group` closes the step.
    pub fn begin_group(&mut self) {
        self.group_depth += 1;
        if self.open_group.is_none() {
            self.open_group = Some(Vec::new());
        }
    }

    pub fn end_group(&mut self) {
        if self.group_depth == 0 {
            return;
        }
        self.group_depth -= 1;
        if self.group_depth == 0 {
            self.close_group();
        }
    }

    fn close_group(&mut self) {
        self.group_depth = 0;
        let Some(mut items) = self.open_group.take() else {
            return;
        };
        match items.len() {
            0 => {}
            1 => {
                if let Some(item) = items.pop() {
                    self.push_entry(HistoryEntry::Single(item));
                }
            }
            n => {
                tracing::debug!(target: "undo", actions = n, "closed action group");
                self.push_entry(HistoryEntry::Group(items));
            }
        }
    }

    pub fn is_grouping(&self) -> bool {
        self.open_group.is_some()
    }

    /// Revert the most recent step. Returns the state to restore, or None if
    /// there was nothing to undo.
    pub fn undo(&mut self, lines: &mut LineBuffer) -> Option<SelectionState> {
        if self.open_group.is_some() {
            self.close_group();
        }
        let entry = self.undo_stack.pop_back()?;
        let restore = match &entry {
            HistoryEntry::Single(item) => {
                item.apply_undo(lines);
                item.before
            }
            HistoryEntry::Group(items) => {
                for item in items.iter().rev() {
                    item.apply_undo(lines);
                }
                items.first().map(|i| i.before).unwrap_or_default()
            }
        };
        self.redo_stack.push(entry);
        Some(restore)
    }

    /// Re-apply the most recently undone step
    pub fn redo(&mut self, lines: &mut LineBuffer) -> Option<SelectionState> {
        if self.open_group.is_some() {
            self.close_group();
        }
        let entry = self.redo_stack.pop()?;
        let restore = match &entry {
            HistoryEntry::Single(item) => {
                item.apply_redo(lines);
                item.after
            }
            HistoryEntry::Group(items) => {
                for item in items {
                    item.apply_redo(lines);
                }
                items.last().map(|i| i.after).unwrap_or_default()
            }
        };
        self.undo_stack.push_back(entry);
        Some(restore)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undo steps (a group counts once)
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    /// Drop both stacks and any open group
    pub fn clear_all(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.open_group = None;
        self.group_depth = 0;
    }
}
