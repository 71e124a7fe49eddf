//! EditSession - the document, caret, selection and history of one editor.

use crate::config::EditorSettings;
use crate::error::{EditError, Result};
use crate::line_ending::{
    has_line_break, line_count_hint, split_lines, split_lines_into, LineEnding,
};
use crate::tracing::SelectionSnapshot;
use crate::util::{char_len, char_to_byte, split_at_char};

use super::buffer::{LineBuffer, TextBuffer};
use super::cursor::{step_count_left, step_count_right, Cursor, CursorPosition};
use super::events::{EditorEvent, EventBus, SubscriptionId};
use super::history::{SelectionState, UndoRedoLog};
use super::indent::{
    auto_indent_depth, detect_indentation, indent_string, outdent_line, rewrite_indent,
    IndentStyle,
};
use super::selection::{self, TextSelection};

/// Direction for [`EditSession::move_line`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineDirection {
    Up,
    Down,
}

/// One editing session: the document plus everything that edits it.
///
/// Every mutating operation records an undo item (when undo is enabled),
/// then raises `TextChanged` followed by `SelectionChanged`.
#[derive(Debug)]
pub struct EditSession {
    lines: LineBuffer,
    cursor: Cursor,
    selection: TextSelection,
    history: UndoRedoLog,
    settings: EditorSettings,
    line_ending: LineEnding,
    events: EventBus,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(EditorSettings::default())
    }
}

impl EditSession {
    /// Create an empty session
    pub fn new(settings: EditorSettings) -> Self {
        Self {
            lines: LineBuffer::new(),
            cursor: Cursor::new(0, 0),
            selection: TextSelection::none(),
            history: UndoRedoLog::new(),
            line_ending: settings.default_line_ending,
            settings,
            events: EventBus::new(),
        }
    }

    /// Session over `text` with default settings
    pub fn with_text(text: &str) -> Self {
        let mut session = Self::default();
        let ending = session.detect_line_ending(text);
        session.install(split_lines(text), ending);
        session
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn buffer(&self) -> &LineBuffer {
        &self.lines
    }

    pub fn lines(&self) -> &[String] {
        self.lines.lines()
    }

    pub fn line_count(&self) -> usize {
        self.lines.line_count()
    }

    /// Line by signed index; `-1` is the last line, out-of-range clamps
    pub fn line(&self, index: isize) -> &str {
        self.lines.get_line(index)
    }

    pub fn cursor_position(&self) -> CursorPosition {
        self.cursor.to_position()
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    pub fn selection(&self) -> TextSelection {
        self.selection
    }

    pub fn has_selection(&self) -> bool {
        self.selection.has_selection()
    }

    pub fn settings(&self) -> &EditorSettings {
        &self.settings
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    /// Change the terminator used by [`text`](Self::text)
    pub fn set_line_ending(&mut self, ending: LineEnding) {
        self.line_ending = ending;
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.settings.read_only = read_only;
    }

    /// Turning undo tracking off drops the existing history
    pub fn set_undo_enabled(&mut self, enabled: bool) {
        self.settings.undo_enabled = enabled;
        if !enabled {
            self.history.clear_all();
        }
    }

    pub fn indent_style(&self) -> IndentStyle {
        IndentStyle {
            use_spaces: self.settings.use_spaces,
            width: self.settings.tab_width,
        }
    }

    /// Document text joined with the current line ending
    pub fn text(&self) -> String {
        self.lines
            .lines_as_string(0, self.lines.line_count(), self.line_ending)
    }

    /// Characters in [`text`](Self::text), line endings included
    pub fn character_count(&self) -> usize {
        let breaks = self.lines.line_count() - 1;
        self.lines.character_count() + breaks * (self.line_ending.len() - 1)
    }

    pub fn word_count(&self) -> usize {
        self.lines.word_count()
    }

    pub fn can_undo(&self) -> bool {
        self.settings.undo_enabled && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.settings.undo_enabled && self.history.can_redo()
    }

    /// Undo steps available (a group counts once)
    pub fn undo_steps(&self) -> usize {
        self.history.undo_count()
    }

    pub fn redo_steps(&self) -> usize {
        self.history.redo_count()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&EditorEvent) + 'static) -> SubscriptionId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    fn state(&self) -> SelectionState {
        SelectionState::new(self.cursor.to_position(), self.selection)
    }

    fn editable(&self) -> bool {
        if self.settings.read_only {
            tracing::debug!(target: "edit", "ignored edit on read-only session");
        }
        !self.settings.read_only
    }

    /// Characters `lines` would occupy once joined with the current ending
    fn joined_len(&self, lines: &[String]) -> usize {
        let text: usize = lines.iter().map(|l| char_len(l)).sum();
        text + lines.len().saturating_sub(1) * self.line_ending.len()
    }

    /// Characters the ordered range `start..end` occupies in [`text`](Self::text)
    fn span_len(&self, start: CursorPosition, end: CursorPosition) -> usize {
        let breaks = end.line - start.line;
        end.to_index(&self.lines) - start.to_index(&self.lines)
            + breaks * (self.line_ending.len() - 1)
    }

    /// True if growing the document by `grow(self)` characters would pass
    /// the ceiling. `grow` only runs when a ceiling is configured.
    fn exceeds_limit(&self, grow: impl FnOnce(&Self) -> usize) -> bool {
        if self.settings.max_characters.is_none() {
            return false;
        }
        let added = grow(self);
        let blocked = self
            .settings
            .would_exceed_max_characters(self.character_count(), added);
        if blocked {
            tracing::debug!(target: "edit", added, "edit blocked by character limit");
        }
        blocked
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    fn notify_text_changed(&mut self) {
        self.events.emit(EditorEvent::TextChanged);
    }

    fn notify_selection_changed(&mut self, before: Option<SelectionSnapshot>) {
        if let Some(before) = before {
            if let Some(diff) = before.diff(&SelectionSnapshot::from_session(self)) {
                tracing::trace!(target: "cursor", "{}", diff);
            }
        }
        if self.events.listener_count() == 0 {
            return;
        }
        let (selection_start, selection_length) = self.selection_range();
        let event = EditorEvent::SelectionChanged {
            line: self.cursor.line,
            column: self.cursor.column,
            selection_start,
            selection_length,
        };
        self.events.emit(event);
    }

    fn trace_snapshot(&self) -> Option<SelectionSnapshot> {
        tracing::enabled!(target: "cursor", tracing::Level::TRACE)
            .then(|| SelectionSnapshot::from_session(self))
    }

    // =========================================================================
    // Ingestion
    // =========================================================================

    /// Replace the document with `raw`, detecting its line ending.
    ///
    /// Clears the undo history and resets the caret to the start.
    pub fn load_text(&mut self, raw: &str) -> Result<()> {
        let ending = self.detect_line_ending(raw);
        let mut lines = self.allocate_lines(line_count_hint(raw))?;
        split_lines_into(raw, &mut lines);
        self.check_size(&lines, ending)?;
        self.install(lines, ending);
        Ok(())
    }

    /// Replace the document with `lines`. Embedded line breaks split further.
    pub fn load_lines(&mut self, lines: Vec<String>) -> Result<()> {
        let mut flat = self.allocate_lines(lines.len())?;
        for line in &lines {
            split_lines_into(line, &mut flat);
        }
        self.check_size(&flat, self.line_ending)?;
        self.install(flat, self.line_ending);
        Ok(())
    }

    /// Text without any line break takes the configured default
    fn detect_line_ending(&self, raw: &str) -> LineEnding {
        if has_line_break(raw) {
            LineEnding::detect(raw)
        } else {
            self.settings.default_line_ending
        }
    }

    /// Reject a whole-document rewrite whose result would pass the ceiling
    fn check_growth(&self, replacement: &[String]) -> Result<()> {
        let Some(limit) = self.settings.max_characters else {
            return Ok(());
        };
        let requested = self.joined_len(replacement);
        if requested > limit && requested > self.character_count() {
            return Err(EditError::TooLarge { requested, limit });
        }
        Ok(())
    }

    fn check_size(&self, lines: &[String], ending: LineEnding) -> Result<()> {
        let Some(limit) = self.settings.max_characters else {
            return Ok(());
        };
        let text: usize = lines.iter().map(|l| char_len(l)).sum();
        let requested = text + lines.len().saturating_sub(1) * ending.len();
        if requested > limit {
            return Err(EditError::TooLarge { requested, limit });
        }
        Ok(())
    }

    /// Reserve line storage, dropping the undo history and retrying once if
    /// the first attempt fails
    fn allocate_lines(&mut self, count: usize) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        if lines.try_reserve_exact(count).is_ok() {
            return Ok(lines);
        }
        tracing::warn!(target: "buffer", count, "line allocation failed, compacting history");
        self.history.clear_all();
        lines
            .try_reserve_exact(count)
            .map_err(|_| EditError::Allocation { requested: count })?;
        Ok(lines)
    }

    fn install(&mut self, lines: Vec<String>, ending: LineEnding) {
        self.lines.replace_all(lines);
        self.line_ending = ending;
        self.history.clear_all();
        self.cursor = Cursor::new(0, 0);
        self.selection.clear();

        if self.settings.detect_indentation {
            let style = detect_indentation(&self.lines);
            self.settings.use_spaces = style.use_spaces;
            self.settings.tab_width = style.width;
        }
        tracing::debug!(
            target: "edit",
            lines = self.lines.line_count(),
            ending = ?ending,
            "loaded document"
        );
        self.notify_text_changed();
        self.notify_selection_changed(None);
    }

    // =========================================================================
    // Recording helpers
    // =========================================================================

    /// Run `edit` over `undo_count` lines at `start` that become `redo_count`
    /// lines, recording it unless undo is disabled, then settle the caret.
    fn record(
        &mut self,
        start: usize,
        undo_count: usize,
        redo_count: usize,
        edit: impl FnOnce(&mut LineBuffer) -> SelectionState,
    ) {
        let before = self.state();
        let after = if self.settings.undo_enabled {
            self.history
                .record_action(&mut self.lines, start, undo_count, redo_count, before, edit)
        } else {
            edit(&mut self.lines)
        };
        self.settle(after);
    }

    /// Like [`record`](Self::record) for an edit replacing the ordered range
    /// `start..end` with `added_lines` lines
    fn record_selection(
        &mut self,
        start: CursorPosition,
        end: CursorPosition,
        added_lines: usize,
        edit: impl FnOnce(&mut LineBuffer) -> SelectionState,
    ) {
        let before = self.state();
        let after = if self.settings.undo_enabled {
            self.history.record_selection_action(
                &mut self.lines,
                start,
                end,
                added_lines,
                before,
                edit,
            )
        } else {
            edit(&mut self.lines)
        };
        self.settle(after);
    }

    /// Apply the post-edit caret/selection and raise notifications
    fn settle(&mut self, after: SelectionState) {
        self.cursor.set_position(after.cursor.clamped(&self.lines));
        self.selection = after.selection;
        self.notify_text_changed();
        self.notify_selection_changed(None);
    }

    /// Ordered selection, when something is visibly selected
    fn ordered_selection(&self) -> Option<(CursorPosition, CursorPosition)> {
        if !self.selection.has_selection() {
            return None;
        }
        self.selection
            .order()
            .map(|(s, e)| (s.clamped(&self.lines), e.clamped(&self.lines)))
    }

    // =========================================================================
    // Cursor and selection
    // =========================================================================

    /// Move the caret to an externally supplied position.
    ///
    /// With `auto_clamp` the position is pulled into the document; without it
    /// an out-of-range line or column (including end of line) is rejected.
    pub fn set_cursor_position(&mut self, line: isize, column: isize, auto_clamp: bool) -> Result<()> {
        let pos = CursorPosition::checked(&self.lines, line, column, auto_clamp)?;
        let before = self.trace_snapshot();
        self.cursor.set_position(pos);
        self.selection.clear();
        self.notify_selection_changed(before);
        Ok(())
    }

    fn navigate(&mut self, extend: bool, step: impl FnOnce(&mut Cursor, &LineBuffer)) {
        let before = self.trace_snapshot();
        let anchor = self.cursor.to_position();
        step(&mut self.cursor, &self.lines);
        if extend {
            self.selection.extend_to(anchor, self.cursor.to_position());
        } else {
            self.selection.clear();
        }
        self.notify_selection_changed(before);
    }

    /// Collapse an active selection to one of its ends instead of moving
    fn collapse_to(&mut self, to_start: bool) -> bool {
        let Some((start, end)) = self.ordered_selection() else {
            return false;
        };
        let before = self.trace_snapshot();
        self.cursor.set_position(if to_start { start } else { end });
        self.selection.clear();
        self.notify_selection_changed(before);
        true
    }

    pub fn move_left(&mut self, extend: bool) {
        if !extend && self.collapse_to(true) {
            return;
        }
        self.navigate(extend, |cursor, lines| {
            cursor.move_left(lines);
        });
    }

    pub fn move_right(&mut self, extend: bool) {
        if !extend && self.collapse_to(false) {
            return;
        }
        self.navigate(extend, |cursor, lines| {
            cursor.move_right(lines);
        });
    }

    pub fn move_up(&mut self, extend: bool) {
        self.navigate(extend, |cursor, lines| {
            cursor.move_up(lines);
        });
    }

    pub fn move_down(&mut self, extend: bool) {
        self.navigate(extend, |cursor, lines| {
            cursor.move_down(lines);
        });
    }

    pub fn move_word_left(&mut self, extend: bool) {
        self.navigate(extend, |cursor, lines| {
            cursor.move_word_left(lines);
        });
    }

    pub fn move_word_right(&mut self, extend: bool) {
        self.navigate(extend, |cursor, lines| {
            cursor.move_word_right(lines);
        });
    }

    pub fn move_line_start(&mut self, extend: bool) {
        self.navigate(extend, |cursor, _| cursor.move_line_start());
    }

    pub fn move_line_end(&mut self, extend: bool) {
        self.navigate(extend, |cursor, lines| cursor.move_line_end(lines));
    }

    pub fn move_document_start(&mut self, extend: bool) {
        self.navigate(extend, |cursor, _| cursor.move_document_start());
    }

    pub fn move_document_end(&mut self, extend: bool) {
        self.navigate(extend, |cursor, lines| cursor.move_document_end(lines));
    }

    /// Select between two positions (clamped); the caret goes to `end`
    pub fn set_selection(&mut self, start: CursorPosition, end: CursorPosition) {
        let before = self.trace_snapshot();
        let start = start.clamped(&self.lines);
        let end = end.clamped(&self.lines);
        self.selection = TextSelection::new(start, end);
        self.cursor.set_position(end);
        self.notify_selection_changed(before);
    }

    pub fn clear_selection(&mut self) {
        let before = self.trace_snapshot();
        self.selection.clear();
        self.notify_selection_changed(before);
    }

    pub fn select_all(&mut self) {
        let last = self.lines.last_line();
        let end = CursorPosition::new(last, self.lines.line_length(last));
        self.set_selection(CursorPosition::zero(), end);
    }

    /// Select the word around the caret. Returns false if the caret sits in
    /// whitespace.
    pub fn select_word(&mut self) -> bool {
        let word = selection::word_at(&self.lines, self.cursor.to_position());
        match (word.has_selection(), word.start, word.end) {
            (true, Some(start), Some(end)) => {
                self.set_selection(start, end);
                true
            }
            _ => false,
        }
    }

    /// Select line `index` from its first to its last character
    pub fn select_line(&mut self, index: usize) -> bool {
        if index >= self.lines.line_count() {
            return false;
        }
        let end = CursorPosition::new(index, self.lines.line_length(index));
        self.set_selection(CursorPosition::new(index, 0), end);
        true
    }

    /// Select `length` characters from absolute `start`, counting one
    /// character per line break
    pub fn set_selection_from_absolute(&mut self, start: usize, length: usize) {
        let sel = selection::from_absolute(&self.lines, start, length);
        if let (Some(start), Some(end)) = (sel.start, sel.end) {
            self.set_selection(start, end);
        }
    }

    /// Absolute start offset and length of the selection (or the caret and 0)
    pub fn selection_range(&self) -> (usize, usize) {
        match self.ordered_selection() {
            Some((start, end)) => {
                let from = start.to_index(&self.lines);
                (from, end.to_index(&self.lines) - from)
            }
            None => (self.cursor.to_position().to_index(&self.lines), 0),
        }
    }

    /// Selected text joined with the current line ending
    pub fn selected_text(&self) -> String {
        match self.ordered_selection() {
            Some((start, end)) => selection::selected_text(&self.lines, start, end, self.line_ending),
            None => String::new(),
        }
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Type `text` at the caret, replacing any selection.
    ///
    /// Empty text with an active selection deletes the selection.
    pub fn insert_text(&mut self, text: &str) -> bool {
        if !self.editable() {
            return false;
        }
        let new_lines = split_lines(text);

        let Some((start, end)) = self.ordered_selection() else {
            if text.is_empty() {
                return false;
            }
            return self.insert_at_caret(new_lines);
        };

        if text.is_empty() {
            return self.delete_selection();
        }
        let grow = |s: &Self| {
            s.joined_len(&new_lines)
                .saturating_sub(s.span_len(start, end))
        };
        if self.exceeds_limit(grow) {
            return false;
        }

        let added = new_lines.len();
        tracing::debug!(target: "edit", ?start, ?end, added, "replace selection");
        self.record_selection(start, end, added, |lines| {
            SelectionState::caret(selection::replace(lines, start, end, new_lines))
        });
        true
    }

    fn insert_at_caret(&mut self, new_lines: Vec<String>) -> bool {
        if self.exceeds_limit(|s| s.joined_len(&new_lines)) {
            return false;
        }
        let pos = self.cursor.to_position().clamped(&self.lines);

        if let [single] = new_lines.as_slice() {
            let single = single.clone();
            let width = char_len(&single);
            self.record(pos.line, 1, 1, |lines| {
                let mut line = lines.line(pos.line).to_string();
                line.insert_str(char_to_byte(&line, pos.column), &single);
                lines.set_line(pos.line, line);
                SelectionState::caret(CursorPosition::new(pos.line, pos.column + width))
            });
            return true;
        }

        let added = new_lines.len();
        self.record(pos.line, 1, added, |lines| {
            SelectionState::caret(selection::replace(lines, pos, pos, new_lines))
        });
        true
    }

    /// Convenience for typing a single character
    pub fn insert_char(&mut self, ch: char) -> bool {
        let mut buf = [0u8; 4];
        self.insert_text(ch.encode_utf8(&mut buf))
    }

    /// Enter key: split the line at the caret, repeating its indent depth
    pub fn insert_newline(&mut self) -> bool {
        if !self.editable() {
            return false;
        }
        if let Some((start, end)) = self.ordered_selection() {
            let ending = self.line_ending.len();
            if self.exceeds_limit(|s| ending.saturating_sub(s.span_len(start, end))) {
                return false;
            }
            if selection::is_whole_document(&self.lines, start, end) {
                let count = self.lines.line_count();
                self.record(0, count, 2, |lines| {
                    lines.replace_all(vec![String::new(), String::new()]);
                    SelectionState::caret(CursorPosition::new(1, 0))
                });
            } else {
                self.record_selection(start, end, 2, |lines| {
                    let parts = vec![String::new(), String::new()];
                    SelectionState::caret(selection::replace(lines, start, end, parts))
                });
            }
            return true;
        }

        let pos = self.cursor.to_position().clamped(&self.lines);
        let indent = if self.settings.auto_indent {
            let width = self.settings.tab_width;
            let depth = auto_indent_depth(&self.lines, pos.line, width);
            indent_string(depth, width, self.settings.use_spaces)
        } else {
            String::new()
        };
        let column = char_len(&indent);
        if self.exceeds_limit(|s| s.line_ending.len() + column) {
            return false;
        }

        self.record(pos.line, 1, 2, |lines| {
            let (head, tail) = split_at_char(lines.line(pos.line), pos.column);
            let (head, tail) = (head.to_string(), format!("{}{}", indent, tail));
            lines.set_line(pos.line, head);
            lines.insert_line(pos.line + 1, tail);
            SelectionState::caret(CursorPosition::new(pos.line + 1, column))
        });
        true
    }

    fn delete_selection(&mut self) -> bool {
        let Some((start, end)) = self.ordered_selection() else {
            return false;
        };
        tracing::debug!(target: "edit", ?start, ?end, "delete selection");
        self.record_selection(start, end, 1, |lines| {
            SelectionState::caret(selection::remove(lines, start, end))
        });
        true
    }

    /// Delete key. `line_mode` removes the whole caret line regardless of the
    /// selection; `word_mode` removes a word run instead of one character.
    pub fn delete_forward(&mut self, word_mode: bool, line_mode: bool) -> bool {
        if !self.editable() {
            return false;
        }
        if line_mode {
            let line = self.cursor.line.min(self.lines.last_line());
            return self.remove_line(line);
        }
        if self.has_selection() {
            return self.delete_selection();
        }

        let pos = self.cursor.to_position().clamped(&self.lines);
        let line_len = self.lines.line_length(pos.line);
        if pos.column >= line_len {
            if pos.line + 1 >= self.lines.line_count() {
                return false;
            }
            self.record(pos.line, 2, 1, |lines| {
                let merged = format!("{}{}", lines.line(pos.line), lines.line(pos.line + 1));
                lines.set_line(pos.line, merged);
                lines.remove_range(pos.line + 1, 1);
                SelectionState::caret(pos)
            });
            return true;
        }

        let count = if word_mode {
            step_count_right(&self.lines, pos).max(1)
        } else {
            1
        };
        self.record(pos.line, 1, 1, |lines| {
            let line = lines.line(pos.line);
            let (head, rest) = split_at_char(line, pos.column);
            let (_, tail) = split_at_char(rest, count);
            let updated = format!("{}{}", head, tail);
            lines.set_line(pos.line, updated);
            SelectionState::caret(pos)
        });
        true
    }

    /// Backspace. At a line start the line merges into the previous one.
    pub fn delete_backward(&mut self, word_mode: bool) -> bool {
        if !self.editable() {
            return false;
        }
        if self.has_selection() {
            return self.delete_selection();
        }

        let pos = self.cursor.to_position().clamped(&self.lines);
        if pos.column == 0 {
            if pos.line == 0 {
                return false;
            }
            let prev = pos.line - 1;
            let join_at = self.lines.line_length(prev);
            self.record(prev, 2, 1, |lines| {
                let merged = format!("{}{}", lines.line(prev), lines.line(pos.line));
                lines.set_line(prev, merged);
                lines.remove_range(pos.line, 1);
                SelectionState::caret(CursorPosition::new(prev, join_at))
            });
            return true;
        }

        let count = if word_mode {
            step_count_left(&self.lines, pos).max(1)
        } else {
            1
        };
        let column = pos.column - count;
        self.record(pos.line, 1, 1, |lines| {
            let line = lines.line(pos.line);
            let (head, _) = split_at_char(line, column);
            let (_, tail) = split_at_char(line, pos.column);
            let updated = format!("{}{}", head, tail);
            lines.set_line(pos.line, updated);
            SelectionState::caret(CursorPosition::new(pos.line, column))
        });
        true
    }

    /// Replace line `index` with `text` (which may itself span several lines)
    pub fn set_line_text(&mut self, index: usize, text: &str) -> bool {
        if !self.editable() || index >= self.lines.line_count() {
            return false;
        }
        let new_lines = split_lines(text);
        if self.exceeds_limit(|s| {
            s.joined_len(&new_lines)
                .saturating_sub(s.lines.line_length(index))
        }) {
            return false;
        }
        let added = new_lines.len();
        let caret = self.cursor.to_position();
        self.record(index, 1, added, |lines| {
            lines.replace_range(index, 1, new_lines);
            SelectionState::caret(caret.clamped(lines))
        });
        true
    }

    /// Insert `text` as a new line before `index`; `index == line_count`
    /// appends
    pub fn add_line(&mut self, index: usize, text: &str) -> bool {
        let count = self.lines.line_count();
        if !self.editable() || index > count {
            return false;
        }
        let new_lines = split_lines(text);
        if self.exceeds_limit(|s| s.joined_len(&new_lines) + s.line_ending.len()) {
            return false;
        }
        let added = new_lines.len();
        let mut caret = self.cursor.to_position();
        if caret.line >= index {
            caret.line += added;
        }

        // Anchor the record on an existing line so the range is never empty
        let start = if index == count { index - 1 } else { index };
        self.record(start, 1, 1 + added, |lines| {
            lines.insert_range(index, new_lines);
            SelectionState::caret(caret)
        });
        true
    }

    pub fn delete_line(&mut self, index: usize) -> bool {
        if !self.editable() || index >= self.lines.line_count() {
            return false;
        }
        self.remove_line(index)
    }

    fn remove_line(&mut self, index: usize) -> bool {
        let mut caret = self.cursor.to_position();
        if self.lines.line_count() == 1 {
            self.record(0, 1, 1, |lines| {
                lines.set_line(0, String::new());
                SelectionState::caret(CursorPosition::zero())
            });
            return true;
        }
        if caret.line > index {
            caret.line -= 1;
        }
        self.record(index, 1, 0, |lines| {
            lines.remove_range(index, 1);
            SelectionState::caret(caret.clamped(lines))
        });
        true
    }

    /// Insert a copy of line `index` right below it and move the caret onto
    /// the copy
    pub fn duplicate_line(&mut self, index: usize) -> bool {
        if !self.editable() || index >= self.lines.line_count() {
            return false;
        }
        if self.exceeds_limit(|s| s.lines.line_length(index) + s.line_ending.len()) {
            return false;
        }
        let column = self.cursor.column;
        self.record(index, 1, 2, |lines| {
            let copy = lines.line(index).to_string();
            lines.insert_line(index + 1, copy);
            SelectionState::caret(CursorPosition::new(index + 1, column).clamped(lines))
        });
        true
    }

    /// Swap the caret line with its neighbour. Not available with a selection
    /// or at the document edge.
    pub fn move_line(&mut self, direction: LineDirection) -> bool {
        if !self.editable() || self.has_selection() {
            return false;
        }
        let pos = self.cursor.to_position().clamped(&self.lines);
        let (first, target) = match direction {
            LineDirection::Up if pos.line > 0 => (pos.line - 1, pos.line - 1),
            LineDirection::Down if pos.line + 1 < self.lines.line_count() => {
                (pos.line, pos.line + 1)
            }
            _ => return false,
        };
        self.record(first, 2, 2, |lines| {
            lines.swap_lines(first, first + 1);
            SelectionState::caret(CursorPosition::new(target, pos.column))
        });
        true
    }

    /// Re-express every line's leading indentation with `width` spaces per
    /// level or with tabs, as one undo step
    pub fn rewrite_indentation(&mut self, width: usize, use_spaces: bool) -> Result<()> {
        if width == 0 {
            return Err(EditError::InvalidArgument(
                "indent width must be positive".to_string(),
            ));
        }
        if !self.editable() {
            return Ok(());
        }
        let rewritten: Vec<String> = self
            .lines
            .lines()
            .iter()
            .map(|l| rewrite_indent(l, width, use_spaces))
            .collect();
        let unchanged = rewritten.as_slice() == self.lines.lines();
        if !unchanged {
            self.check_growth(&rewritten)?;
        }
        self.settings.tab_width = width;
        self.settings.use_spaces = use_spaces;
        if unchanged {
            return Ok(());
        }

        let count = self.lines.line_count();
        let caret = self.cursor.to_position();
        self.record(0, count, count, |lines| {
            selection::replace_lines(lines, 0, count, rewritten);
            SelectionState::caret(caret.clamped(lines))
        });
        Ok(())
    }

    /// Substitute every match of `find` with `replace`, line by line, as one
    /// undo step. Returns the number of replacements.
    pub fn replace_all(
        &mut self,
        find: &str,
        replace: &str,
        match_case: bool,
        whole_word: bool,
    ) -> Result<usize> {
        if find.is_empty() || replace.is_empty() {
            return Err(EditError::InvalidInput(
                "search and replacement text must not be empty".to_string(),
            ));
        }
        if !self.editable() {
            return Ok(0);
        }

        let escaped = regex::escape(find);
        let pattern = if whole_word {
            format!(r"\b{}\b", escaped)
        } else {
            escaped
        };
        let re = regex::RegexBuilder::new(&pattern)
            .case_insensitive(!match_case)
            .build()
            .map_err(|e| EditError::InvalidInput(e.to_string()))?;

        let mut replaced = 0;
        let mut new_lines = Vec::with_capacity(self.lines.line_count());
        for line in self.lines.lines() {
            let hits = re.find_iter(line).count();
            if hits == 0 {
                new_lines.push(line.clone());
                continue;
            }
            replaced += hits;
            let updated = re.replace_all(line, regex::NoExpand(replace));
            split_lines_into(&updated, &mut new_lines);
        }
        if replaced == 0 {
            return Ok(0);
        }
        self.check_growth(&new_lines)?;

        let count = self.lines.line_count();
        let added = new_lines.len();
        let caret = self.cursor.to_position();
        tracing::debug!(target: "edit", find, replaced, "replace all");
        self.record(0, count, added, |lines| {
            selection::replace_lines(lines, 0, count, new_lines);
            SelectionState::caret(caret.clamped(lines))
        });
        Ok(replaced)
    }

    /// Tab key: indent every line of a multi-line selection, otherwise type
    /// one indent unit at the caret
    pub fn insert_tab(&mut self) -> bool {
        if !self.editable() {
            return false;
        }
        let unit = self.settings.indent_unit();
        let Some((start, end)) = self.ordered_selection().filter(|(s, e)| s.line != e.line) else {
            return self.insert_text(&unit);
        };

        let span = end.line - start.line + 1;
        if self.exceeds_limit(|_| span * char_len(&unit)) {
            return false;
        }
        self.record(start.line, span, span, |lines| {
            for line in start.line..=end.line {
                let indented = format!("{}{}", unit, lines.line(line));
                lines.set_line(line, indented);
            }
            let last = CursorPosition::new(end.line, lines.line_length(end.line));
            SelectionState::new(last, TextSelection::new(CursorPosition::new(start.line, 0), last))
        });
        true
    }

    /// Shift+Tab: remove one indent level from the caret line or every
    /// selected line. Returns false if nothing was indented.
    pub fn outdent(&mut self) -> bool {
        if !self.editable() {
            return false;
        }
        let width = self.settings.tab_width;
        let multi_line = self.ordered_selection().filter(|(s, e)| s.line != e.line);
        let (first, last) = match multi_line {
            Some((start, end)) => (start.line, end.line),
            None => {
                let line = self.cursor.line.min(self.lines.last_line());
                (line, line)
            }
        };

        let outdented: Vec<(String, usize)> = (first..=last)
            .map(|l| outdent_line(self.lines.line(l), width))
            .collect();
        if outdented.iter().all(|(_, removed)| *removed == 0) {
            return false;
        }

        let caret = self.cursor.to_position();
        let span = last - first + 1;
        self.record(first, span, span, |lines| {
            let mut caret_shift = 0;
            for (offset, (text, removed)) in outdented.into_iter().enumerate() {
                if first + offset == caret.line {
                    caret_shift = removed;
                }
                lines.set_line(first + offset, text);
            }
            if multi_line.is_some() {
                let end = CursorPosition::new(last, lines.line_length(last));
                SelectionState::new(end, TextSelection::new(CursorPosition::new(first, 0), end))
            } else {
                let column = caret.column.saturating_sub(caret_shift);
                SelectionState::caret(CursorPosition::new(caret.line, column))
            }
        });
        true
    }

    // =========================================================================
    // Undo/redo
    // =========================================================================

    pub fn begin_group(&mut self) {
        self.history.begin_group();
    }

    pub fn end_group(&mut self) {
        self.history.end_group();
    }

    /// Run `edits` as a single undo step
    pub fn grouped<R>(&mut self, edits: impl FnOnce(&mut Self) -> R) -> R {
        self.begin_group();
        let result = edits(self);
        self.end_group();
        result
    }

    pub fn undo(&mut self) -> bool {
        if !self.settings.undo_enabled || !self.editable() {
            return false;
        }
        match self.history.undo(&mut self.lines) {
            Some(restore) => {
                tracing::debug!(target: "undo", remaining = self.history.undo_count(), "undo");
                self.settle(restore);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        if !self.settings.undo_enabled || !self.editable() {
            return false;
        }
        match self.history.redo(&mut self.lines) {
            Some(restore) => {
                tracing::debug!(target: "undo", remaining = self.history.redo_count(), "redo");
                self.settle(restore);
                true
            }
            None => false,
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear_all();
    }
}
