//! Selections and the shape-aware text operations performed on them.
//!
//! Replacing, removing and extracting a selection all branch on the same
//! shape analysis: whole document, single line, or a multi-line span where
//! the first and last lines are either fully covered or only partly covered.

use crate::line_ending::LineEnding;
use crate::util::{char_len, char_slice, char_type, split_at_char, CharType};

use super::buffer::{LineBuffer, TextBuffer};
use super::cursor::{step_count_left, step_count_right, CursorPosition};

/// A selection between two independently optional endpoints.
///
/// `start` is where the gesture began and may come after `end` in document
/// order. Equal endpoints mean nothing is visibly selected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextSelection {
    pub start: Option<CursorPosition>,
    pub end: Option<CursorPosition>,
}

impl TextSelection {
    pub fn new(start: CursorPosition, end: CursorPosition) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// No selection at all
    pub const fn none() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Both endpoints at `pos`
    pub fn collapsed(pos: CursorPosition) -> Self {
        Self::new(pos, pos)
    }

    /// True iff both endpoints are set and differ
    pub fn has_selection(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if s != e)
    }

    /// Endpoints in document order, if both are set
    pub fn order(&self) -> Option<(CursorPosition, CursorPosition)> {
        let (start, end) = (self.start?, self.end?);
        Some(if start <= end { (start, end) } else { (end, start) })
    }

    /// Check if selection runs backwards (end before start)
    pub fn is_reversed(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if e < s)
    }

    /// Move the free endpoint, anchoring at `anchor` if nothing was set yet
    pub fn extend_to(&mut self, anchor: CursorPosition, pos: CursorPosition) {
        if self.start.is_none() {
            self.start = Some(anchor);
        }
        self.end = Some(pos);
    }

    pub fn clear(&mut self) {
        *self = Self::none();
    }

    /// Check if a position is within this selection (end exclusive)
    pub fn contains(&self, pos: CursorPosition) -> bool {
        match self.order() {
            Some((start, end)) => pos >= start && pos < end,
            None => false,
        }
    }
}

/// Selection covers every character of the document
pub fn is_whole_document<B: TextBuffer>(
    buffer: &B,
    start: CursorPosition,
    end: CursorPosition,
) -> bool {
    let last = buffer.last_line();
    start == CursorPosition::zero() && end == CursorPosition::new(last, buffer.line_length(last))
}

/// Text before `column` and text from `column` to the end of the line
fn cut(buffer: &LineBuffer, line: usize, column: usize) -> (String, String) {
    let (head, tail) = split_at_char(buffer.line(line), column);
    (head.to_string(), tail.to_string())
}

/// Replace the ordered range `start..end` with `new_lines`.
///
/// Returns the position right after the inserted text.
pub fn replace(
    buffer: &mut LineBuffer,
    start: CursorPosition,
    end: CursorPosition,
    mut new_lines: Vec<String>,
) -> CursorPosition {
    if new_lines.is_empty() {
        new_lines.push(String::new());
    }
    let start = start.clamped(buffer);
    let end = end.clamped(buffer).max(start);
    let inserted = new_lines.len();
    let last_len = new_lines.last().map_or(0, |l| char_len(l));

    if is_whole_document(buffer, start, end) {
        buffer.replace_all(new_lines);
        return CursorPosition::new(inserted - 1, last_len);
    }

    let (head, _) = cut(buffer, start.line, start.column);
    let (_, tail) = cut(buffer, end.line, end.column);
    let head_len = char_len(&head);
    let caret = CursorPosition::new(
        start.line + inserted - 1,
        if inserted == 1 { head_len + last_len } else { last_len },
    );

    if start.line == end.line && inserted == 1 {
        buffer.set_line(start.line, format!("{}{}{}", head, new_lines[0], tail));
        return caret;
    }

    // A fully covered boundary line leaves an empty head or tail, so every
    // coverage combination collapses into the same splice
    let last = inserted - 1;
    new_lines[0].insert_str(0, &head);
    new_lines[last].push_str(&tail);
    buffer.replace_range(start.line, end.line - start.line + 1, new_lines);
    caret
}

/// Delete the ordered range `start..end`, returning where the caret lands
pub fn remove(buffer: &mut LineBuffer, start: CursorPosition, end: CursorPosition) -> CursorPosition {
    let start = start.clamped(buffer);
    let end = end.clamped(buffer).max(start);

    if is_whole_document(buffer, start, end) {
        buffer.replace_all(vec![String::new()]);
        return CursorPosition::zero();
    }

    let (head, _) = cut(buffer, start.line, start.column);
    let (_, tail) = cut(buffer, end.line, end.column);

    if start.line == end.line {
        buffer.set_line(start.line, head + &tail);
        return start;
    }

    let span = end.line - start.line + 1;
    let start_full = start.column == 0;
    let end_full = end.column == buffer.line_length(end.line);

    match (start_full, end_full) {
        (true, true) => buffer.replace_range(start.line, span, vec![String::new()]),
        (true, false) => {
            buffer.remove_range(start.line, span - 1);
            buffer.set_line(start.line, tail);
        }
        (false, true) => {
            buffer.set_line(start.line, head);
            buffer.remove_range(start.line + 1, span - 1);
        }
        (false, false) => {
            buffer.set_line(start.line, head + &tail);
            buffer.remove_range(start.line + 1, span - 1);
        }
    }
    start
}

/// Text inside the ordered range `start..end`, joined with `ending`
pub fn selected_text<B: TextBuffer>(
    buffer: &B,
    start: CursorPosition,
    end: CursorPosition,
    ending: LineEnding,
) -> String {
    let start = start.clamped(buffer);
    let end = end.clamped(buffer).max(start);

    if is_whole_document(buffer, start, end) {
        let lines: Vec<&str> = (0..buffer.line_count()).map(|l| buffer.line(l)).collect();
        return lines.join(ending.as_str());
    }

    if start.line == end.line {
        return char_slice(buffer.line(start.line), start.column, end.column).to_string();
    }

    let mut out = String::new();
    out.push_str(split_at_char(buffer.line(start.line), start.column).1);
    for line in start.line + 1..end.line {
        out.push_str(ending.as_str());
        out.push_str(buffer.line(line));
    }
    out.push_str(ending.as_str());
    out.push_str(split_at_char(buffer.line(end.line), end.column).0);
    out
}

/// Convert an absolute `(offset, length)` pair into a selection.
///
/// Offsets count one separator character per line break. A start past the
/// end of the document yields an empty selection at the end.
pub fn from_absolute<B: TextBuffer>(buffer: &B, start: usize, length: usize) -> TextSelection {
    let last = buffer.last_line();
    let total = buffer.line_start(last) + buffer.line_length(last);
    if start > total {
        return TextSelection::collapsed(CursorPosition::new(last, buffer.line_length(last)));
    }
    let end = start.saturating_add(length).min(total);
    TextSelection::new(
        CursorPosition::from_index(buffer, start),
        CursorPosition::from_index(buffer, end),
    )
}

/// Replace `count` lines at `start` with `new_lines`, leaving identical lines
/// untouched
pub fn replace_lines(buffer: &mut LineBuffer, start: usize, count: usize, new_lines: Vec<String>) {
    if new_lines.is_empty() {
        buffer.remove_range(start, count);
        return;
    }

    let shared = count.min(new_lines.len());
    let mut new_lines = new_lines.into_iter();
    for (offset, line) in new_lines.by_ref().take(shared).enumerate() {
        if buffer.line(start + offset) != line {
            buffer.set_line(start + offset, line);
        }
    }

    if count > shared {
        buffer.remove_range(start + shared, count - shared);
    } else {
        let overflow: Vec<String> = new_lines.collect();
        buffer.insert_range(start + shared, overflow);
    }
}

/// Expand outward from `pos` across word characters; whitespace on either
/// side stops the expansion on that side.
pub fn word_at<B: TextBuffer>(buffer: &B, pos: CursorPosition) -> TextSelection {
    let pos = pos.clamped(buffer);
    let stops = |ch: Option<char>| ch.map_or(true, |c| char_type(c) == CharType::Whitespace);

    let left = if pos.column == 0 || stops(buffer.char_at(pos.line, pos.column - 1)) {
        0
    } else {
        step_count_left(buffer, pos)
    };
    let right = if stops(buffer.char_at(pos.line, pos.column)) {
        0
    } else {
        step_count_right(buffer, pos)
    };

    TextSelection::new(
        CursorPosition::new(pos.line, pos.column - left),
        CursorPosition::new(pos.line, pos.column + right),
    )
}
