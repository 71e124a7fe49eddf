//! Cursor position and navigation arithmetic.

use crate::error::{EditError, Result};
use crate::util::{char_type, CharType};

use super::buffer::TextBuffer;

/// A position in the document (line and character column, both 0-indexed).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
}

impl CursorPosition {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    pub const fn zero() -> Self {
        Self { line: 0, column: 0 }
    }

    /// Pull the position back inside the document
    pub fn clamped<B: TextBuffer>(self, buffer: &B) -> Self {
        let line = self.line.min(buffer.last_line());
        let column = self.column.min(buffer.line_length(line));
        Self { line, column }
    }

    /// Absolute offset, counting one separator character per line break
    pub fn to_index<B: TextBuffer>(self, buffer: &B) -> usize {
        let line = self.line.min(buffer.last_line());
        buffer.line_start(line) + self.column.min(buffer.line_length(line))
    }

    /// Inverse of [`to_index`](Self::to_index); offsets past the end land on
    /// the end of the document
    pub fn from_index<B: TextBuffer>(buffer: &B, index: usize) -> Self {
        let mut remaining = index;
        for line in 0..buffer.line_count() {
            let len = buffer.line_length(line);
            if remaining <= len {
                return Self::new(line, remaining);
            }
            remaining -= len + 1;
        }
        let last = buffer.last_line();
        Self::new(last, buffer.line_length(last))
    }

    /// Validate or clamp an externally supplied position.
    ///
    /// With `auto_clamp` the line is pulled into `[0, line_count)` and the
    /// column into `[0, line_length]`. Without it, anything outside the
    /// document is rejected, and so is `column == line_length`.
    pub fn checked<B: TextBuffer>(
        buffer: &B,
        line: isize,
        column: isize,
        auto_clamp: bool,
    ) -> Result<Self> {
        if auto_clamp {
            let line = line.clamp(0, buffer.last_line() as isize) as usize;
            let max_column = buffer.line_length(line) as isize;
            let column = column.clamp(0, max_column) as usize;
            return Ok(Self::new(line, column));
        }

        let out_of_range = EditError::OutOfRange { line, column };
        if line < 0 || line as usize >= buffer.line_count() {
            return Err(out_of_range);
        }
        if column < 0 || column as usize >= buffer.line_length(line as usize) {
            return Err(out_of_range);
        }
        Ok(Self::new(line as usize, column as usize))
    }
}

/// Width of the word step to the left of `pos`, used by Ctrl+Left and
/// Ctrl+Backspace.
///
/// A whitespace neighbour steps over the whole whitespace run, a word
/// character steps over the word run, anything else is a single character.
/// Returns 0 at the start of a line.
pub fn step_count_left<B: TextBuffer>(buffer: &B, pos: CursorPosition) -> usize {
    let chars: Vec<char> = buffer.line(pos.line).chars().collect();
    let col = pos.column.min(chars.len());
    if col == 0 {
        return 0;
    }
    let kind = char_type(chars[col - 1]);
    if kind == CharType::Punctuation {
        return 1;
    }
    chars[..col]
        .iter()
        .rev()
        .take_while(|c| char_type(**c) == kind)
        .count()
}

/// Mirror of [`step_count_left`]. Returns 0 at the end of a line.
pub fn step_count_right<B: TextBuffer>(buffer: &B, pos: CursorPosition) -> usize {
    let chars: Vec<char> = buffer.line(pos.line).chars().collect();
    let col = pos.column.min(chars.len());
    if col == chars.len() {
        return 0;
    }
    let kind = char_type(chars[col]);
    if kind == CharType::Punctuation {
        return 1;
    }
    chars[col..]
        .iter()
        .take_while(|c| char_type(**c) == kind)
        .count()
}

/// The caret, with optional desired column for vertical movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub line: usize,
    pub column: usize,
    /// Desired column for vertical movement.
    /// When moving up/down through lines of varying length, this preserves
    /// the "intended" column position even when a shorter line is traversed.
    pub desired_column: Option<usize>,
}

impl Cursor {
    pub const fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            desired_column: None,
        }
    }

    pub fn at_position(pos: CursorPosition) -> Self {
        Self::new(pos.line, pos.column)
    }

    pub const fn to_position(&self) -> CursorPosition {
        CursorPosition::new(self.line, self.column)
    }

    /// Jump to a position, forgetting the desired column
    pub fn set_position(&mut self, pos: CursorPosition) {
        self.line = pos.line;
        self.column = pos.column;
        self.desired_column = None;
    }

    /// Clear desired column (call after horizontal movement)
    pub fn clear_desired_column(&mut self) {
        self.desired_column = None;
    }

    /// Set desired column to current column (call before vertical movement)
    pub fn set_desired_column(&mut self) {
        if self.desired_column.is_none() {
            self.desired_column = Some(self.column);
        }
    }

    /// Get the effective column for positioning (uses desired_column if set)
    pub fn effective_column(&self) -> usize {
        self.desired_column.unwrap_or(self.column)
    }

    /// One character left, wrapping to the end of the previous line.
    /// Returns false at the start of the document.
    pub fn move_left<B: TextBuffer>(&mut self, buffer: &B) -> bool {
        self.clear_desired_column();
        if self.column > 0 {
            self.column -= 1;
        } else if self.line > 0 {
            self.line -= 1;
            self.column = buffer.line_length(self.line);
        } else {
            return false;
        }
        true
    }

    /// One character right, wrapping to the start of the next line.
    /// Returns false at the end of the document.
    pub fn move_right<B: TextBuffer>(&mut self, buffer: &B) -> bool {
        self.clear_desired_column();
        if self.column < buffer.line_length(self.line) {
            self.column += 1;
        } else if self.line + 1 < buffer.line_count() {
            self.line += 1;
            self.column = 0;
        } else {
            return false;
        }
        true
    }

    pub fn move_up<B: TextBuffer>(&mut self, buffer: &B) -> bool {
        if self.line == 0 {
            return false;
        }
        self.set_desired_column();
        self.line -= 1;
        self.column = self.effective_column().min(buffer.line_length(self.line));
        true
    }

    pub fn move_down<B: TextBuffer>(&mut self, buffer: &B) -> bool {
        if self.line + 1 >= buffer.line_count() {
            return false;
        }
        self.set_desired_column();
        self.line += 1;
        self.column = self.effective_column().min(buffer.line_length(self.line));
        true
    }

    /// Word step left; at a line start this crosses to the previous line
    pub fn move_word_left<B: TextBuffer>(&mut self, buffer: &B) -> bool {
        let step = step_count_left(buffer, self.to_position());
        if step == 0 {
            return self.move_left(buffer);
        }
        self.column -= step;
        self.clear_desired_column();
        true
    }

    /// Word step right; at a line end this crosses to the next line
    pub fn move_word_right<B: TextBuffer>(&mut self, buffer: &B) -> bool {
        let step = step_count_right(buffer, self.to_position());
        if step == 0 {
            return self.move_right(buffer);
        }
        self.column += step;
        self.clear_desired_column();
        true
    }

    pub fn move_line_start(&mut self) {
        self.column = 0;
        self.clear_desired_column();
    }

    pub fn move_line_end<B: TextBuffer>(&mut self, buffer: &B) {
        self.column = buffer.line_length(self.line);
        self.clear_desired_column();
    }

    pub fn move_document_start(&mut self) {
        self.set_position(CursorPosition::zero());
    }

    pub fn move_document_end<B: TextBuffer>(&mut self, buffer: &B) {
        let last = buffer.last_line();
        self.set_position(CursorPosition::new(last, buffer.line_length(last)));
    }
}

impl From<CursorPosition> for Cursor {
    fn from(pos: CursorPosition) -> Self {
        Self::at_position(pos)
    }
}

impl From<Cursor> for CursorPosition {
    fn from(cursor: Cursor) -> Self {
        cursor.to_position()
    }
}
