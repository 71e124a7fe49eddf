//! Line store for the editing core.
//!
//! The document is an ordered sequence of line strings without terminators.
//! [`LineBuffer`] owns that sequence and is the only place structural
//! mutation happens. Indices that reach it come from cursor/selection math and
//! are clamped rather than rejected.

use std::cell::{Cell, RefCell};

use crate::line_ending::{split_lines, LineEnding};
use crate::util::{char_len, count_words};

/// Bulk removals above this many lines release spare capacity afterwards
const RECLAIM_THRESHOLD: usize = 1_000_000;

/// Read-only view used by cursor navigation and selection extraction.
pub trait TextBuffer {
    /// Number of lines (always >= 1)
    fn line_count(&self) -> usize;

    /// Line content, clamped to the nearest valid line
    fn line(&self, line: usize) -> &str;

    /// Length of a specific line in characters
    fn line_length(&self, line: usize) -> usize {
        char_len(self.line(line))
    }

    /// Get character at position, None if out of bounds
    fn char_at(&self, line: usize, column: usize) -> Option<char> {
        if line >= self.line_count() {
            return None;
        }
        self.line(line).chars().nth(column)
    }

    /// Index of the last line
    fn last_line(&self) -> usize {
        self.line_count().saturating_sub(1)
    }

    /// Absolute offset of the first character of `line`, counting one
    /// separator per line break
    fn line_start(&self, line: usize) -> usize {
        (0..line.min(self.last_line()))
            .map(|l| self.line_length(l) + 1)
            .sum()
    }
}

/// Ordered sequence of lines. Never empty.
#[derive(Debug, Clone)]
pub struct LineBuffer {
    lines: Vec<String>,
    /// Sum of line lengths in characters, kept current by every mutation
    chars: usize,
    /// Cached index of the longest line, reset on every mutation
    longest: Cell<Option<usize>>,
    /// Line start offsets computed so far; entries past an edited line are
    /// dropped and rebuilt on demand
    starts: RefCell<Vec<usize>>,
}

impl LineBuffer {
    pub fn new() -> Self {
        Self::from_lines(Vec::new())
    }

    /// Build from lines; an empty vector becomes a single empty line
    pub fn from_lines(mut lines: Vec<String>) -> Self {
        if lines.is_empty() {
            lines.push(String::new());
        }
        let chars = total_chars(&lines);
        Self {
            lines,
            chars,
            longest: Cell::new(None),
            starts: RefCell::new(Vec::new()),
        }
    }

    /// Build from raw text, splitting on any line ending
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(split_lines(text))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    fn clamp_index(&self, index: usize) -> usize {
        index.min(self.lines.len() - 1)
    }

    /// Invalidate caches after a change at or below `line`
    fn touched(&mut self, line: usize) {
        self.longest.set(None);
        self.starts.get_mut().truncate(line + 1);
    }

    fn ensure_not_empty(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
    }

    /// Line by signed index. `-1` (or any negative index) is the last line and
    /// indices past the end clamp to it.
    pub fn get_line(&self, index: isize) -> &str {
        if index < 0 {
            return &self.lines[self.lines.len() - 1];
        }
        &self.lines[self.clamp_index(index as usize)]
    }

    pub fn set_line(&mut self, index: usize, text: impl Into<String>) {
        let index = self.clamp_index(index);
        let text = text.into();
        self.chars = self.chars - char_len(&self.lines[index]) + char_len(&text);
        self.lines[index] = text;
        self.touched(index);
    }

    /// Insert before `index`; an index at or past the end appends
    pub fn insert_line(&mut self, index: usize, text: impl Into<String>) {
        let index = index.min(self.lines.len());
        let text = text.into();
        self.chars += char_len(&text);
        self.lines.insert(index, text);
        self.touched(index);
    }

    pub fn append_line(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.chars += char_len(&text);
        self.lines.push(text);
        self.touched(self.lines.len() - 1);
    }

    /// Remove `count` lines starting at `start`. Removing every line leaves a
    /// single empty line behind.
    pub fn remove_range(&mut self, start: usize, count: usize) {
        if start >= self.lines.len() || count == 0 {
            return;
        }
        let end = start.saturating_add(count).min(self.lines.len());
        let removed = total_chars(&self.lines[start..end]);
        self.lines.drain(start..end);
        self.chars -= removed;
        self.ensure_not_empty();
        self.touched(start);

        if end - start > RECLAIM_THRESHOLD {
            self.lines.shrink_to_fit();
            tracing::debug!(target: "buffer", removed = end - start, "released line storage");
        }
    }

    pub fn insert_range(&mut self, start: usize, lines: Vec<String>) {
        if lines.is_empty() {
            return;
        }
        let start = start.min(self.lines.len());
        self.chars += total_chars(&lines);
        self.lines.splice(start..start, lines);
        self.touched(start);
    }

    /// Replace `count` lines at `start` with `lines` in one splice
    pub fn replace_range(&mut self, start: usize, count: usize, lines: Vec<String>) {
        let start = start.min(self.lines.len());
        let end = start.saturating_add(count).min(self.lines.len());
        let added = total_chars(&lines);
        let removed = total_chars(&self.lines[start..end]);
        self.lines.splice(start..end, lines);
        self.chars = self.chars - removed + added;
        self.ensure_not_empty();
        self.touched(start);
    }

    /// Swap two lines. Returns false (and does nothing) if either is out of bounds.
    pub fn swap_lines(&mut self, a: usize, b: usize) -> bool {
        if a >= self.lines.len() || b >= self.lines.len() {
            return false;
        }
        self.lines.swap(a, b);
        self.touched(a.min(b));
        true
    }

    /// Replace the whole document
    pub fn replace_all(&mut self, lines: Vec<String>) {
        self.chars = total_chars(&lines);
        self.lines = lines;
        self.ensure_not_empty();
        self.lines.shrink_to_fit();
        self.touched(0);
    }

    /// Join `count` lines starting at `start` with `ending`
    pub fn lines_as_string(&self, start: usize, count: usize, ending: LineEnding) -> String {
        if start == 0 && count >= self.lines.len() {
            return self.lines.join(ending.as_str());
        }
        if start >= self.lines.len() {
            return String::new();
        }
        let end = start.saturating_add(count).min(self.lines.len());
        self.lines[start..end].join(ending.as_str())
    }

    /// Total characters with a single-character separator between lines
    pub fn character_count(&self) -> usize {
        self.chars + self.lines.len() - 1
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|l| count_words(l)).sum()
    }

    /// Index of the longest line (first one on ties)
    pub fn longest_line(&self) -> usize {
        if let Some(index) = self.longest.get() {
            if index < self.lines.len() {
                return index;
            }
        }
        let mut best = 0;
        let mut best_len = 0;
        for (i, line) in self.lines.iter().enumerate() {
            let len = char_len(line);
            if len > best_len {
                best = i;
                best_len = len;
            }
        }
        self.longest.set(Some(best));
        best
    }
}

impl Default for LineBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer for LineBuffer {
    fn line_count(&self) -> usize {
        self.lines.len()
    }

    fn line(&self, line: usize) -> &str {
        &self.lines[self.clamp_index(line)]
    }

    fn line_start(&self, line: usize) -> usize {
        let line = self.clamp_index(line);
        let mut starts = self.starts.borrow_mut();
        if starts.is_empty() {
            starts.push(0);
        }
        while starts.len() <= line {
            let prev = starts.len() - 1;
            let next = starts[prev] + char_len(&self.lines[prev]) + 1;
            starts.push(next);
        }
        starts[line]
    }
}

fn total_chars(lines: &[String]) -> usize {
    lines.iter().map(|l| char_len(l)).sum()
}
