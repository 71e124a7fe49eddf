//! Indentation: detecting the document's style, measuring indent depth and
//! rewriting leading whitespace.

use crate::util::leading_indent;

use super::buffer::TextBuffer;

/// Width used when the text gives no usable hint
pub const DEFAULT_INDENT_WIDTH: usize = 4;

/// How a document indents its lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentStyle {
    pub use_spaces: bool,
    pub width: usize,
}

impl Default for IndentStyle {
    fn default() -> Self {
        Self {
            use_spaces: true,
            width: DEFAULT_INDENT_WIDTH,
        }
    }
}

pub fn gcd(mut a: usize, mut b: usize) -> usize {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Infer the indent style from the leading whitespace of every line.
///
/// Tabs win only if strictly more lines start with a tab than with spaces.
/// Otherwise the width is the GCD of the distinct space-indent widths; a
/// single distinct width is used as-is and no indented lines at all falls
/// back to [`DEFAULT_INDENT_WIDTH`].
pub fn detect_indentation<B: TextBuffer>(buffer: &B) -> IndentStyle {
    let mut tab_lines = 0usize;
    let mut space_lines = 0usize;
    let mut widths: Vec<usize> = Vec::new();

    for line in 0..buffer.line_count() {
        let text = buffer.line(line);
        if text.starts_with('\t') {
            tab_lines += 1;
            continue;
        }
        let width = text.chars().take_while(|c| *c == ' ').count();
        if width == 0 {
            continue;
        }
        space_lines += 1;
        if !widths.contains(&width) {
            widths.push(width);
        }
    }

    if tab_lines > space_lines {
        return IndentStyle {
            use_spaces: false,
            width: DEFAULT_INDENT_WIDTH,
        };
    }

    let width = match widths.as_slice() {
        [] => DEFAULT_INDENT_WIDTH,
        [only] => *only,
        [first, rest @ ..] => rest.iter().fold(*first, |acc, w| gcd(acc, *w)),
    };
    tracing::debug!(target: "edit", tab_lines, space_lines, width, "detected indentation");
    IndentStyle {
        use_spaces: true,
        width,
    }
}

/// Indent levels at the start of `line`: one per tab, one per run of
/// `width` consecutive spaces
pub fn indent_depth(line: &str, width: usize) -> usize {
    let width = width.max(1);
    let mut depth = 0;
    let mut spaces = 0;
    for ch in leading_indent(line).chars() {
        if ch == '\t' {
            depth += 1;
            spaces = 0;
        } else {
            spaces += 1;
            if spaces == width {
                depth += 1;
                spaces = 0;
            }
        }
    }
    depth
}

/// Indent depth to repeat on a new line split from `line`. Empty lines are
/// skipped upwards so a blank line inside a block keeps the block's depth.
pub fn auto_indent_depth<B: TextBuffer>(buffer: &B, line: usize, width: usize) -> usize {
    let mut current = line.min(buffer.last_line());
    loop {
        let text = buffer.line(current);
        if !text.is_empty() || current == 0 {
            return indent_depth(text, width);
        }
        current -= 1;
    }
}

/// Leading whitespace for `depth` levels
pub fn indent_string(depth: usize, width: usize, use_spaces: bool) -> String {
    if use_spaces {
        " ".repeat(depth * width.max(1))
    } else {
        "\t".repeat(depth)
    }
}

/// Re-express the leading tabs/spaces of `line` with the requested style.
///
/// Each tab is one level; runs of `width` spaces become a level when
/// converting to tabs, with any leftover spaces kept.
pub fn rewrite_indent(line: &str, width: usize, use_spaces: bool) -> String {
    let indent = leading_indent(line);
    let rest = &line[indent.len()..];
    let tabs = indent.chars().filter(|c| *c == '\t').count();
    let spaces = indent.len() - tabs;

    let mut out = if use_spaces {
        " ".repeat(tabs * width + spaces)
    } else {
        let mut s = "\t".repeat(tabs + spaces / width);
        s.push_str(&" ".repeat(spaces % width));
        s
    };
    out.push_str(rest);
    out
}

/// Remove one indent level (a tab or up to `width` spaces) from the front
/// of `line`. Returns the new line and the number of characters removed.
pub fn outdent_line(line: &str, width: usize) -> (String, usize) {
    if let Some(rest) = line.strip_prefix('\t') {
        return (rest.to_string(), 1);
    }
    let removed = line.chars().take(width.max(1)).take_while(|c| *c == ' ').count();
    (line[removed..].to_string(), removed)
}
