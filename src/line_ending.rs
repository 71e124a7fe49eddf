//! Line ending detection and normalization
//!
//! Lines are stored without terminators; the document-wide [`LineEnding`]
//! only matters when text enters or leaves the buffer.

use serde::{Deserialize, Serialize};

/// Document-wide line terminator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    Lf,
    Cr,
    #[default]
    CrLf,
}

impl LineEnding {
    pub const fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::Cr => "\r",
            LineEnding::CrLf => "\r\n",
        }
    }

    /// Width of the terminator in characters
    pub const fn len(self) -> usize {
        match self {
            LineEnding::CrLf => 2,
            LineEnding::Lf | LineEnding::Cr => 1,
        }
    }

    /// Detect the terminator used by `text`.
    ///
    /// `\r\n` wins over `\n`, which wins over a bare `\r`. Text without any
    /// line break reports CRLF.
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            LineEnding::CrLf
        } else if text.contains('\n') {
            LineEnding::Lf
        } else if text.contains('\r') {
            LineEnding::Cr
        } else {
            LineEnding::CrLf
        }
    }
}

/// Split text into lines on any of `\r\n`, `\n` or `\r`.
///
/// Always returns at least one line; a trailing terminator yields a trailing
/// empty line.
pub fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    split_lines_into(text, &mut lines);
    lines
}

/// [`split_lines`] into a caller-provided vector (for pre-reserved storage)
pub fn split_lines_into(text: &str, lines: &mut Vec<String>) {
    let mut current = String::new();
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                lines.push(std::mem::take(&mut current));
            }
            '\n' => lines.push(std::mem::take(&mut current)),
            _ => current.push(ch),
        }
    }
    lines.push(current);
}

/// Upper bound on the number of lines `text` splits into
pub fn line_count_hint(text: &str) -> usize {
    text.bytes().filter(|b| *b == b'\n' || *b == b'\r').count() + 1
}

/// Rewrite every line break in `text` to `ending`
pub fn clean_line_endings(text: &str, ending: LineEnding) -> String {
    split_lines(text).join(ending.as_str())
}

/// True if `text` contains any line break character
pub fn has_line_break(text: &str) -> bool {
    text.contains(['\n', '\r'])
}
