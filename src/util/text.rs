//! Utility functions for text editing

/// Character type for word navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharType {
    /// Whitespace characters
    Whitespace,
    /// Letters, digits and underscore (word characters)
    WordChar,
    /// Everything else
    Punctuation,
}

/// Get the character type for word navigation
pub fn char_type(ch: char) -> CharType {
    if ch.is_whitespace() {
        CharType::Whitespace
    } else if is_word_char(ch) {
        CharType::WordChar
    } else {
        CharType::Punctuation
    }
}

/// Letters, digits and underscore form words
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Length of a string in characters
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Convert a char offset into a byte offset, clamping to the end of the string
pub fn char_to_byte(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Substring by character range (clamped)
pub fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let start_byte = char_to_byte(s, start);
    let end_byte = char_to_byte(s, end.max(start));
    &s[start_byte..end_byte]
}

/// Split a string at a character offset
pub fn split_at_char(s: &str, char_offset: usize) -> (&str, &str) {
    s.split_at(char_to_byte(s, char_offset))
}

/// Count whitespace-delimited tokens
pub fn count_words(s: &str) -> usize {
    s.split_whitespace().count()
}

/// Leading run of tabs and spaces, in characters
pub fn leading_indent(s: &str) -> &str {
    let end = s
        .char_indices()
        .find(|(_, c)| *c != ' ' && *c != '\t')
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    &s[..end]
}
