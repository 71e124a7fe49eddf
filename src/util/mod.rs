//! Utility modules

pub mod text;

pub use text::{
    char_len, char_slice, char_to_byte, char_type, count_words, is_word_char, leading_indent,
    split_at_char, CharType,
};
