//! Utility modules

pub mod text;

pub use text::{char_type, is_punctuation, word_range_at, CharType};
