//! Character classes and word boundaries for plain paragraph text

/// Check if a character is a punctuation/symbol boundary (not whitespace)
pub fn is_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '/' | ':' | ',' | '.' | '-' | '(' | ')' | '{' | '}' | '[' | ']' | ';' | '"' | '\''
            | '<' | '>' | '=' | '+' | '*' | '&' | '|' | '!' | '@' | '#' | '$' | '%' | '^'
            | '~' | '`' | '\\' | '?'
    )
}

/// Character class used to find word runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharType {
    Whitespace,
    WordChar,
    Punctuation,
}

pub fn char_type(ch: char) -> CharType {
    if ch.is_whitespace() {
        CharType::Whitespace
    } else if is_punctuation(ch) {
        CharType::Punctuation
    } else {
        CharType::WordChar
    }
}

/// The run of same-class characters around a caret offset, as `start..end`
/// char offsets.
///
/// A caret sitting just after a word selects that word rather than the
/// whitespace or punctuation that follows it. Returns `None` for empty text.
pub fn word_range_at(chars: &[char], offset: usize) -> Option<(usize, usize)> {
    if chars.is_empty() {
        return None;
    }

    let mut index = offset.min(chars.len() - 1);
    let before_is_word = index > 0 && char_type(chars[index - 1]) == CharType::WordChar;
    if (offset >= chars.len() || char_type(chars[index]) != CharType::WordChar) && before_is_word
    {
        index -= 1;
    }

    let class = char_type(chars[index]);
    let start = chars[..index]
        .iter()
        .rposition(|&ch| char_type(ch) != class)
        .map_or(0, |i| i + 1);
    let end = chars[index..]
        .iter()
        .position(|&ch| char_type(ch) != class)
        .map_or(chars.len(), |i| index + i);
    Some((start, end))
}
