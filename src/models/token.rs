use serde::{Deserialize, Serialize};

use super::SyllableCount;

/// A whitespace-delimited unit of normalized text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// The token text, exactly as it appears after normalization
    pub text: String,
    /// Position in the original token sequence
    pub index: usize,
    /// Resolved syllables for this token
    pub syllables: u32,
}

impl Token {
    pub fn new(text: &str, index: usize, count: SyllableCount) -> Self {
        Self {
            text: text.to_string(),
            index,
            syllables: count.syllables,
        }
    }

    /// True if the token carries any character that is not a word character or apostrophe
    pub fn has_non_word_char(&self) -> bool {
        has_non_word_char(&self.text)
    }
}

/// True if `text` contains a character other than a word character or an apostrophe
pub fn has_non_word_char(text: &str) -> bool {
    text.chars()
        .any(|c| !(c.is_alphanumeric() || c == '_' || c == '\''))
}

/// Split normalized text into whitespace-delimited tokens, keeping order
pub fn split_tokens(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}
