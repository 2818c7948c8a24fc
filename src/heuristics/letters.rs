use once_cell::sync::Lazy;
use regex::Regex;

/// Letters that can be sustained as a single syllable when repeated ("aaaaa", "mmmm")
pub const PRONOUNCED_LETTERS: &[char] = &[
    'a', 'e', 'f', 'h', 'i', 'l', 'm', 'n', 'o', 'r', 's', 'u', 'v', 'w', 'y', 'z',
];

static UPPER_ACRONYM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[A-Z\.]{2,}s?\b").unwrap());
static LOWER_ACRONYM: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z\.]{2,}s?\b").unwrap());

/// True if the token is one pronounceable letter, possibly repeated
pub fn is_sustained_letter(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => PRONOUNCED_LETTERS.contains(&first) && chars.all(|c| c == first),
        None => false,
    }
}

/// Collapse a trailing run of three or more of the last character to one.
///
/// "wtfffff" -> "wtf", "lmaoooo" -> "lmao". Real doubles ("stuff", "agree")
/// are kept, as is a token made of one sustainable letter ("aaaaa").
pub fn remove_repeat_last_letter(text: &str) -> String {
    let Some(last) = text.chars().last() else {
        return String::new();
    };
    if is_sustained_letter(text) {
        return text.to_string();
    }

    let stem = text.trim_end_matches(last);
    let run = text[stem.len()..].chars().count();
    if run < 3 {
        return text.to_string();
    }

    let mut collapsed = String::with_capacity(stem.len() + last.len_utf8());
    collapsed.push_str(stem);
    collapsed.push(last);
    collapsed
}

/// True if the token looks like an acronym to spell out letter by letter.
///
/// Up to five characters with a run of capitals ("NYC", "FBIs"), or up to
/// three characters with a run of lowercase letters ("idk").
pub fn might_be_acronym(text: &str) -> bool {
    if is_sustained_letter(text) {
        return false;
    }

    let len = text.chars().count();
    (len <= 5 && UPPER_ACRONYM.is_match(text)) || (len <= 3 && LOWER_ACRONYM.is_match(text))
}
