use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// A named, pure transformation in the token cleaning pipeline
pub type CleanStep = (&'static str, fn(&str) -> String);

/// Steps applied by [`clean_token`], in order
pub const CLEAN_STEPS: &[CleanStep] = &[
    ("normalize_nfkc", normalize_nfkc),
    ("space_after_clause_punct", space_after_clause_punct),
    ("space_after_period_comma", space_after_period_comma),
    ("join_spaced_apostrophe", join_spaced_apostrophe),
    ("pad_joining_symbols", pad_joining_symbols),
    ("asterisk_as_vowel", asterisk_as_vowel),
    ("space_after_symbol", space_after_symbol),
    ("space_before_symbol", space_before_symbol),
    ("expand_slash_idioms", expand_slash_idioms),
    ("spell_out_symbols", spell_out_symbols),
    ("keep_word_punct", keep_word_punct),
];

/// Symbols read aloud as words
const SPOKEN_SYMBOLS: &[(char, &str)] = &[
    ('@', "at"),
    ('#', "number"),
    ('&', "and"),
    ('%', "percent"),
    ('=', "equals"),
    ('×', "times"),
    ('+', "plus"),
];

static SLASH_IDIOMS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)\bb / c\b", "because"),
        (r"(?i)\bb / t\b", "between"),
        (r"(?i)\bw / o\b", "without"),
        (r"(?i)\bw /\s\b", "with "),
        (r"(?i)\bw /\b", "with"),
        (r"(?i)\ba\b\*", "a star"),
    ]
    .into_iter()
    .map(|(pattern, word)| (Regex::new(pattern).unwrap(), word))
    .collect()
});

static SPACED_APOSTROPHE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w)\s'(\w)").unwrap());

/// Split glued punctuation, spell out symbols, and strip everything except
/// letters, digits, apostrophes, commas and periods.
///
/// Pure; safe to call again on any piece of its own output.
pub fn clean_token(token: &str) -> String {
    CLEAN_STEPS
        .iter()
        .fold(token.to_string(), |text, (_, step)| step(&text))
}

pub(crate) fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Insert a space between each adjacent pair of chars matching `split_here`
fn space_between(text: &str, split_here: impl Fn(char, char) -> bool) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if prev.is_some_and(|p| split_here(p, c)) {
            out.push(' ');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

/// Rewrite chars that sit between two word chars
fn between_word_chars(text: &str, rewrite: impl Fn(char) -> Option<String>) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        let enclosed = i > 0
            && i + 1 < chars.len()
            && is_word_char(chars[i - 1])
            && is_word_char(chars[i + 1]);
        match rewrite(c).filter(|_| enclosed) {
            Some(replacement) => out.push_str(&replacement),
            None => out.push(c),
        }
    }
    out
}

pub fn normalize_nfkc(text: &str) -> String {
    text.nfkc().collect()
}

/// "cat;dog" -> "cat; dog"
pub fn space_after_clause_punct(text: &str) -> String {
    space_between(text, |p, c| matches!(p, ';' | '!' | '?') && is_word_char(c))
}

/// "good.What" -> "good. What"
pub fn space_after_period_comma(text: &str) -> String {
    space_between(text, |p, c| matches!(p, '.' | ',') && c.is_ascii_alphabetic())
}

/// "don 't" -> "don't"
pub fn join_spaced_apostrophe(text: &str) -> String {
    SPACED_APOSTROPHE.replace_all(text, "${1}'${2}").into_owned()
}

/// "rock&roll" -> "rock & roll"
pub fn pad_joining_symbols(text: &str) -> String {
    between_word_chars(text, |c| {
        matches!(c, '#' | '@' | '&' | '%' | '=' | '+' | '/' | '×' | '-')
            .then(|| format!(" {} ", c))
    })
}

/// "f*ck" -> "fuck"
pub fn asterisk_as_vowel(text: &str) -> String {
    between_word_chars(text, |c| (c == '*').then(|| "u".to_string()))
}

/// "#1" -> "# 1"
pub fn space_after_symbol(text: &str) -> String {
    space_between(text, |p, c| {
        matches!(p, '#' | '@' | '&' | '=' | '+' | '/' | '×') && is_word_char(c)
    })
}

/// "50%" -> "50 %"
pub fn space_before_symbol(text: &str) -> String {
    space_between(text, |p, c| {
        is_word_char(p) && matches!(c, '#' | '@' | '&' | '%' | '=' | '+' | '/' | '×')
    })
}

/// "b / c" -> "because", "w / o" -> "without", ...
pub fn expand_slash_idioms(text: &str) -> String {
    SLASH_IDIOMS
        .iter()
        .fold(text.to_string(), |acc, (re, word)| re.replace_all(&acc, *word).into_owned())
}

/// "@" -> "at", "&" -> "and", ...
pub fn spell_out_symbols(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match SPOKEN_SYMBOLS.iter().find(|(symbol, _)| *symbol == c) {
            Some((_, word)) => out.push_str(word),
            None => out.push(c),
        }
    }
    out
}

/// Replace everything but word chars, apostrophes, commas and periods with spaces
pub fn keep_word_punct(text: &str) -> String {
    text.chars()
        .map(|c| {
            if is_word_char(c) || matches!(c, '\'' | ',' | '.') {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .trim()
        .to_string()
}
