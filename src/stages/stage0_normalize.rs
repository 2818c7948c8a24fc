use deunicode::deunicode_char;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Invisible or filler characters that must never reach the segmenter
pub const DENY_LIST: &[(char, &str)] = &[
    ('\u{3164}', "HANGUL FILLER"),
    ('\u{FFA0}', "HALFWIDTH HANGUL FILLER"),
    ('\u{115F}', "HANGUL CHOSEONG FILLER"),
    ('\u{1160}', "HANGUL JUNGSEONG FILLER"),
    ('\u{2800}', "BRAILLE PATTERN BLANK"),
    ('\u{00AD}', "SOFT HYPHEN"),
    ('\u{2060}', "WORD JOINER"),
    ('\u{FEFF}', "ZERO WIDTH NO-BREAK SPACE"),
    ('\u{200B}', "ZERO WIDTH SPACE"),
    ('\u{200C}', "ZERO WIDTH NON-JOINER"),
    ('\u{200E}', "LEFT-TO-RIGHT MARK"),
    ('\u{200F}', "RIGHT-TO-LEFT MARK"),
];

/// Windows-1252 characters occupying 0x80..0x9F, with their byte values
const CP1252_HIGH: &[(char, u8)] = &[
    ('€', 0x80),
    ('‚', 0x82),
    ('ƒ', 0x83),
    ('„', 0x84),
    ('…', 0x85),
    ('†', 0x86),
    ('‡', 0x87),
    ('ˆ', 0x88),
    ('‰', 0x89),
    ('Š', 0x8A),
    ('‹', 0x8B),
    ('Œ', 0x8C),
    ('Ž', 0x8E),
    ('‘', 0x91),
    ('’', 0x92),
    ('“', 0x93),
    ('”', 0x94),
    ('•', 0x95),
    ('–', 0x96),
    ('—', 0x97),
    ('˜', 0x98),
    ('™', 0x99),
    ('š', 0x9A),
    ('›', 0x9B),
    ('œ', 0x9C),
    ('ž', 0x9E),
    ('Ÿ', 0x9F),
];

/// Letters and marks without a useful compatibility decomposition
const ASCII_FOLDS: &[(char, &str)] = &[
    ('ß', "ss"),
    ('æ', "ae"),
    ('Æ', "AE"),
    ('œ', "oe"),
    ('Œ', "OE"),
    ('ø', "o"),
    ('Ø', "O"),
    ('đ', "d"),
    ('Đ', "D"),
    ('ð', "d"),
    ('Ð', "D"),
    ('ł', "l"),
    ('Ł', "L"),
    ('þ', "th"),
    ('Þ', "Th"),
    ('ı', "i"),
    ('‘', "'"),
    ('’', "'"),
    ('“', "\""),
    ('”', "\""),
    ('«', "\""),
    ('»', "\""),
    ('–', "-"),
    ('—', "-"),
    ('…', "..."),
    ('•', "*"),
    ('⁄', "/"),
    ('¡', "!"),
    ('¿', "?"),
    ('€', "EUR"),
    ('×', "x"),
];

/// Characters that continue an emoji sequence without being emoji themselves
const EMOJI_KEEP: &[char] = &[
    '\u{200D}', // zero width joiner
    '\u{FE0E}',
    '\u{FE0F}',
    '\u{2640}',
    '\u{2642}',
    '\u{20E3}', // combining keycap
];

static HTML_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&(#[0-9]{1,7}|#[xX][0-9a-fA-F]{1,6}|[a-zA-Z]{2,8});").unwrap());

/// Normalize raw post text for syllable counting.
///
/// Repairs encoding damage, drops deny-listed fillers, transliterates
/// everything outside emoji sequences to ASCII, and collapses whitespace.
/// Never fails; empty input gives empty output.
pub fn normalize(text: &str) -> String {
    let repaired: String = repair(text).chars().filter(|c| !is_denied(*c)).collect();

    let mut out = String::with_capacity(repaired.len());
    for segment in split_emoji(&repaired) {
        match segment {
            Segment::Emoji(run) => out.push_str(run),
            Segment::Text(run) => out.push_str(&transliterate(run)),
        }
    }

    collapse_whitespace(&out)
}

/// Undo common encoding damage without changing anything else.
///
/// Each word that decodes cleanly as UTF-8 after being re-encoded as
/// Windows-1252 is replaced by the decoded form ("cafÃ©" -> "café"). HTML
/// entities are unescaped, curly quotes straightened, control characters
/// dropped, and the result NFC-composed.
pub fn repair(text: &str) -> String {
    let fixed = map_words(text, fix_double_encoding);
    let unescaped = HTML_ENTITY.replace_all(&fixed, |caps: &Captures| {
        unescape_entity(&caps[1]).unwrap_or_else(|| caps[0].to_string())
    });

    unescaped
        .chars()
        .filter_map(|c| match c {
            '‘' | '’' | '‚' | '‛' | '′' => Some('\''),
            '“' | '”' | '„' | '‟' | '″' => Some('"'),
            c if c.is_control() && !c.is_whitespace() => None,
            c => Some(c),
        })
        .nfc()
        .collect()
}

/// True for deny-listed characters
pub fn is_denied(c: char) -> bool {
    DENY_LIST.iter().any(|(denied, _)| *denied == c)
}

/// True for pictographic code points that should survive normalization
pub fn is_emoji(c: char) -> bool {
    matches!(
        c as u32,
        0x1F000..=0x1FAFF   // pictographs, emoticons, transport, flags, skin tones
            | 0x2600..=0x27BF // misc symbols and dingbats
            | 0x2300..=0x23FF // watch, hourglass, media controls
            | 0x2B05..=0x2B55 // arrows, stars, circles
            | 0x2194..=0x21AA
            | 0x3030
            | 0x303D
            | 0x3297
            | 0x3299
            | 0x00A9
            | 0x00AE
            | 0x203C
            | 0x2049
            | 0x2122
            | 0x2139
            | 0xE0020..=0xE007F // tag sequences for subdivision flags
    )
}

#[derive(Debug, PartialEq, Eq)]
enum Segment<'a> {
    Emoji(&'a str),
    Text(&'a str),
}

/// Split into alternating emoji sequences and plain text
fn split_emoji(text: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_emoji = false;

    for (i, c) in text.char_indices() {
        let emoji = is_emoji(c) || (in_emoji && EMOJI_KEEP.contains(&c));
        if emoji != in_emoji && i > start {
            let run = &text[start..i];
            segments.push(if in_emoji { Segment::Emoji(run) } else { Segment::Text(run) });
            start = i;
        }
        in_emoji = emoji;
    }

    if start < text.len() {
        let run = &text[start..];
        segments.push(if in_emoji { Segment::Emoji(run) } else { Segment::Text(run) });
    }
    segments
}

/// Closest ASCII rendering.
///
/// Latin letters fold through the table or lose their accents under NFKD.
/// Other scripts are romanized ("Привет" -> "Privet"); characters with no
/// romanization vanish.
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else if let Some(folded) = fold(c) {
            out.push_str(folded);
        } else if c.is_whitespace() {
            out.push(' ');
        } else {
            let stripped: String = c.nfkd().filter(|d| !is_combining_mark(*d)).collect();
            if !stripped.is_empty() && stripped.is_ascii() {
                out.push_str(&stripped);
            } else if let Some(romanized) = deunicode_char(c) {
                out.push_str(romanized);
            }
        }
    }
    out
}

fn fold(c: char) -> Option<&'static str> {
    ASCII_FOLDS.iter().find(|(from, _)| *from == c).map(|(_, to)| *to)
}

/// Collapse every whitespace run to a single space and trim
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Apply `f` to each maximal non-whitespace run, keeping whitespace as is
fn map_words(text: &str, f: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start: Option<usize> = None;

    let flush = |out: &mut String, word: &str| match f(word) {
        Some(fixed) => out.push_str(&fixed),
        None => out.push_str(word),
    };

    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if let Some(start) = word_start.take() {
                flush(&mut out, &text[start..i]);
            }
            out.push(c);
        } else if word_start.is_none() {
            word_start = Some(i);
        }
    }
    if let Some(start) = word_start {
        flush(&mut out, &text[start..]);
    }
    out
}

/// Re-encode as Windows-1252 and decode as UTF-8, if that works and changes something
fn fix_double_encoding(word: &str) -> Option<String> {
    if word.is_ascii() {
        return None;
    }

    let bytes = word
        .chars()
        .map(|c| match c as u32 {
            0x00..=0xFF => Some(c as u32 as u8),
            _ => CP1252_HIGH.iter().find(|(ch, _)| *ch == c).map(|(_, b)| *b),
        })
        .collect::<Option<Vec<u8>>>()?;

    String::from_utf8(bytes).ok().filter(|decoded| decoded != word)
}

fn unescape_entity(entity: &str) -> Option<String> {
    if let Some(numeric) = entity.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse().ok()?,
        };
        return char::from_u32(code).map(String::from);
    }

    let named = match entity {
        "amp" => "&",
        "lt" => "<",
        "gt" => ">",
        "quot" => "\"",
        "apos" => "'",
        "nbsp" => " ",
        "hellip" => "…",
        "mdash" => "—",
        "ndash" => "–",
        "lsquo" | "rsquo" => "'",
        "ldquo" | "rdquo" => "\"",
        _ => return None,
    };
    Some(named.to_string())
}
