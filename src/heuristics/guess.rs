use tracing::debug;

use crate::models::GuessMode;

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u'];

fn is_vowel(c: char) -> bool {
    VOWELS.contains(&c)
}

/// Minimum and maximum plausible syllable counts for a word
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyllableRange {
    pub min: u32,
    pub max: u32,
}

/// Guess how many syllables a word has, for words no dictionary knows.
///
/// Counts vowel groups, with diphthongs adding to the maximum only, then
/// applies a handful of English spelling corrections. `mode` picks the
/// minimum, maximum, or rounded mean of the two estimates.
pub fn guess_syllables(word: &str, mode: GuessMode) -> u32 {
    let range = syllable_range(word);
    let syllables = mode.select(range.min, range.max);
    debug!(
        "Guessed '{}': min {}, max {}, {:?} -> {}",
        word, range.min, range.max, mode.method, syllables
    );
    syllables
}

/// Vowel-group scan plus spelling corrections; O(word length)
pub fn syllable_range(word: &str) -> SyllableRange {
    let chars: Vec<char> = word.to_lowercase().chars().collect();
    let len = chars.len();

    let mut min: i64 = 0;
    let mut max: i64 = 0;
    let mut on_vowel = false;
    let mut in_diphthong = false;
    let mut last_char: Option<char> = None;

    for (i, &c) in chars.iter().enumerate() {
        // y is a vowel only after a non-vowel
        let vowel = if c == 'y' { !on_vowel } else { is_vowel(c) };

        if vowel {
            if !on_vowel {
                min += 1;
                max += 1;
            } else if !in_diphthong && last_char != Some(c) {
                in_diphthong = true;
                max += 1;
            }
        } else {
            in_diphthong = false;
        }

        if i + 1 == len {
            break;
        }
        on_vowel = vowel;
        last_char = Some(c);
    }

    if len >= 3 {
        let last = chars[len - 1];
        let second_last = chars[len - 2];
        let third_last = chars[len - 3];
        let ending: String = chars[len - 2..].iter().collect();

        // silent e, or a past tense that does not add a syllable
        if (last == 'e' || ending == "ed")
            && !matches!(ending.as_str(), "be" | "ie" | "ee")
            && !matches!(third_last, 'd' | 't')
        {
            min -= 1;
        }

        // syllabic consonant endings: -ble, -dle, -tle
        if ending == "le" && !is_vowel(third_last) && third_last != 'l' {
            min += 1;
            max += 1;
        }

        // "box's" needs its own syllable for the possessive
        if ending == "'s" && third_last == 'x' {
            min += 1;
            max += 1;
        }

        if !is_vowel(second_last) && last == 'y' {
            if third_last == 'e' {
                min -= 1;
            } else {
                max += 1;
            }
        }
    }

    let lowered: String = chars.iter().collect();
    if lowered.ends_with("phobia") || lowered.ends_with("bio") {
        max += 1;
    }

    if chars.iter().any(|&c| c.is_alphanumeric() || c == '_') {
        if min <= 0 {
            min = 1;
        }
        if max <= 0 {
            max = 1;
        }
    }

    SyllableRange {
        min: min.max(0) as u32,
        max: max.max(0) as u32,
    }
}
