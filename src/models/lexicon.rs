use std::collections::{HashMap, HashSet};

use crate::error::ResourceError;

/// Caller-supplied exact syllable counts, keyed by lowercase word
#[derive(Debug, Clone, Default)]
pub struct SyllableOverrideTable {
    entries: HashMap<String, u32>,
}

impl SyllableOverrideTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; the key is lowercased
    pub fn insert(&mut self, word: &str, syllables: u32) {
        self.entries.insert(word.to_lowercase(), syllables);
    }

    /// Exact, case-sensitive lookup
    pub fn get(&self, word: &str) -> Option<u32> {
        self.entries.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, u32)> for SyllableOverrideTable {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (word, syllables) in iter {
            table.insert(word.as_ref(), syllables);
        }
        table
    }
}

/// Pronunciation dictionary reduced to per-word syllable counts
///
/// A word may have several transcriptions; the count kept is the largest
/// number of stress-marked vowels across them, so a word is never
/// under-counted.
#[derive(Debug, Clone, Default)]
pub struct PronunciationLexicon {
    entries: HashMap<String, u32>,
}

impl PronunciationLexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add transcriptions for a word. Rejects words with no usable transcription.
    pub fn insert<T: AsRef<str>>(
        &mut self,
        word: &str,
        transcriptions: &[Vec<T>],
    ) -> Result<(), ResourceError> {
        if transcriptions.is_empty() {
            return Err(ResourceError::InvalidLexiconEntry {
                word: word.to_string(),
                reason: "no transcriptions".to_string(),
            });
        }
        if transcriptions.iter().any(|t| t.is_empty()) {
            return Err(ResourceError::InvalidLexiconEntry {
                word: word.to_string(),
                reason: "empty transcription".to_string(),
            });
        }

        let syllables = transcriptions
            .iter()
            .map(|t| stressed_vowel_count(t))
            .max()
            .unwrap_or(0);

        let entry = self.entries.entry(word.to_lowercase()).or_insert(0);
        *entry = (*entry).max(syllables);
        Ok(())
    }

    /// Syllables for an exact lowercase word
    pub fn get(&self, word: &str) -> Option<u32> {
        self.entries.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Number of phonemes carrying a stress digit (AH0, EY1, ...)
pub fn stressed_vowel_count<T: AsRef<str>>(phonemes: &[T]) -> u32 {
    phonemes
        .iter()
        .filter(|p| p.as_ref().chars().last().is_some_and(|c| c.is_ascii_digit()))
        .count() as u32
}

/// Literal text emoticons worth zero syllables
#[derive(Debug, Clone, Default)]
pub struct EmoticonSet {
    entries: HashSet<String>,
}

impl EmoticonSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains(token)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for EmoticonSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Everything the syllable resolver reads. Built once, shared read-only.
#[derive(Debug, Clone, Default)]
pub struct LinguisticResources {
    pub overrides: SyllableOverrideTable,
    pub lexicon: PronunciationLexicon,
    pub emoticons: EmoticonSet,
}

impl LinguisticResources {
    pub fn new(
        overrides: SyllableOverrideTable,
        lexicon: PronunciationLexicon,
        emoticons: EmoticonSet,
    ) -> Self {
        Self {
            overrides,
            lexicon,
            emoticons,
        }
    }
}
