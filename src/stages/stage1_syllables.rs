use tracing::debug;

use crate::heuristics::{
    clean_token, expand_numeral, guess_syllables, might_be_acronym, remove_repeat_last_letter,
};
use crate::models::{GuessMode, LinguisticResources, SyllableCount, SyllableSource};

/// Suffixes after an apostrophe that mark a contraction the guesser handles whole
const CONTRACTION_ENDS: &[&str] = &["d", "ll", "m", "re", "s", "t", "ve"];

/// Configuration for syllable resolution
#[derive(Debug, Clone, Copy)]
pub struct ResolverConfig {
    /// How the phonetic guesser picks between its estimates
    pub guess_mode: GuessMode,
    /// Maximum recursive resolutions per top-level token
    pub max_recursion: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            guess_mode: GuessMode::default(),
            max_recursion: 10,
        }
    }
}

impl ResolverConfig {
    pub fn with_guess_mode(guess_mode: GuessMode) -> Self {
        Self {
            guess_mode,
            ..Default::default()
        }
    }
}

/// Recursive resolutions left for the current top-level token
#[derive(Debug)]
struct Budget {
    remaining: usize,
}

impl Budget {
    fn new(limit: usize) -> Self {
        Self { remaining: limit }
    }

    /// Take one step; false once the budget is used up
    fn spend(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}

/// A piece of a cleaned token, in the forms the strategies look at
#[derive(Debug, Clone, PartialEq, Eq)]
struct SubToken {
    /// Case-preserved text, used for acronym detection
    original: String,
    /// Lowercase text with numerals spelled out, used for lookups
    lower: String,
}

impl SubToken {
    fn new(piece: &str) -> Self {
        let original = piece.trim_matches(|c| matches!(c, '\'' | ',' | '.'));
        let mut lower = original.to_lowercase();

        if let Some(words) = expand_numeral(&lower) {
            lower = words
                .chars()
                .map(|c| if c.is_alphanumeric() || c == '_' || c == '\'' { c } else { ' ' })
                .collect::<String>()
                .trim()
                .to_string();
        }

        Self {
            original: original.to_string(),
            lower,
        }
    }
}

type Strategy = fn(&SyllableResolver<'_>, &SubToken, &mut Budget) -> Option<SyllableCount>;

/// Per-sub-token resolution strategies, tried in order; the last always answers
const STRATEGIES: &[(&str, Strategy)] = &[
    ("override_table", from_overrides),
    ("lexicon", from_lexicon),
    ("non_letter_split", split_non_letters),
    ("apostrophe", split_apostrophes),
    ("acronym", spell_acronym),
    ("guess", guess_collapsed),
];

/// Counts syllables per token against a shared set of linguistic resources
#[derive(Debug, Clone, Copy)]
pub struct SyllableResolver<'a> {
    resources: &'a LinguisticResources,
    config: ResolverConfig,
}

impl<'a> SyllableResolver<'a> {
    pub fn new(resources: &'a LinguisticResources, config: ResolverConfig) -> Self {
        Self { resources, config }
    }

    /// Syllables in one whitespace-delimited token, with where the count came from.
    ///
    /// Emoticons count zero and exact override entries win outright. Anything
    /// else is cleaned, split into sub-tokens, and each sub-token runs through
    /// the strategy list. Always terminates.
    pub fn resolve(&self, token: &str) -> SyllableCount {
        let mut budget = Budget::new(self.config.max_recursion);
        self.resolve_token(token, &mut budget)
    }

    /// Syllable count only
    pub fn count(&self, token: &str) -> u32 {
        self.resolve(token).syllables
    }

    fn resolve_token(&self, token: &str, budget: &mut Budget) -> SyllableCount {
        if self.resources.emoticons.contains(token) {
            return SyllableCount::new(0, SyllableSource::Emoticon);
        }
        if let Some(syllables) = self.resources.overrides.get(token) {
            return SyllableCount::new(syllables, SyllableSource::OverrideDict);
        }

        let cleaned = clean_token(token);
        let mut counts = Vec::new();
        for piece in cleaned.split_whitespace() {
            let sub = SubToken::new(piece);
            if sub.lower.is_empty() {
                continue;
            }

            let count = self.resolve_sub_token(&sub, budget);
            debug!("    {}: {}: {}", count.source, sub.lower, count.syllables);
            counts.push(count);
        }

        match counts.as_slice() {
            [] => SyllableCount::new(0, SyllableSource::Guess),
            [single] => *single,
            many => SyllableCount::new(
                many.iter().map(|c| c.syllables).sum(),
                SyllableSource::RecursiveSplit,
            ),
        }
    }

    fn resolve_sub_token(&self, sub: &SubToken, budget: &mut Budget) -> SyllableCount {
        STRATEGIES
            .iter()
            .find_map(|(_, strategy)| strategy(self, sub, budget))
            .unwrap_or_else(|| self.guess(&sub.lower))
    }

    /// Resolve `text` as a fresh token, or guess `fallback` once the budget is spent
    fn recurse(&self, text: &str, fallback: &str, budget: &mut Budget) -> SyllableCount {
        if !budget.spend() {
            debug!("Recursion budget exhausted at '{}', guessing", fallback);
            return self.guess(fallback);
        }
        let count = self.resolve_token(text, budget);
        SyllableCount::new(count.syllables, SyllableSource::RecursiveSplit)
    }

    fn guess(&self, word: &str) -> SyllableCount {
        SyllableCount::new(
            guess_syllables(word, self.config.guess_mode),
            SyllableSource::Guess,
        )
    }

    /// Exact, collapsed, then singular lookup
    fn lookup(
        sub: &SubToken,
        get: impl Fn(&str) -> Option<u32>,
        exact: SyllableSource,
        destemmed: SyllableSource,
    ) -> Option<SyllableCount> {
        if let Some(syllables) = get(&sub.lower) {
            return Some(SyllableCount::new(syllables, exact));
        }
        if let Some(syllables) = get(&remove_repeat_last_letter(&sub.lower)) {
            return Some(SyllableCount::new(syllables, destemmed));
        }
        if let Some(singular) = sub.lower.strip_suffix(['s', 'z']) {
            if let Some(syllables) = get(singular) {
                return Some(SyllableCount::new(syllables, destemmed));
            }
        }
        None
    }
}

fn from_overrides(
    resolver: &SyllableResolver<'_>,
    sub: &SubToken,
    _: &mut Budget,
) -> Option<SyllableCount> {
    SyllableResolver::lookup(
        sub,
        |w| resolver.resources.overrides.get(w),
        SyllableSource::OverrideDict,
        SyllableSource::OverrideDictDestemmed,
    )
}

fn from_lexicon(
    resolver: &SyllableResolver<'_>,
    sub: &SubToken,
    _: &mut Budget,
) -> Option<SyllableCount> {
    SyllableResolver::lookup(
        sub,
        |w| resolver.resources.lexicon.get(w),
        SyllableSource::Lexicon,
        SyllableSource::LexiconDestemmed,
    )
}

fn split_non_letters(
    resolver: &SyllableResolver<'_>,
    sub: &SubToken,
    budget: &mut Budget,
) -> Option<SyllableCount> {
    let has_non_letter = sub
        .lower
        .chars()
        .any(|c| !(c.is_alphanumeric() || c == '_' || c == '\''));
    has_non_letter.then(|| resolver.recurse(&sub.lower, &sub.lower, budget))
}

fn split_apostrophes(
    resolver: &SyllableResolver<'_>,
    sub: &SubToken,
    budget: &mut Budget,
) -> Option<SyllableCount> {
    let (_, ending) = sub.lower.rsplit_once('\'')?;
    if CONTRACTION_ENDS.contains(&ending) {
        return Some(resolver.guess(&sub.lower));
    }

    let syllables = sub
        .lower
        .split('\'')
        .filter(|piece| !piece.is_empty())
        .map(|piece| resolver.recurse(piece, piece, budget).syllables)
        .sum();
    Some(SyllableCount::new(syllables, SyllableSource::RecursiveSplit))
}

fn spell_acronym(
    resolver: &SyllableResolver<'_>,
    sub: &SubToken,
    budget: &mut Budget,
) -> Option<SyllableCount> {
    if !might_be_acronym(&sub.original) {
        return None;
    }
    let letters = sub
        .lower
        .chars()
        .map(String::from)
        .collect::<Vec<_>>()
        .join(" ");
    Some(resolver.recurse(&letters, &sub.lower, budget))
}

fn guess_collapsed(
    resolver: &SyllableResolver<'_>,
    sub: &SubToken,
    _: &mut Budget,
) -> Option<SyllableCount> {
    Some(resolver.guess(&remove_repeat_last_letter(&sub.lower)))
}

/// Syllables in `token`, with its source tag
pub fn resolve_syllables(
    token: &str,
    resources: &LinguisticResources,
    guess_mode: GuessMode,
) -> SyllableCount {
    SyllableResolver::new(resources, ResolverConfig::with_guess_mode(guess_mode)).resolve(token)
}

/// Syllables in `token`; never fails, never negative
pub fn count_syllables(token: &str, resources: &LinguisticResources, guess_mode: GuessMode) -> u32 {
    resolve_syllables(token, resources, guess_mode).syllables
}
