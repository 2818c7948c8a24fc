use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::models::{
    split_tokens, GuessMode, HaikuCandidate, HaikuLine, LinguisticResources, SyllableCount, Token,
    HAIKU_BOUNDARIES,
};
use crate::stages::{ResolverConfig, SyllableResolver};

/// Why a text did not segment into a haiku
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// No tokens at all
    Empty,
    /// All three lines closed but more syllables follow
    Overflow { at_token: usize },
    /// Input ended before all three boundaries were hit exactly
    Incomplete { syllables: u32 },
}

/// Outcome of running the line automaton over a token stream
#[derive(Debug)]
pub enum Segmentation {
    Haiku([HaikuLine; 3]),
    Rejected(Rejection),
}

/// Greedily pack tokens into lines closing at exactly 5, 12 and 17 syllables.
///
/// Tokens with a non-word character and no syllables (punctuation, emoji,
/// emoticons) attach to the line that last received a counted token, so they
/// never open a line. Overshooting a boundary is not corrected; it simply
/// means the text is not a haiku.
pub fn segment_tokens(tokens: &[&str], resolver: &SyllableResolver<'_>) -> Segmentation {
    if tokens.is_empty() {
        return Segmentation::Rejected(Rejection::Empty);
    }

    let counts: Vec<SyllableCount> = tokens.iter().map(|t| resolver.resolve(t)).collect();
    let mut lines: [HaikuLine; 3] = Default::default();
    let mut total = 0;
    let mut line = 0;
    let mut last_active = 0;

    for (i, (&text, &count)) in tokens.iter().zip(&counts).enumerate() {
        let token = Token::new(text, i, count);
        let syllables = token.syllables;
        debug!("Token '{}': {} syllables ({})", text, syllables, count.source);

        if syllables == 0 && (token.has_non_word_char() || line >= HAIKU_BOUNDARIES.len()) {
            lines[last_active].push(token);
            continue;
        }

        lines[line].push(token);
        last_active = line;
        total += syllables;

        if total == HAIKU_BOUNDARIES[line] {
            line += 1;
        }

        if line >= HAIKU_BOUNDARIES.len() {
            let remaining: u32 = counts[i + 1..].iter().map(|c| c.syllables).sum();
            if remaining > 0 {
                debug!("{} more syllables after the third line", remaining);
                return Segmentation::Rejected(Rejection::Overflow { at_token: i });
            }
        }
    }

    if line == HAIKU_BOUNDARIES.len() {
        Segmentation::Haiku(lines)
    } else {
        debug!("Ran out of tokens at {} syllables on line {}", total, line + 1);
        Segmentation::Rejected(Rejection::Incomplete { syllables: total })
    }
}

/// Segment normalized text into a haiku candidate, if it is one.
///
/// The candidate gets a generated source id and the current time; callers
/// attach the real post id with [`HaikuCandidate::with_source`].
pub fn segment(
    text: &str,
    resources: &LinguisticResources,
    guess_mode: GuessMode,
) -> Option<HaikuCandidate> {
    let resolver = SyllableResolver::new(resources, ResolverConfig::with_guess_mode(guess_mode));
    segment_with(text, &resolver)
}

/// [`segment`] with an explicitly configured resolver
pub fn segment_with(text: &str, resolver: &SyllableResolver<'_>) -> Option<HaikuCandidate> {
    match segment_tokens(&split_tokens(text), resolver) {
        Segmentation::Haiku(lines) => Some(HaikuCandidate {
            source_id: Uuid::new_v4().to_string(),
            screen_name: None,
            text_original: text.to_string(),
            text_clean: text.to_string(),
            lines,
            discovered_at: Utc::now(),
        }),
        Segmentation::Rejected(reason) => {
            debug!("No haiku: {:?}", reason);
            None
        }
    }
}

/// The haiku as three newline-separated lines, or an empty string
pub fn find_haiku(text: &str, resources: &LinguisticResources, guess_mode: GuessMode) -> String {
    segment(text, resources, guess_mode)
        .map(|candidate| candidate.haiku())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmoticonSet, PronunciationLexicon, SyllableOverrideTable};

    const LEXICON: &[(&str, &str)] = &[
        ("i", "AY1"),
        ("am", "AE1 M"),
        ("a", "AH0"),
        ("cat", "K AE1 T"),
        ("sitting", "S IH1 T IH0 NG"),
        ("on", "AA1 N"),
        ("mat", "M AE1 T"),
        ("right", "R AY1 T"),
        ("here", "HH IY1 R"),
        ("that", "DH AE1 T"),
        ("is", "IH1 Z"),
        ("so", "S OW1"),
        ("funny", "F AH1 N IY0"),
        ("today", "T AH0 D EY1"),
        ("hi", "HH AY1"),
        ("bye", "B AY1"),
        ("the", "DH AH0"),
        ("old", "OW1 L D"),
        ("pond", "P AA1 N D"),
        ("frog", "F R AA1 G"),
        ("jumps", "JH AH1 M P S"),
        ("in", "IH1 N"),
        ("sound", "S AW1 N D"),
        ("of", "AH1 V"),
        ("water", "W AO1 T ER0"),
        ("again", "AH0 G EH1 N"),
        ("silent", "S AY1 L AH0 N T"),
        ("into", "IH1 N T UW0"),
        ("splash", "S P L AE1 SH"),
        ("silence", "S AY1 L AH0 N S"),
        ("an", "AE1 N"),
    ];

    fn resources() -> LinguisticResources {
        let mut lexicon = PronunciationLexicon::new();
        for (word, transcription) in LEXICON {
            let phones: Vec<&str> = transcription.split_whitespace().collect();
            lexicon.insert(word, &[phones]).unwrap();
        }
        let overrides: SyllableOverrideTable = [("lol", 3)].into_iter().collect();
        let emoticons: EmoticonSet = [":)"].into_iter().collect();
        LinguisticResources::new(overrides, lexicon, emoticons)
    }

    fn lines_of(text: &str) -> Option<[u32; 3]> {
        segment(text, &resources(), GuessMode::default()).map(|c| c.line_syllables())
    }

    #[test]
    fn test_cat_on_a_mat() {
        let text = "I am a cat who is sitting on a mat right here in the sunlight";
        assert_eq!(lines_of(text), Some([5, 7, 5]));

        let haiku = find_haiku(text, &resources(), GuessMode::default());
        assert_eq!(
            haiku,
            "I am a cat who\nis sitting on a mat right\nhere in the sunlight"
        );
    }

    #[test]
    fn test_override_counts_in_segmentation() {
        let resolver_resources = resources();
        let resolver = SyllableResolver::new(&resolver_resources, ResolverConfig::default());
        assert_eq!(resolver.count("lol"), 3);
        // lol(3) that(1) is(1) so(1) funny(2) today(2) = 10, not a haiku
        assert_eq!(lines_of("lol that is so funny today"), None);
    }

    #[test]
    fn test_punctuation_attaches_to_previous_line() {
        let text = "an old silent pond . a frog jumps into the pond ! splash silence again :)";
        let candidate = segment(text, &resources(), GuessMode::default()).unwrap();

        assert_eq!(candidate.line_syllables(), [5, 7, 5]);
        assert_eq!(candidate.lines[0].to_string(), "an old silent pond .");
        assert_eq!(candidate.lines[1].to_string(), "a frog jumps into the pond !");
        assert_eq!(candidate.lines[2].to_string(), "splash silence again :)");
    }

    #[test]
    fn test_leading_punctuation_goes_to_first_line() {
        let text = "... an old silent pond a frog jumps into the pond splash silence again";
        let candidate = segment(text, &resources(), GuessMode::default()).unwrap();
        assert_eq!(candidate.lines[0].tokens[0].text, "...");
    }

    #[test]
    fn test_no_line_is_only_punctuation() {
        let resources = resources();
        let resolver = SyllableResolver::new(&resources, ResolverConfig::default());
        let Segmentation::Rejected(_) = segment_tokens(&["Hi", ".", "Bye", "!"], &resolver) else {
            panic!("two syllables cannot be a haiku");
        };

        let text = "an old silent pond . . a frog jumps into the pond ! splash silence again !";
        let candidate = segment(text, &resources, GuessMode::default()).unwrap();
        for line in &candidate.lines {
            assert!(line.tokens.first().is_some_and(|t| t.syllables > 0));
        }
    }

    #[test]
    fn test_boundaries_are_exact() {
        let text = "an old silent pond a frog jumps into the pond splash silence again";
        let candidate = segment(text, &resources(), GuessMode::default()).unwrap();

        let mut running = 0;
        for (line, boundary) in candidate.lines.iter().zip(HAIKU_BOUNDARIES) {
            running += line.syllables();
            assert_eq!(running, boundary);
        }
    }

    #[test]
    fn test_extra_trailing_word_rejects() {
        let resources = resources();
        let resolver = SyllableResolver::new(&resources, ResolverConfig::default());
        let text = "an old silent pond a frog jumps into the pond splash silence again cat";
        let tokens = split_tokens(text);

        assert!(matches!(
            segment_tokens(&tokens, &resolver),
            Segmentation::Rejected(Rejection::Overflow { at_token: 12 })
        ));
        assert_eq!(find_haiku(text, &resources, GuessMode::default()), "");
    }

    #[test]
    fn test_trailing_zero_syllable_tokens_are_fine() {
        let text = "an old silent pond a frog jumps into the pond splash silence again ! :)";
        assert_eq!(lines_of(text), Some([5, 7, 5]));
    }

    #[test]
    fn test_overshoot_rejects() {
        // "sitting" jumps from 4 to 6, skipping the first boundary
        let text = "i am a cat sitting on a mat right here";
        assert_eq!(lines_of(text), None);
    }

    #[test]
    fn test_short_and_empty_input() {
        let resources = resources();
        let resolver = SyllableResolver::new(&resources, ResolverConfig::default());
        assert!(matches!(
            segment_tokens(&[], &resolver),
            Segmentation::Rejected(Rejection::Empty)
        ));
        assert_eq!(find_haiku("", &resources, GuessMode::default()), "");
        assert_eq!(find_haiku("   ", &resources, GuessMode::default()), "");
        assert_eq!(find_haiku("hi there", &resources, GuessMode::default()), "");
        assert_eq!(find_haiku("... !!! ?", &resources, GuessMode::default()), "");
    }

    #[test]
    fn test_segmentation_is_deterministic() {
        let resources = resources();
        let text = "an old silent pond a frog jumps into the pond splash silence again";
        let first = find_haiku(text, &resources, GuessMode::default());
        for _ in 0..5 {
            assert_eq!(find_haiku(text, &resources, GuessMode::default()), first);
        }
    }
}
