use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Token;

/// Cumulative syllable totals at which lines 1, 2 and 3 close
pub const HAIKU_BOUNDARIES: [u32; 3] = [5, 12, 17];

/// One line of a haiku
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HaikuLine {
    pub tokens: Vec<Token>,
}

impl HaikuLine {
    /// Syllables contributed by this line's tokens
    pub fn syllables(&self) -> u32 {
        self.tokens.iter().map(|t| t.syllables).sum()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }
}

impl fmt::Display for HaikuLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words: Vec<&str> = self.tokens.iter().map(|t| t.text.as_str()).collect();
        f.write_str(&words.join(" "))
    }
}

/// An accepted 5-7-5 grouping with a back-reference to where it came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HaikuCandidate {
    /// Identifier of the source post (caller supplied, or generated)
    pub source_id: String,
    /// Author of the source post, if known
    #[serde(default)]
    pub screen_name: Option<String>,
    /// Original text before normalization
    pub text_original: String,
    /// Normalized text the lines were cut from
    pub text_clean: String,
    /// The three lines
    pub lines: [HaikuLine; 3],
    /// When the candidate was found
    pub discovered_at: DateTime<Utc>,
}

impl HaikuCandidate {
    /// Attach a caller-supplied identity to a freshly segmented candidate
    pub fn with_source(mut self, source_id: &str, screen_name: Option<&str>) -> Self {
        self.source_id = source_id.to_string();
        self.screen_name = screen_name.map(str::to_string);
        self
    }

    /// Attach the pre-normalization text
    pub fn with_original_text(mut self, text: &str) -> Self {
        self.text_original = text.to_string();
        self
    }

    /// Per-line syllable totals
    pub fn line_syllables(&self) -> [u32; 3] {
        [
            self.lines[0].syllables(),
            self.lines[1].syllables(),
            self.lines[2].syllables(),
        ]
    }

    /// The haiku as three newline-separated lines
    pub fn haiku(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for HaikuCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}\n{}", self.lines[0], self.lines[1], self.lines[2])
    }
}

/// Engagement counters for a source post, fetched fresh at ranking time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Engagement {
    pub favorite_count: u64,
    pub retweet_count: u64,
    pub followers_count: u64,
    pub verified: bool,
    #[serde(default)]
    pub screen_name: Option<String>,
}

/// A candidate together with the engagement it was ranked on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedCandidate {
    pub candidate: HaikuCandidate,
    pub engagement: Engagement,
}

impl RankedCandidate {
    /// Screen name to credit: freshly fetched if present, else the one recorded at discovery
    pub fn author(&self) -> Option<&str> {
        self.engagement
            .screen_name
            .as_deref()
            .or(self.candidate.screen_name.as_deref())
    }

    /// The haiku followed by an attribution line
    pub fn attributed(&self) -> String {
        match self.author() {
            Some(name) => format!("{}\n\nA haiku by @{}", self.candidate, name),
            None => self.candidate.to_string(),
        }
    }

    /// Link to the source post
    pub fn source_url(&self) -> Option<String> {
        self.author()
            .map(|name| format!("https://twitter.com/{}/status/{}", name, self.candidate.source_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SyllableCount, SyllableSource};

    fn line(words: &[(&str, u32)]) -> HaikuLine {
        HaikuLine {
            tokens: words
                .iter()
                .enumerate()
                .map(|(i, (w, n))| {
                    Token::new(w, i, SyllableCount::new(*n, SyllableSource::Lexicon))
                })
                .collect(),
        }
    }

    const BASHO: &str = "an old silent pond a frog jumps into the pond splash silence again";

    fn candidate() -> HaikuCandidate {
        HaikuCandidate {
            source_id: "1234".to_string(),
            screen_name: Some("basho".to_string()),
            text_original: BASHO.to_string(),
            text_clean: BASHO.to_string(),
            lines: [
                line(&[("an", 1), ("old", 1), ("silent", 2), ("pond", 1)]),
                line(&[("a", 1), ("frog", 1), ("jumps", 1), ("into", 2), ("the", 1), ("pond", 1)]),
                line(&[("splash", 1), ("silence", 2), ("again", 2)]),
            ],
            discovered_at: Utc::now(),
        }
    }

    #[test]
    fn test_display_and_counts() {
        let c = candidate();
        assert_eq!(c.line_syllables(), [5, 7, 5]);
        assert_eq!(
            c.haiku(),
            "an old silent pond\na frog jumps into the pond\nsplash silence again"
        );
    }

    #[test]
    fn test_attribution_prefers_fresh_screen_name() {
        let ranked = RankedCandidate {
            candidate: candidate(),
            engagement: Engagement {
                screen_name: Some("matsuo".to_string()),
                ..Default::default()
            },
        };

        assert!(ranked.attributed().ends_with("A haiku by @matsuo"));
        assert_eq!(
            ranked.source_url().as_deref(),
            Some("https://twitter.com/matsuo/status/1234")
        );
    }
}
