use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Where a syllable count came from. Diagnostic only; never drives control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyllableSource {
    /// Whole token is a listed emoticon
    Emoticon,
    /// Exact entry in the override table
    OverrideDict,
    /// Override table after collapsing a repeated last letter or dropping a plural ending
    OverrideDictDestemmed,
    /// Exact entry in the pronunciation lexicon
    Lexicon,
    /// Lexicon after collapsing a repeated last letter or dropping a plural ending
    LexiconDestemmed,
    /// Sum over pieces produced by splitting the token
    RecursiveSplit,
    /// Vowel-group heuristic
    Guess,
}

impl fmt::Display for SyllableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Emoticon => "emoticon",
            Self::OverrideDict => "override-dict",
            Self::OverrideDictDestemmed => "override-dict-destemmed",
            Self::Lexicon => "lexicon",
            Self::LexiconDestemmed => "lexicon-destemmed",
            Self::RecursiveSplit => "recursive-split",
            Self::Guess => "guess",
        };
        f.write_str(name)
    }
}

/// A syllable count with its provenance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyllableCount {
    pub syllables: u32,
    pub source: SyllableSource,
}

impl SyllableCount {
    pub fn new(syllables: u32, source: SyllableSource) -> Self {
        Self { syllables, source }
    }
}

/// Which of the guesser's estimates to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuessMethod {
    Min,
    #[default]
    Mean,
    Max,
}

impl FromStr for GuessMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "min" => Ok(Self::Min),
            "mean" => Ok(Self::Mean),
            "max" => Ok(Self::Max),
            other => Err(format!("unknown guess method '{}' (expected min, mean or max)", other)),
        }
    }
}

/// Rounding applied to the mean of the min and max estimates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundDirection {
    #[default]
    Down,
    Up,
}

impl FromStr for RoundDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "down" => Ok(Self::Down),
            "up" => Ok(Self::Up),
            other => Err(format!("unknown rounding direction '{}' (expected down or up)", other)),
        }
    }
}

/// Guesser configuration: estimate selection plus mean rounding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GuessMode {
    pub method: GuessMethod,
    pub round: RoundDirection,
}

impl GuessMode {
    pub const MIN: Self = Self { method: GuessMethod::Min, round: RoundDirection::Down };
    pub const MEAN: Self = Self { method: GuessMethod::Mean, round: RoundDirection::Down };
    pub const MAX: Self = Self { method: GuessMethod::Max, round: RoundDirection::Down };

    pub fn new(method: GuessMethod, round: RoundDirection) -> Self {
        Self { method, round }
    }

    /// Pick a count from the guesser's min/max estimates
    pub fn select(&self, min: u32, max: u32) -> u32 {
        match self.method {
            GuessMethod::Min => min,
            GuessMethod::Max => max,
            GuessMethod::Mean => match self.round {
                RoundDirection::Down => (min + max) / 2,
                RoundDirection::Up => (min + max).div_ceil(2),
            },
        }
    }
}
