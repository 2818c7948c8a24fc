//! Loaders for the linguistic data and word lists.
//!
//! Optional list files that do not exist are logged and treated as empty.
//! A lexicon path the caller names explicitly must exist.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ResourceError;
use crate::models::{EmoticonSet, LinguisticResources, PronunciationLexicon, SyllableOverrideTable};

pub const SYLLABLES_FILE: &str = "syllables.json";
pub const EMOTICONS_FILE: &str = "emoticons.txt";
pub const LEXICON_FILE: &str = "lexicon.json";
pub const IGNORE_TWEET_FILE: &str = "ignore_tweet.txt";
pub const IGNORE_PROFILE_FILE: &str = "ignore_profile.txt";
pub const TRACK_FILE: &str = "track.txt";

/// Override values may be `{"syllables": n}` or a bare `n`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OverrideValue {
    Entry { syllables: u32 },
    Count(u32),
}

impl OverrideValue {
    fn syllables(&self) -> u32 {
        match self {
            Self::Entry { syllables } | Self::Count(syllables) => *syllables,
        }
    }
}

fn read_file(path: &Path) -> Result<String, ResourceError> {
    std::fs::read_to_string(path).map_err(|source| ResourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a file that may legitimately be absent
fn read_optional(path: &Path) -> Result<Option<String>, ResourceError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("{:?} not found, using an empty list", path);
            Ok(None)
        }
        Err(source) => Err(ResourceError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Non-empty, trimmed lines
fn list_lines(content: &str) -> impl Iterator<Item = &str> {
    content.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Parse an override table; keys are lowercased
pub fn parse_syllable_overrides(json: &str) -> Result<SyllableOverrideTable, ResourceError> {
    let raw: HashMap<String, serde_json::Value> =
        serde_json::from_str(json).map_err(|source| ResourceError::Json {
            what: "syllable overrides".to_string(),
            source,
        })?;

    let mut table = SyllableOverrideTable::new();
    for (word, value) in raw {
        let value: OverrideValue = serde_json::from_value(value)
            .map_err(|_| ResourceError::InvalidOverride { word: word.clone() })?;
        table.insert(&word, value.syllables());
    }
    Ok(table)
}

/// Load the override table, or an empty one if the file does not exist
pub fn load_syllable_overrides(path: &Path) -> Result<SyllableOverrideTable, ResourceError> {
    let table = match read_optional(path)? {
        Some(content) => parse_syllable_overrides(&content)?,
        None => SyllableOverrideTable::new(),
    };
    info!("Loaded {} syllable overrides", table.len());
    Ok(table)
}

/// Parse a `{"word": [["PH1", "PH2"], ...]}` lexicon
pub fn parse_lexicon_json(json: &str) -> Result<PronunciationLexicon, ResourceError> {
    let raw: HashMap<String, Vec<Vec<String>>> =
        serde_json::from_str(json).map_err(|source| ResourceError::Json {
            what: "pronunciation lexicon".to_string(),
            source,
        })?;

    let mut lexicon = PronunciationLexicon::new();
    for (word, transcriptions) in raw {
        lexicon.insert(&word, &transcriptions)?;
    }
    Ok(lexicon)
}

/// Parse the plain-text CMU dictionary format.
///
/// One `WORD  PH1 PH2 ...` entry per line; alternates are written `WORD(2)`.
/// Lines starting with `;;;` are comments.
pub fn parse_cmudict(text: &str) -> Result<PronunciationLexicon, ResourceError> {
    let mut lexicon = PronunciationLexicon::new();

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with(";;;") {
            continue;
        }

        let mut parts = line.split_whitespace();
        let (Some(head), phones) = (parts.next(), parts.collect::<Vec<_>>()) else {
            continue;
        };
        if phones.is_empty() {
            return Err(ResourceError::MalformedLine {
                line: i + 1,
                content: line.to_string(),
            });
        }

        let word = match head.split_once('(') {
            Some((word, _)) if head.ends_with(')') => word,
            _ => head,
        };
        lexicon.insert(word, &[phones])?;
    }

    Ok(lexicon)
}

/// Load a lexicon, choosing the format by extension (`.json`, otherwise CMU text)
pub fn load_lexicon(path: &Path) -> Result<PronunciationLexicon, ResourceError> {
    let content = read_file(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let lexicon = if is_json {
        parse_lexicon_json(&content)?
    } else {
        parse_cmudict(&content)?
    };
    info!("Loaded {} lexicon entries from {:?}", lexicon.len(), path);
    Ok(lexicon)
}

/// Load emoticons, one per line
pub fn load_emoticons(path: &Path) -> Result<EmoticonSet, ResourceError> {
    let emoticons: EmoticonSet = read_optional(path)?
        .as_deref()
        .map(|content| list_lines(content).collect())
        .unwrap_or_default();
    info!("Loaded {} emoticons", emoticons.len());
    Ok(emoticons)
}

/// Load an ignore list: lowercased, de-duplicated, sorted
pub fn load_ignore_list(path: &Path) -> Result<Vec<String>, ResourceError> {
    let words: BTreeSet<String> = read_optional(path)?
        .as_deref()
        .map(|content| list_lines(content).map(str::to_lowercase).collect())
        .unwrap_or_default();
    info!("Loaded {} ignore entries from {:?}", words.len(), path);
    Ok(words.into_iter().collect())
}

/// Load the stream track list as a comma-joined string
pub fn load_track_str(path: &Path) -> Result<String, ResourceError> {
    Ok(read_optional(path)?
        .as_deref()
        .map(|content| list_lines(content).collect::<Vec<_>>().join(","))
        .unwrap_or_default())
}

/// Build the resource bundle from a data directory.
///
/// The lexicon comes from `lexicon` if given, else `lexicon.json` in the
/// data directory if present; without one, every non-override word is guessed.
pub fn load_resources(
    data_dir: &Path,
    lexicon: Option<&Path>,
) -> Result<LinguisticResources, ResourceError> {
    let overrides = load_syllable_overrides(&data_dir.join(SYLLABLES_FILE))?;
    let emoticons = load_emoticons(&data_dir.join(EMOTICONS_FILE))?;

    let default_lexicon = data_dir.join(LEXICON_FILE);
    let lexicon = match lexicon {
        Some(path) => load_lexicon(path)?,
        None if default_lexicon.exists() => load_lexicon(&default_lexicon)?,
        None => {
            warn!("No pronunciation lexicon; syllables will be guessed");
            PronunciationLexicon::new()
        }
    };

    Ok(LinguisticResources::new(overrides, lexicon, emoticons))
}
