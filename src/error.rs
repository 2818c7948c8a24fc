//! Error types raised at the crate's two fallible boundaries: loading
//! linguistic data, and fetching engagement for a source post.
//!
//! Everything between those boundaries (normalizing, counting, segmenting)
//! is total and reports "no haiku" instead of failing.

use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading syllable tables, lexicons and word lists.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The file could not be read.
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON of the expected shape.
    #[error("Failed to parse {what}: {source}")]
    Json {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    /// A lexicon word with no usable transcription.
    #[error("Invalid lexicon entry '{word}': {reason}")]
    InvalidLexiconEntry { word: String, reason: String },

    /// An override entry whose value is not a syllable count.
    #[error("Invalid syllable override for '{word}'")]
    InvalidOverride { word: String },

    /// A line in a plain-text pronunciation dictionary that could not be split.
    #[error("Malformed dictionary line {line}: {content:?}")]
    MalformedLine { line: usize, content: String },
}

/// Failures while fetching engagement for a post.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The post no longer exists or is not visible.
    #[error("Post {0} not found")]
    NotFound(String),

    /// The service answered with an unexpected status.
    #[error("Engagement service returned {status} for post {id}")]
    Status { id: String, status: u16 },

    /// The request never completed.
    #[error("Engagement request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body was not an engagement payload.
    #[error("Failed to decode engagement for post {id}: {reason}")]
    Decode { id: String, reason: String },
}

impl FetchError {
    /// True when the post itself is gone rather than the service misbehaving
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
