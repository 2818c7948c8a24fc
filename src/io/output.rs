use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Engagement, HaikuCandidate, RankedCandidate};

/// Machine-readable result of ranking one window of candidates
#[derive(Debug, Clone, Serialize)]
pub struct RankReport {
    pub generated_at: DateTime<Utc>,
    /// Posts read from the input
    pub posts_read: usize,
    /// Posts that passed screening
    pub posts_screened: usize,
    /// Candidates found among the screened posts
    pub candidates: Vec<CandidateSummary>,
    /// Ids soft-deleted because their post could not be fetched
    pub deleted: Vec<String>,
    /// The winner, if any
    pub best: Option<BestHaiku>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CandidateSummary {
    pub source_id: String,
    pub screen_name: Option<String>,
    pub haiku: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BestHaiku {
    pub source_id: String,
    pub haiku: String,
    /// Haiku plus attribution, ready to post
    pub attributed: String,
    pub source_url: Option<String>,
    pub engagement: Engagement,
}

impl From<&HaikuCandidate> for CandidateSummary {
    fn from(candidate: &HaikuCandidate) -> Self {
        Self {
            source_id: candidate.source_id.clone(),
            screen_name: candidate.screen_name.clone(),
            haiku: candidate.haiku(),
        }
    }
}

impl From<&RankedCandidate> for BestHaiku {
    fn from(ranked: &RankedCandidate) -> Self {
        Self {
            source_id: ranked.candidate.source_id.clone(),
            haiku: ranked.candidate.haiku(),
            attributed: ranked.attributed(),
            source_url: ranked.source_url(),
            engagement: ranked.engagement.clone(),
        }
    }
}

impl RankReport {
    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        self.write_to(file)
    }

    /// Write pretty JSON to any writer
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        serde_json::to_writer_pretty(writer, self).context("Failed to write JSON")?;
        Ok(())
    }
}

/// Human-readable haiku with per-line syllable totals
pub fn format_candidate(candidate: &HaikuCandidate) -> String {
    let lines: Vec<String> = candidate.lines.iter().map(|l| l.to_string()).collect();
    let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    lines
        .iter()
        .zip(candidate.line_syllables())
        .map(|(line, syllables)| format!("{:<width$}  ({})", line, syllables, width = width))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HaikuLine, SyllableCount, SyllableSource, Token};

    fn line(words: &[(&str, u32)]) -> HaikuLine {
        HaikuLine {
            tokens: words
                .iter()
                .enumerate()
                .map(|(i, (w, n))| Token::new(w, i, SyllableCount::new(*n, SyllableSource::Guess)))
                .collect(),
        }
    }

    fn candidate() -> HaikuCandidate {
        HaikuCandidate {
            source_id: "42".to_string(),
            screen_name: Some("buson".to_string()),
            text_original: String::new(),
            text_clean: String::new(),
            lines: [
                line(&[("light", 1), ("of", 1), ("the", 1), ("moon", 1), ("moves", 1)]),
                line(&[("west", 1), ("flowers", 2), ("shadows", 2), ("creep", 1), ("east", 1)]),
                line(&[("the", 1), ("spring", 1), ("evening", 3)]),
            ],
            discovered_at: Utc::now(),
        }
    }

    #[test]
    fn test_format_candidate() {
        let formatted = format_candidate(&candidate());
        let lines: Vec<&str> = formatted.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("light of the moon moves"));
        assert!(lines[0].ends_with("(5)"));
        assert!(lines[1].ends_with("(7)"));
    }

    #[test]
    fn test_report_json() {
        let ranked = RankedCandidate {
            candidate: candidate(),
            engagement: Engagement {
                favorite_count: 3,
                ..Default::default()
            },
        };
        let report = RankReport {
            generated_at: Utc::now(),
            posts_read: 10,
            posts_screened: 4,
            candidates: vec![CandidateSummary::from(&ranked.candidate)],
            deleted: vec!["7".to_string()],
            best: Some(BestHaiku::from(&ranked)),
        };

        let mut buffer = Vec::new();
        report.write_to(&mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();

        assert_eq!(value["best"]["source_id"], "42");
        assert_eq!(value["best"]["engagement"]["favorite_count"], 3);
        assert_eq!(
            value["best"]["source_url"],
            "https://twitter.com/buson/status/42"
        );
        assert_eq!(value["deleted"][0], "7");
    }

    #[test]
    fn test_write_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = RankReport {
            generated_at: Utc::now(),
            posts_read: 0,
            posts_screened: 0,
            candidates: vec![],
            deleted: vec![],
            best: None,
        };

        report.write_json(&path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"best\": null"));
    }
}
