use std::path::Path;

use anyhow::{Context, Result};

use crate::models::SourcePost;

/// Read source posts from a JSON array or JSON-lines file
pub fn load_posts(path: &Path) -> Result<Vec<SourcePost>> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))?;
    parse_posts(&content)
}

/// Parse source posts from either a JSON array or one JSON object per line
pub fn parse_posts(content: &str) -> Result<Vec<SourcePost>> {
    if content.trim_start().starts_with('[') {
        return serde_json::from_str(content).context("Failed to parse posts JSON array");
    }

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .with_context(|| format!("Failed to parse post on line {}", i + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_array() {
        let posts =
            parse_posts(r#"[{"id_str": "1", "user": {}}, {"id_str": "2", "user": {}}]"#).unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[1].id_str, "2");
    }

    #[test]
    fn test_parse_json_lines() {
        let content = "{\"id_str\": \"1\", \"user\": {}}\n\n{\"id_str\": \"2\", \"user\": {}}\n";
        let posts = parse_posts(content).unwrap();
        assert_eq!(posts.len(), 2);
    }

    #[test]
    fn test_parse_error_names_line() {
        let content = "{\"id_str\": \"1\", \"user\": {}}\nnot json\n";
        let err = parse_posts(content).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
