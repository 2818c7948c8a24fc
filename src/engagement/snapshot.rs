use std::collections::HashMap;
use std::path::Path;

use crate::error::{FetchError, ResourceError};
use crate::models::{Engagement, SourcePost};
use crate::stages::EngagementSource;

/// Engagement served from a saved set of status payloads.
///
/// Posts missing from the snapshot behave like deleted posts.
#[derive(Debug, Clone, Default)]
pub struct SnapshotSource {
    posts: HashMap<String, SourcePost>,
}

impl SnapshotSource {
    /// Load a JSON array of status payloads
    pub fn from_file(path: &Path) -> Result<Self, ResourceError> {
        let content = std::fs::read_to_string(path).map_err(|source| ResourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ResourceError> {
        let posts: Vec<SourcePost> =
            serde_json::from_str(json).map_err(|source| ResourceError::Json {
                what: "status snapshot".to_string(),
                source,
            })?;
        Ok(posts.into_iter().collect())
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

impl FromIterator<SourcePost> for SnapshotSource {
    fn from_iter<I: IntoIterator<Item = SourcePost>>(iter: I) -> Self {
        Self {
            posts: iter
                .into_iter()
                .map(|post| (post.id_str.clone(), post))
                .collect(),
        }
    }
}

impl EngagementSource for SnapshotSource {
    async fn fetch(&self, id: &str) -> Result<Engagement, FetchError> {
        self.posts
            .get(id)
            .map(SourcePost::engagement)
            .ok_or_else(|| FetchError::NotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SNAPSHOT: &str = r#"[
        {"id_str": "1", "text": "a", "favorite_count": 7,
         "user": {"screen_name": "basho", "verified": true, "followers_count": 900}},
        {"id_str": "2", "text": "b", "user": {"screen_name": "buson"}}
    ]"#;

    #[tokio::test]
    async fn test_fetch_from_snapshot() {
        let source = SnapshotSource::from_json(SNAPSHOT).unwrap();
        assert_eq!(source.len(), 2);

        let engagement = source.fetch("1").await.unwrap();
        assert_eq!(engagement.favorite_count, 7);
        assert_eq!(engagement.followers_count, 900);
        assert!(engagement.verified);
        assert_eq!(engagement.screen_name.as_deref(), Some("basho"));

        assert!(source.fetch("3").await.unwrap_err().is_not_found());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let source = SnapshotSource::from_file(file.path()).unwrap();
        assert_eq!(source.len(), 2);
    }

    #[test]
    fn test_bad_snapshot() {
        let err = SnapshotSource::from_json("{\"not\": \"a list\"}").unwrap_err();
        assert!(matches!(err, ResourceError::Json { .. }));

        let err = SnapshotSource::from_file(Path::new("/nonexistent/snapshot.json")).unwrap_err();
        assert!(matches!(err, ResourceError::Io { .. }));
    }
}
