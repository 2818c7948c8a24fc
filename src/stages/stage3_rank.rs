use std::collections::HashSet;
use std::future::Future;

use tracing::{debug, info, warn};

use crate::error::FetchError;
use crate::models::{Engagement, HaikuCandidate, RankedCandidate};

/// Anything that can report fresh engagement for a source post
pub trait EngagementSource {
    fn fetch(&self, id: &str) -> impl Future<Output = Result<Engagement, FetchError>> + Send;
}

/// Where candidates whose source post vanished get soft-deleted
pub trait DeletionSink {
    fn mark_deleted(&mut self, id: &str);
}

/// In-memory deletion sink; keeps ids in the order they were marked
#[derive(Debug, Clone, Default)]
pub struct DeletedLog {
    pub ids: Vec<String>,
}

impl DeletionSink for DeletedLog {
    fn mark_deleted(&mut self, id: &str) {
        self.ids.push(id.to_string());
    }
}

/// True if `fresh` should replace the current best
fn beats(fresh: &Engagement, best: &Engagement) -> bool {
    fresh.favorite_count > best.favorite_count
        || fresh.retweet_count > best.retweet_count
        || fresh.followers_count > best.followers_count
}

async fn fetch_or_delete<S, D>(
    candidate: &HaikuCandidate,
    source: &S,
    deletions: &mut D,
) -> Option<Engagement>
where
    S: EngagementSource,
    D: DeletionSink,
{
    match source.fetch(&candidate.source_id).await {
        Ok(engagement) => Some(engagement),
        Err(e) => {
            warn!("Could not fetch engagement for {}: {}", candidate.source_id, e);
            deletions.mark_deleted(&candidate.source_id);
            None
        }
    }
}

/// Pick the single best candidate from one time window.
///
/// Candidates are checked one at a time in discovery order. A failed fetch
/// soft-deletes the candidate. A verified author always takes the lead;
/// otherwise a candidate takes the lead if any of favorites, retweets or
/// followers strictly beats the current leader. If nobody ever leads, the
/// most recent candidate that can be fetched on a second try is returned;
/// a candidate is soft-deleted at most once.
pub async fn rank<S, D>(
    candidates: &[HaikuCandidate],
    source: &S,
    deletions: &mut D,
) -> Option<RankedCandidate>
where
    S: EngagementSource,
    D: DeletionSink,
{
    let mut best: Option<RankedCandidate> = None;
    let mut deleted: HashSet<&str> = HashSet::new();
    let zero = Engagement::default();

    for candidate in candidates {
        let Some(engagement) = fetch_or_delete(candidate, source, deletions).await else {
            deleted.insert(candidate.source_id.as_str());
            continue;
        };

        let leader = best.as_ref().map_or(&zero, |b| &b.engagement);
        if engagement.verified || beats(&engagement, leader) {
            debug!(
                "{} takes the lead (verified: {}, favorites: {}, retweets: {}, followers: {})",
                candidate.source_id,
                engagement.verified,
                engagement.favorite_count,
                engagement.retweet_count,
                engagement.followers_count
            );
            best = Some(RankedCandidate {
                candidate: candidate.clone(),
                engagement,
            });
        }
    }

    if let Some(best) = best {
        info!("Best candidate: {}", best.candidate.source_id);
        return Some(best);
    }

    debug!("No candidate stood out, falling back to the most recent");
    for candidate in candidates.iter().rev() {
        match source.fetch(&candidate.source_id).await {
            Ok(engagement) => {
                info!("Most recent candidate: {}", candidate.source_id);
                return Some(RankedCandidate {
                    candidate: candidate.clone(),
                    engagement,
                });
            }
            Err(e) => {
                warn!("Could not fetch engagement for {}: {}", candidate.source_id, e);
                if deleted.insert(candidate.source_id.as_str()) {
                    deletions.mark_deleted(&candidate.source_id);
                }
            }
        }
    }

    info!("No candidate could be fetched");
    None
}

/// Alias for [`rank`]
pub async fn best_of<S, D>(
    candidates: &[HaikuCandidate],
    source: &S,
    deletions: &mut D,
) -> Option<RankedCandidate>
where
    S: EngagementSource,
    D: DeletionSink,
{
    rank(candidates, source, deletions).await
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;
    use crate::models::HaikuLine;

    /// Canned engagement per id; missing ids are deleted posts
    #[derive(Default)]
    struct CannedSource {
        posts: HashMap<String, Engagement>,
        /// Ids whose first fetch fails
        flaky: Mutex<HashSet<String>>,
        calls: Mutex<Vec<String>>,
    }

    impl CannedSource {
        fn with(mut self, id: &str, engagement: Engagement) -> Self {
            self.posts.insert(id.to_string(), engagement);
            self
        }

        fn failing_once(self, id: &str) -> Self {
            self.flaky.lock().unwrap().insert(id.to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl EngagementSource for CannedSource {
        async fn fetch(&self, id: &str) -> Result<Engagement, FetchError> {
            self.calls.lock().unwrap().push(id.to_string());
            if self.flaky.lock().unwrap().remove(id) {
                return Err(FetchError::Status {
                    id: id.to_string(),
                    status: 503,
                });
            }
            self.posts
                .get(id)
                .cloned()
                .ok_or_else(|| FetchError::NotFound(id.to_string()))
        }
    }

    fn candidate(id: &str) -> HaikuCandidate {
        HaikuCandidate {
            source_id: id.to_string(),
            screen_name: None,
            text_original: String::new(),
            text_clean: String::new(),
            lines: <[HaikuLine; 3]>::default(),
            discovered_at: Utc::now(),
        }
    }

    fn favorites(count: u64) -> Engagement {
        Engagement {
            favorite_count: count,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_verified_author_wins() {
        let candidates = vec![candidate("1"), candidate("2"), candidate("3")];
        let source = CannedSource::default()
            .with("1", favorites(10))
            .with("2", favorites(5))
            .with(
                "3",
                Engagement {
                    verified: true,
                    ..favorites(1)
                },
            );
        let mut deletions = DeletedLog::default();

        let best = rank(&candidates, &source, &mut deletions).await.unwrap();

        assert_eq!(best.candidate.source_id, "3");
        assert!(best.engagement.verified);
        assert!(deletions.ids.is_empty());
    }

    #[tokio::test]
    async fn test_any_greater_metric_replaces() {
        let candidates = vec![candidate("1"), candidate("2"), candidate("3")];
        let source = CannedSource::default()
            .with("1", favorites(10))
            .with(
                "2",
                Engagement {
                    retweet_count: 1,
                    ..favorites(2)
                },
            )
            .with("3", favorites(1));
        let mut deletions = DeletedLog::default();

        let best = rank(&candidates, &source, &mut deletions).await.unwrap();

        // 2 has more retweets than 1; 3 beats 2 on nothing
        assert_eq!(best.candidate.source_id, "2");
    }

    #[tokio::test]
    async fn test_ties_keep_earlier_candidate() {
        let candidates = vec![candidate("1"), candidate("2")];
        let source = CannedSource::default()
            .with("1", favorites(4))
            .with("2", favorites(4));
        let mut deletions = DeletedLog::default();

        let best = best_of(&candidates, &source, &mut deletions).await.unwrap();
        assert_eq!(best.candidate.source_id, "1");
    }

    #[tokio::test]
    async fn test_reverse_scan_fallback() {
        let candidates = vec![candidate("1"), candidate("2"), candidate("3")];
        let source = CannedSource::default().with("1", Engagement::default());
        let mut deletions = DeletedLog::default();

        let best = rank(&candidates, &source, &mut deletions).await.unwrap();

        assert_eq!(best.candidate.source_id, "1");
        // each failure is soft-deleted once even though the fallback fetches again
        assert_eq!(deletions.ids, vec!["2", "3"]);
        assert_eq!(source.calls(), vec!["1", "2", "3", "3", "2", "1"]);
    }

    #[tokio::test]
    async fn test_fallback_retries_failed_fetches() {
        let candidates = vec![candidate("1"), candidate("2")];
        let source = CannedSource::default()
            .with("1", Engagement::default())
            .with("2", Engagement::default())
            .failing_once("2");
        let mut deletions = DeletedLog::default();

        let best = rank(&candidates, &source, &mut deletions).await.unwrap();

        // 2 failed in the forward pass but is the most recent and fetches fine now
        assert_eq!(best.candidate.source_id, "2");
        assert_eq!(deletions.ids, vec!["2"]);
        assert_eq!(source.calls(), vec!["1", "2", "2"]);
    }

    #[tokio::test]
    async fn test_fallback_prefers_most_recent() {
        let candidates = vec![candidate("1"), candidate("2"), candidate("3")];
        let source = CannedSource::default()
            .with("1", Engagement::default())
            .with("2", Engagement::default());
        let mut deletions = DeletedLog::default();

        let best = rank(&candidates, &source, &mut deletions).await.unwrap();

        assert_eq!(best.candidate.source_id, "2");
        assert_eq!(deletions.ids, vec!["3"]);
    }

    #[tokio::test]
    async fn test_all_fetches_fail() {
        let candidates = vec![candidate("1"), candidate("2")];
        let source = CannedSource::default();
        let mut deletions = DeletedLog::default();

        assert!(rank(&candidates, &source, &mut deletions).await.is_none());
        assert_eq!(deletions.ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_no_candidates() {
        let source = CannedSource::default();
        let mut deletions = DeletedLog::default();
        assert!(rank(&[], &source, &mut deletions).await.is_none());
        assert!(source.calls().is_empty());
    }
}
