pub mod engagement;
pub mod error;
pub mod heuristics;
pub mod io;
pub mod models;
pub mod stages;

pub use engagement::{EngagementClient, EngagementConfig, SnapshotSource};
pub use error::{FetchError, ResourceError};
pub use heuristics::{check_post, check_profile, check_text, guess_syllables, ScreeningConfig};
pub use io::{format_candidate, load_posts, load_resources, RankReport};
pub use models::{
    Engagement, GuessMethod, GuessMode, HaikuCandidate, LinguisticResources, RankedCandidate,
    RoundDirection, SourcePost, SyllableCount, SyllableSource,
};
pub use stages::{
    best_of, count_syllables, find_haiku, normalize, rank, resolve_syllables, segment,
    segment_with, DeletedLog, DeletionSink, EngagementSource, ResolverConfig, SyllableResolver,
};
