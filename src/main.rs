use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use haikuincidence::io::{
    load_ignore_list, load_track_str, IGNORE_PROFILE_FILE, IGNORE_TWEET_FILE, TRACK_FILE,
};
use haikuincidence::{
    check_post, check_profile, format_candidate, load_posts, load_resources, normalize, rank,
    segment_with, DeletedLog, EngagementClient, EngagementConfig, GuessMethod, GuessMode,
    HaikuCandidate, LinguisticResources, RankReport, ResolverConfig, RoundDirection,
    ScreeningConfig, SnapshotSource, SourcePost, SyllableResolver,
};

#[derive(Parser)]
#[command(name = "haikuincidence")]
#[command(author, version, about = "Finds accidental haiku in short posts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that counts syllables
#[derive(Args)]
struct ResourceArgs {
    /// Directory holding syllables.json, emoticons.txt and the ignore lists
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Pronunciation lexicon (JSON or CMU dictionary format)
    #[arg(long)]
    lexicon: Option<PathBuf>,

    /// Which guesser estimate to use: min, mean or max
    #[arg(long, default_value = "mean")]
    guess_method: GuessMethod,

    /// Rounding for the mean estimate: down or up
    #[arg(long, default_value = "down")]
    mean_round: RoundDirection,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl ResourceArgs {
    fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig::with_guess_mode(GuessMode::new(self.guess_method, self.mean_round))
    }

    fn load(&self) -> Result<LinguisticResources> {
        load_resources(&self.data_dir, self.lexicon.as_deref())
            .context("Failed to load linguistic resources")
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a piece of text is a haiku
    Find {
        /// Text to check
        #[arg(required = true)]
        text: Vec<String>,

        #[command(flatten)]
        resources: ResourceArgs,
    },

    /// Show the syllable count and its source for each token
    Count {
        /// Tokens to count
        #[arg(required = true)]
        tokens: Vec<String>,

        #[command(flatten)]
        resources: ResourceArgs,
    },

    /// List the posts that pass screening
    Screen {
        /// Input posts (JSON array or JSON lines)
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        resources: ResourceArgs,
    },

    /// Find haiku among a window of posts and pick the best one
    Rank {
        /// Input posts (JSON array or JSON lines)
        #[arg(short, long)]
        input: PathBuf,

        /// Engagement snapshot to rank against (defaults to the input posts)
        #[arg(long, conflicts_with = "live")]
        snapshot: Option<PathBuf>,

        /// Fetch engagement over HTTP (ENGAGEMENT_API_URL, ENGAGEMENT_API_TOKEN)
        #[arg(long)]
        live: bool,

        /// Output file for the JSON report (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Required language tag
        #[arg(long, default_value = "en")]
        language: String,

        #[command(flatten)]
        resources: ResourceArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Find { text, resources } => {
            setup_logging(resources.verbose);
            find(&text.join(" "), &resources)
        }
        Commands::Count { tokens, resources } => {
            setup_logging(resources.verbose);
            count(&tokens, &resources)
        }
        Commands::Screen { input, resources } => {
            setup_logging(resources.verbose);
            screen(&input, &resources)
        }
        Commands::Rank {
            input,
            snapshot,
            live,
            output,
            language,
            resources,
        } => {
            setup_logging(resources.verbose);
            let screening = ScreeningConfig {
                language,
                ..Default::default()
            };
            rank_window(&input, snapshot, live, output, screening, &resources).await
        }
    }
}

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

fn find(text: &str, args: &ResourceArgs) -> Result<()> {
    let resources = args.load()?;
    let resolver = SyllableResolver::new(&resources, args.resolver_config());

    let clean = normalize(text);
    match segment_with(&clean, &resolver) {
        Some(candidate) => println!("{}", format_candidate(&candidate.with_original_text(text))),
        None => println!("No haiku"),
    }
    Ok(())
}

fn count(tokens: &[String], args: &ResourceArgs) -> Result<()> {
    let resources = args.load()?;
    let resolver = SyllableResolver::new(&resources, args.resolver_config());

    for token in tokens {
        let count = resolver.resolve(token);
        println!("{}\t{}\t{}", token, count.syllables, count.source);
    }
    Ok(())
}

/// Ignore lists and screening settings for a run
struct Screen {
    ignore_tweet: Vec<String>,
    ignore_profile: Vec<String>,
    config: ScreeningConfig,
}

impl Screen {
    fn load(data_dir: &Path, config: ScreeningConfig) -> Result<Self> {
        let track = load_track_str(&data_dir.join(TRACK_FILE))?;
        if !track.is_empty() {
            info!("Tracking: {}", track);
        }
        Ok(Self {
            ignore_tweet: load_ignore_list(&data_dir.join(IGNORE_TWEET_FILE))?,
            ignore_profile: load_ignore_list(&data_dir.join(IGNORE_PROFILE_FILE))?,
            config,
        })
    }

    fn passes(&self, post: &SourcePost) -> bool {
        check_post(post, &self.ignore_tweet, &self.config)
            && (!self.config.check_profile
                || check_profile(post, &self.ignore_profile, self.config.profile_match_substring))
    }
}

fn screen(input: &Path, args: &ResourceArgs) -> Result<()> {
    let screen = Screen::load(&args.data_dir, ScreeningConfig::default())?;

    info!("Loading posts from {:?}", input);
    let posts = load_posts(input).context("Failed to load input posts")?;

    let passed: Vec<&SourcePost> = posts.iter().filter(|post| screen.passes(post)).collect();
    info!("{} of {} posts passed screening", passed.len(), posts.len());

    for post in passed {
        println!("{}", post.id_str);
    }
    Ok(())
}

/// Screen, normalize and segment every post, keeping input order
fn find_candidates(
    posts: &[SourcePost],
    screen: &Screen,
    resolver: &SyllableResolver<'_>,
) -> (usize, Vec<HaikuCandidate>) {
    let mut screened = 0;
    let mut candidates = Vec::new();

    for post in posts.iter().filter(|post| screen.passes(post)) {
        screened += 1;
        let body = post.body();
        if let Some(candidate) = segment_with(&normalize(body), resolver) {
            info!("Haiku in post {}", post.id_str);
            candidates.push(
                candidate
                    .with_source(&post.id_str, Some(post.user.screen_name.as_str()))
                    .with_original_text(body),
            );
        }
    }

    (screened, candidates)
}

async fn rank_window(
    input: &Path,
    snapshot: Option<PathBuf>,
    live: bool,
    output: Option<PathBuf>,
    screening: ScreeningConfig,
    args: &ResourceArgs,
) -> Result<()> {
    let resources = args.load()?;
    let resolver = SyllableResolver::new(&resources, args.resolver_config());
    let screen = Screen::load(&args.data_dir, screening)?;

    info!("Loading posts from {:?}", input);
    let posts = load_posts(input).context("Failed to load input posts")?;

    let (posts_screened, candidates) = find_candidates(&posts, &screen, &resolver);
    info!(
        "{} posts read, {} screened, {} candidates",
        posts.len(),
        posts_screened,
        candidates.len()
    );

    let mut deletions = DeletedLog::default();
    let best = if live {
        let client = EngagementClient::new(EngagementConfig::from_env()?);
        rank(&candidates, &client, &mut deletions).await
    } else {
        let source = match snapshot {
            Some(path) => {
                SnapshotSource::from_file(&path).context("Failed to load engagement snapshot")?
            }
            None => posts.iter().cloned().collect(),
        };
        rank(&candidates, &source, &mut deletions).await
    };

    let report = RankReport {
        generated_at: chrono::Utc::now(),
        posts_read: posts.len(),
        posts_screened,
        candidates: candidates.iter().map(Into::into).collect(),
        deleted: deletions.ids,
        best: best.as_ref().map(Into::into),
    };

    match output {
        Some(path) => {
            report.write_json(&path)?;
            info!("Report written to {:?}", path);
        }
        None => {
            report.write_to(std::io::stdout().lock())?;
            println!();
        }
    }

    if let Some(best) = best {
        info!("Best haiku:\n{}", best.attributed());
    }
    Ok(())
}
