pub mod api;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod server;
pub mod utils;

pub use api::{Provider, UpstreamClient};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::{FeedError, UpstreamError};
pub use models::*;

use api::mock_feed::MockFeed;
use chrono::{DateTime, NaiveDate};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use utils::cache::{TtlCache, DEFAULT_CACHE_CAPACITY};
use utils::game_resolver::GameResolver;
use utils::schedule_aggregator::ScheduleAggregator;
use utils::score_normalizer::normalize_score;

/// Entry point for both binaries: schedules and single-game scores,
/// each behind its own cache.
pub struct FeedService {
    aggregator: ScheduleAggregator,
    resolver: GameResolver,
    score_cache: TtlCache<(Option<League>, String), GameScore>,
}

impl FeedService {
    /// Build the providers named in `config` (or the mock feed) on the system clock
    pub fn from_config(config: &Config) -> Self {
        let schedule_client: Arc<dyn UpstreamClient>;
        let scores_client: Arc<dyn UpstreamClient>;
        if config.mock_mode {
            info!(
                "MOCK_MODE enabled, reading games from {}",
                config.mock_schedule_path.display()
            );
            let feed = Arc::new(MockFeed::new(config.mock_schedule_path.clone()));
            schedule_client = feed.clone();
            scores_client = feed;
        } else {
            info!(
                "Schedule provider: {}, scores provider: {}",
                config.schedule_provider, config.scores_provider
            );
            schedule_client = api::build_client(config.schedule_provider, config);
            scores_client = api::build_client(config.scores_provider, config);
        }

        Self::with_cache_capacity(
            schedule_client,
            scores_client,
            Arc::new(SystemClock),
            config.schedule_cache_ttl,
            config.score_cache_ttl,
            config.cache_capacity,
        )
    }

    pub fn new(
        schedule_client: Arc<dyn UpstreamClient>,
        scores_client: Arc<dyn UpstreamClient>,
        clock: Arc<dyn Clock>,
        schedule_ttl: Duration,
        score_ttl: Duration,
    ) -> Self {
        Self::with_cache_capacity(
            schedule_client,
            scores_client,
            clock,
            schedule_ttl,
            score_ttl,
            DEFAULT_CACHE_CAPACITY,
        )
    }

    /// Same as [`FeedService::new`], with both caches bounded to `capacity` entries
    pub fn with_cache_capacity(
        schedule_client: Arc<dyn UpstreamClient>,
        scores_client: Arc<dyn UpstreamClient>,
        clock: Arc<dyn Clock>,
        schedule_ttl: Duration,
        score_ttl: Duration,
        capacity: usize,
    ) -> Self {
        Self {
            aggregator: ScheduleAggregator::new(
                schedule_client,
                clock.clone(),
                schedule_ttl,
                capacity,
            ),
            resolver: GameResolver::new(scores_client),
            score_cache: TtlCache::new(score_ttl, capacity, clock),
        }
    }

    /// Seven-day schedule for `league` starting at `start`
    pub async fn schedule(
        &self,
        start: NaiveDate,
        league: League,
        upcoming_only: bool,
    ) -> Result<Vec<Game>, FeedError> {
        self.aggregator.schedule(start, league, upcoming_only).await
    }

    /// Locate `event_id` near `start` and return its normalized score
    pub async fn game_score(
        &self,
        event_id: &str,
        start: NaiveDate,
        hint: Option<League>,
    ) -> Result<GameScore, FeedError> {
        let event_id = event_id.trim();
        let key = (hint, event_id.to_string());
        if let Some(score) = self.score_cache.get(&key).await {
            debug!("Score cache hit for {}", event_id);
            return Ok(score);
        }

        let resolved = self.resolver.resolve(event_id, start, hint).await?;
        let score = normalize_score(&resolved.record, event_id, resolved.league, resolved.source)?;
        self.score_cache.insert(key, score.clone()).await;
        Ok(score)
    }
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp (date part used)
pub fn parse_start_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}
