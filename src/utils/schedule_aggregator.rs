use super::cache::TtlCache;
use super::schedule_normalizer::{dedupe_by_id, normalize_schedule, upcoming_only};
use crate::api::UpstreamClient;
use crate::clock::Clock;
use crate::error::{FeedError, UpstreamError};
use crate::models::{Game, League};
use chrono::{DateTime, NaiveDate, Utc};
use futures_util::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Days fetched per schedule request, starting at the requested date
pub const WINDOW_DAYS: usize = 7;

/// A cached schedule whose first game is further than this from now is refetched
const FRESHNESS_SECS: i64 = 7 * 24 * 60 * 60;

/// Seven-day schedule for one league, merged across daily scoreboards and
/// cached per `(league, start date)`.
pub struct ScheduleAggregator {
    client: Arc<dyn UpstreamClient>,
    cache: TtlCache<(League, NaiveDate), Vec<Game>>,
    clock: Arc<dyn Clock>,
}

impl ScheduleAggregator {
    pub fn new(
        client: Arc<dyn UpstreamClient>,
        clock: Arc<dyn Clock>,
        ttl: Duration,
        capacity: usize,
    ) -> Self {
        Self {
            client,
            cache: TtlCache::new(ttl, capacity, clock.clone()),
            clock,
        }
    }

    /// Games for `league` from `start` through six days later.
    ///
    /// The cache always holds the unfiltered list; `upcoming` only trims
    /// finished and postponed games from what is returned.
    #[instrument(skip(self), fields(provider = %self.client.provider()))]
    pub async fn schedule(
        &self,
        start: NaiveDate,
        league: League,
        upcoming: bool,
    ) -> Result<Vec<Game>, FeedError> {
        let key = (league, start);
        let now = self.clock.now();

        let games = match self.cache.get(&key).await {
            Some(cached) if is_fresh(&cached, now) => {
                debug!("Schedule cache hit for {} {}", league, start);
                cached
            }
            _ => {
                let games = self.fetch_window(start, league, now).await?;
                self.cache.insert(key, games.clone()).await;
                games
            }
        };

        if upcoming {
            Ok(upcoming_only(&games))
        } else {
            Ok(games)
        }
    }

    async fn fetch_window(
        &self,
        start: NaiveDate,
        league: League,
        now: DateTime<Utc>,
    ) -> Result<Vec<Game>, FeedError> {
        let days: Vec<NaiveDate> = start.iter_days().take(WINDOW_DAYS).collect();
        info!(
            "Fetching {} schedule for {} through {}",
            league,
            start,
            days.last().copied().unwrap_or(start)
        );

        let client = &self.client;
        let responses = join_all(days.iter().map(|&day| async move {
            (day, client.scoreboard(day, league).await)
        }))
        .await;

        let mut games = Vec::new();
        for (day, response) in responses {
            match response {
                Ok(records) => games.extend(normalize_schedule(&records, league, day, now)),
                Err(err) => {
                    warn!("{} scoreboard for {} failed: {}", league, day, err);
                    return Err(window_error(err));
                }
            }
        }

        let games = dedupe_by_id(games);
        info!("Fetched {} {} games from {}", games.len(), league, start);
        Ok(games)
    }
}

/// An empty list, or one anchored more than a week away from now, is refetched.
fn is_fresh(games: &[Game], now: DateTime<Utc>) -> bool {
    games
        .first()
        .is_some_and(|first| (first.date - now).num_seconds().abs() <= FRESHNESS_SECS)
}

fn window_error(err: UpstreamError) -> FeedError {
    match err {
        UpstreamError::Timeout { url } => FeedError::UpstreamTimeout(url),
        other => FeedError::UpstreamUnavailable(other.to_string()),
    }
}
