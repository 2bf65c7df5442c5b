use crate::api::{EventRecord, UpstreamClient};
use crate::error::{FeedError, UpstreamError};
use crate::models::{League, ScoreSource};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Days of scoreboard scanned from the start date
pub const SCAN_DAYS: u32 = 7;

/// One lookup step, tried in order until a record turns up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    /// Scan `SCAN_DAYS` days of a league's scoreboard for the event id
    Scoreboard { league: League, source: ScoreSource },
    /// Direct per-event lookup
    Summary { league: League },
}

impl Attempt {
    pub fn league(&self) -> League {
        match self {
            Attempt::Scoreboard { league, .. } | Attempt::Summary { league } => *league,
        }
    }

    pub fn source(&self) -> ScoreSource {
        match self {
            Attempt::Scoreboard { source, .. } => *source,
            Attempt::Summary { .. } => ScoreSource::SummaryFallback,
        }
    }
}

/// Lookup order for an event, given an optional league hint.
///
/// With a hint only that league's scoreboard is scanned. Without one the
/// NFL board is primary and the college board is tried second. Summary
/// lookups for both leagues always close the plan.
pub fn plan(hint: Option<League>) -> Vec<Attempt> {
    let mut attempts = match hint {
        Some(league) => vec![Attempt::Scoreboard {
            league,
            source: ScoreSource::PrimaryScoreboard,
        }],
        None => vec![
            Attempt::Scoreboard {
                league: League::Nfl,
                source: ScoreSource::PrimaryScoreboard,
            },
            Attempt::Scoreboard {
                league: League::Ncaaf,
                source: ScoreSource::CrossLeagueScoreboard,
            },
        ],
    };
    attempts.push(Attempt::Summary {
        league: League::Ncaaf,
    });
    attempts.push(Attempt::Summary {
        league: League::Nfl,
    });
    attempts
}

/// A located event and where it was found.
#[derive(Debug, Clone)]
pub struct ResolvedGame {
    pub record: EventRecord,
    pub league: League,
    pub source: ScoreSource,
}

/// Locates one event across scoreboards and per-event summaries.
pub struct GameResolver {
    client: Arc<dyn UpstreamClient>,
}

impl GameResolver {
    pub fn new(client: Arc<dyn UpstreamClient>) -> Self {
        Self { client }
    }

    /// Walk the lookup plan and return the first record matching `event_id`.
    ///
    /// Individual upstream failures are logged and skipped. The result is
    /// `NotFound` when every step came back empty, and `UpstreamUnavailable`
    /// when no step got a usable answer at all.
    #[instrument(skip(self), fields(provider = %self.client.provider()))]
    pub async fn resolve(
        &self,
        event_id: &str,
        start: NaiveDate,
        hint: Option<League>,
    ) -> Result<ResolvedGame, FeedError> {
        let event_id = event_id.trim();
        if event_id.is_empty() {
            return Err(FeedError::invalid_request("Missing eventId or startDate"));
        }

        let mut failures = FailureLog::default();

        for attempt in plan(hint) {
            let found = match attempt {
                Attempt::Scoreboard { league, .. } => {
                    self.scan_scoreboard(event_id, start, league, &mut failures)
                        .await
                }
                Attempt::Summary { league } => {
                    self.lookup_summary(event_id, league, &mut failures).await
                }
            };

            if let Some(record) = found {
                info!(
                    "Resolved event {} in {} via {:?}",
                    event_id,
                    attempt.league(),
                    attempt.source()
                );
                return Ok(ResolvedGame {
                    record,
                    league: attempt.league(),
                    source: attempt.source(),
                });
            }
        }

        Err(failures.into_error(event_id))
    }

    async fn scan_scoreboard(
        &self,
        event_id: &str,
        start: NaiveDate,
        league: League,
        failures: &mut FailureLog,
    ) -> Option<EventRecord> {
        for day in start.iter_days().take(SCAN_DAYS as usize) {
            match self.client.scoreboard(day, league).await {
                Ok(records) => {
                    failures.answered();
                    if let Some(record) = records.into_iter().find(|r| r.has_id(event_id)) {
                        return Some(record);
                    }
                }
                Err(err) => failures.record(&err, &format!("{} scoreboard {}", league, day)),
            }
        }
        debug!(
            "Event {} not on {} scoreboard for {} days from {}",
            event_id, league, SCAN_DAYS, start
        );
        None
    }

    async fn lookup_summary(
        &self,
        event_id: &str,
        league: League,
        failures: &mut FailureLog,
    ) -> Option<EventRecord> {
        match self.client.summary(event_id, league).await {
            Ok(record) if record.has_id(event_id) && record.belongs_to(league) => {
                failures.answered();
                Some(record)
            }
            Ok(record) if record.has_id(event_id) => {
                failures.answered();
                debug!(
                    "{} summary for {} belongs to {:?}, ignoring",
                    league, event_id, record.league
                );
                None
            }
            Ok(record) => {
                failures.answered();
                debug!(
                    "{} summary for {} returned event {:?}, ignoring",
                    league, event_id, record.id
                );
                None
            }
            Err(err) => {
                failures.record(&err, &format!("{} summary {}", league, event_id));
                None
            }
        }
    }
}

/// Tracks whether any upstream call produced a usable answer.
#[derive(Debug, Default)]
struct FailureLog {
    answered: bool,
    last: Option<UpstreamError>,
}

impl FailureLog {
    fn answered(&mut self) {
        self.answered = true;
    }

    fn record(&mut self, err: &UpstreamError, what: &str) {
        if err.is_not_found() {
            debug!("{}: not found", what);
            self.answered = true;
        } else {
            warn!("{} failed: {}", what, err);
            self.last = Some(err.clone());
        }
    }

    fn into_error(self, event_id: &str) -> FeedError {
        match self.last {
            Some(err) if !self.answered => {
                warn!("Every lookup for {} failed, last error: {}", event_id, err);
                FeedError::UpstreamUnavailable(err.to_string())
            }
            _ => FeedError::NotFound,
        }
    }
}
