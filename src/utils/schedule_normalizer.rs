use crate::api::{CompetitorRecord, EventRecord};
use crate::models::{Game, League, NormalizedStatus};
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashSet;
use tracing::debug;

use super::score_normalizer::is_finished_code;

const NOT_STARTED_CODES: [&str; 8] = [
    "NS",
    "TBD",
    "PRE",
    "SCHEDULED",
    "NOT STARTED",
    "TIME TO BE DEFINED",
    "STATUS_SCHEDULED",
    "STATUS_TBD",
];

const EXTRA_FINISHED_CODES: [&str; 4] = ["FINISHED", "AFTER OVER TIME", "FINAL/OT", "POST"];

/// Short codes, their long forms (used when a payload has no short code),
/// and live-but-paused states
const IN_PROGRESS_CODES: [&str; 27] = [
    "1H",
    "2H",
    "LIVE",
    "INPLAY",
    "IN PLAY",
    "IN",
    "Q1",
    "Q2",
    "Q3",
    "Q4",
    "OT",
    "HT",
    "INTR",
    "FIRST QUARTER",
    "SECOND QUARTER",
    "THIRD QUARTER",
    "FOURTH QUARTER",
    "OVERTIME",
    "HALFTIME",
    "END OF PERIOD",
    "INTERRUPTED",
    "STATUS_IN_PROGRESS",
    "STATUS_HALFTIME",
    "STATUS_END_PERIOD",
    "STATUS_END_OF_REGULATION",
    "STATUS_DELAYED",
    "STATUS_RAIN_DELAY",
];

const POSTPONED_CODES: [&str; 9] = [
    "PST",
    "CANC",
    "SUSP",
    "POSTPONED",
    "CANCELLED",
    "CANCELED",
    "STATUS_POSTPONED",
    "STATUS_CANCELED",
    "STATUS_SUSPENDED",
];

/// Map a provider status code onto the canonical vocabulary.
///
/// Not-started codes only mean `Scheduled` while kickoff is still ahead;
/// a stale not-started flag on a past game is read as `Final`. Missing or
/// unrecognized codes are inferred from kickoff the same way.
pub fn normalize_status(
    raw: Option<&str>,
    kickoff: DateTime<Utc>,
    now: DateTime<Utc>,
) -> NormalizedStatus {
    let by_kickoff = if kickoff > now {
        NormalizedStatus::Scheduled
    } else {
        NormalizedStatus::Final
    };

    let Some(code) = raw.map(|r| r.trim().to_ascii_uppercase()).filter(|c| !c.is_empty()) else {
        return by_kickoff;
    };
    let code = code.as_str();

    if NOT_STARTED_CODES.contains(&code) {
        by_kickoff
    } else if is_finished_code(code) || EXTRA_FINISHED_CODES.contains(&code) {
        NormalizedStatus::Final
    } else if IN_PROGRESS_CODES.contains(&code) {
        NormalizedStatus::InProgress
    } else if POSTPONED_CODES.contains(&code) {
        NormalizedStatus::Postponed
    } else {
        debug!("Unrecognized status code {:?}, inferring from kickoff", code);
        by_kickoff
    }
}

/// Convert one day's provider records into schedule entries, deduplicated by id.
pub fn normalize_schedule(
    records: &[EventRecord],
    league: League,
    day: NaiveDate,
    now: DateTime<Utc>,
) -> Vec<Game> {
    let games = records
        .iter()
        .map(|record| to_game(record, league, day, now))
        .collect();
    dedupe_by_id(games)
}

fn to_game(record: &EventRecord, league: League, day: NaiveDate, now: DateTime<Utc>) -> Game {
    let date = record.kickoff.unwrap_or_else(|| {
        debug!(
            "No kickoff for {} event {:?}, using start of {}",
            league, record.id, day
        );
        day.and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or(now)
    });

    let raw_status = record
        .status
        .code
        .as_deref()
        .or(record.status.detail.as_deref());

    Game {
        id: record.id.clone().unwrap_or_default(),
        date,
        league,
        home_team: short_name(record.home.as_ref()),
        away_team: short_name(record.away.as_ref()),
        home_logo: record.home.as_ref().and_then(|c| c.team.logo.clone()),
        away_logo: record.away.as_ref().and_then(|c| c.team.logo.clone()),
        status: normalize_status(raw_status, date, now),
        home_full_name: record.home.as_ref().and_then(|c| c.team.display_name.clone()),
        away_full_name: record.away.as_ref().and_then(|c| c.team.display_name.clone()),
    }
}

fn short_name(competitor: Option<&CompetitorRecord>) -> String {
    competitor
        .and_then(|c| {
            c.team
                .short_display_name
                .clone()
                .or_else(|| c.team.display_name.clone())
                .or_else(|| c.team.name.clone())
        })
        .unwrap_or_else(|| "TBD".to_string())
}

/// Keep the first game for each non-empty id; games without an id always pass.
pub fn dedupe_by_id(games: Vec<Game>) -> Vec<Game> {
    let mut seen = HashSet::new();
    games
        .into_iter()
        .filter(|game| game.id.is_empty() || seen.insert(game.id.clone()))
        .collect()
}

/// Presentation filter: drop finished and postponed games.
pub fn upcoming_only(games: &[Game]) -> Vec<Game> {
    games
        .iter()
        .filter(|game| !game.status.is_finished())
        .cloned()
        .collect()
}
