use crate::api::{DriveRecord, EventRecord, PeriodLine, TeamRecord};
use crate::error::FeedError;
use crate::models::{GameScore, GameState, League, PeriodScore, ScoreSource, TeamInfo};
use tracing::debug;

/// Regulation periods always materialized in `quarter_scores`
pub const REGULATION_PERIODS: usize = 4;

/// Provider status codes that mean the game is over
const FINISHED_CODES: [&str; 7] = [
    "STATUS_FINAL",
    "STATUS_FINAL_OVERTIME",
    "FT",
    "AOT",
    "AET",
    "FINAL",
    "F/OT",
];

/// Convert one provider record into the canonical score shape.
///
/// Fails only when the record has no home or away competitor; every other
/// missing field degrades to `None`, an empty string or `"unknown"`.
pub fn normalize_score(
    record: &EventRecord,
    event_id: &str,
    league: League,
    source: ScoreSource,
) -> Result<GameScore, FeedError> {
    let (home, away) = match (&record.home, &record.away) {
        (Some(home), Some(away)) => (home, away),
        _ => {
            debug!("Event {} has no home/away competitors", event_id);
            return Err(FeedError::NotFound);
        }
    };

    let home_team = team_info(&home.team);
    let away_team = team_info(&away.team);

    let home_totals = to_cumulative(&home.periods);
    let away_totals = to_cumulative(&away.periods);
    let quarter_scores = build_period_scores(
        &home_totals,
        &away_totals,
        &home_team.display_name,
        &away_team.display_name,
    );

    let status_complete = record.status.completed == Some(true)
        || record
            .status
            .code
            .as_deref()
            .is_some_and(is_finished_code);
    let completed_quarters = completed_quarters(&record.drives, &quarter_scores, status_complete);
    let completed = status_complete || completed_quarters as usize >= REGULATION_PERIODS;

    let game_state = record
        .status
        .state
        .as_deref()
        .map(GameState::from_state_str)
        .unwrap_or(GameState::Unknown);

    debug!(
        "Normalized {} {} via {:?}: periods={}, completed_quarters={}, completed={}",
        league,
        event_id,
        source,
        quarter_scores.len(),
        completed_quarters,
        completed
    );

    Ok(GameScore {
        id: record.id.clone().unwrap_or_else(|| event_id.trim().to_string()),
        date: record.kickoff,
        league,
        source,
        full_team1: away_team.display_name.clone(),
        full_team2: home_team.display_name.clone(),
        team1_abbr: away.team.abbreviation.clone(),
        team2_abbr: home.team.abbreviation.clone(),
        home_team,
        away_team,
        quarter_scores,
        completed_quarters,
        completed,
        game_state,
    })
}

pub fn is_finished_code(code: &str) -> bool {
    let code = code.trim().to_ascii_uppercase();
    FINISHED_CODES.contains(&code.as_str())
}

fn team_info(team: &TeamRecord) -> TeamInfo {
    let display_name = team
        .display_name
        .clone()
        .or_else(|| team.short_display_name.clone())
        .or_else(|| team.name.clone())
        .unwrap_or_default();

    TeamInfo {
        name: team.name.clone().unwrap_or_else(|| display_name.clone()),
        location: team.location.clone(),
        display_name,
        short_display_name: team.short_display_name.clone(),
        abbreviation: team.abbreviation.clone().unwrap_or_default(),
        logo: team.logo.clone(),
    }
}

/// Reduce a period line to running totals.
///
/// A total stays `None` until the first period with a value; after that,
/// unset periods carry the previous total forward. Negative points are
/// treated as zero so totals never decrease.
pub fn to_cumulative(line: &PeriodLine) -> Vec<Option<i64>> {
    let mut total: Option<i64> = None;
    match line {
        PeriodLine::Deltas(points) => points
            .iter()
            .map(|p| {
                total = match (total, p) {
                    (None, None) => None,
                    (t, p) => Some(t.unwrap_or(0) + p.unwrap_or(0).max(0)),
                };
                total
            })
            .collect(),
        PeriodLine::Cumulative(totals) => totals
            .iter()
            .map(|t| {
                total = match (total, t) {
                    (prev, None) => prev,
                    (None, Some(t)) => Some((*t).max(0)),
                    (Some(prev), Some(t)) => Some(prev.max(*t)),
                };
                total
            })
            .collect(),
    }
}

pub fn period_label(index: usize) -> String {
    match index {
        0..=3 => format!("Q{}", index + 1),
        4 => "OT".to_string(),
        n => format!("OT{}", n - 3),
    }
}

/// One entry per period up to `max(home, away, 4)`; periods past the end of
/// a side's line are `None` for that side.
pub fn build_period_scores(
    home: &[Option<i64>],
    away: &[Option<i64>],
    home_name: &str,
    away_name: &str,
) -> Vec<PeriodScore> {
    let periods = home.len().max(away.len()).max(REGULATION_PERIODS);

    (0..periods)
        .map(|i| {
            let home_total = home.get(i).copied().flatten();
            let away_total = away.get(i).copied().flatten();
            PeriodScore {
                quarter: period_label(i),
                home: home_total,
                away: away_total,
                winner: leader(home_total, away_total, home_name, away_name),
            }
        })
        .collect()
}

fn leader(home: Option<i64>, away: Option<i64>, home_name: &str, away_name: &str) -> Option<String> {
    let name = match (home, away) {
        (Some(h), Some(a)) if h > a => home_name,
        (Some(h), Some(a)) if a > h => away_name,
        (Some(_), None) => home_name,
        (None, Some(_)) => away_name,
        _ => return None,
    };
    Some(name.to_string()).filter(|n| !n.is_empty())
}

/// Count completed periods.
///
/// With drive data, a period is complete once a drive ends in a later period
/// or a drive inside it ends at `0:00`. Without drives, a game the provider
/// marks complete counts every period with both totals known.
pub fn completed_quarters(
    drives: &[DriveRecord],
    periods: &[PeriodScore],
    status_complete: bool,
) -> u32 {
    if drives.is_empty() {
        if !status_complete {
            return 0;
        }
        return periods
            .iter()
            .filter(|p| p.home.is_some() && p.away.is_some())
            .count() as u32;
    }

    drives.iter().fold(0, |completed, drive| {
        let Some(period) = drive.end_period else {
            return completed;
        };
        let mut completed = completed.max(period.saturating_sub(1));
        if drive.end_clock.as_deref().map(str::trim) == Some("0:00") {
            completed = completed.max(period);
        }
        completed
    })
}
