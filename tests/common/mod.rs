#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use football_feed::api::{
    CompetitorRecord, EventRecord, PeriodLine, Provider, StatusRecord, TeamRecord,
};
use football_feed::{League, UpstreamClient, UpstreamError};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Scripted upstream that counts calls per `(method, league)`.
#[derive(Default)]
pub struct FakeUpstream {
    boards: HashMap<(League, NaiveDate), Vec<EventRecord>>,
    summaries: HashMap<(League, String), EventRecord>,
    broken_leagues: HashSet<League>,
    calls: Mutex<HashMap<(&'static str, League), usize>>,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_board(mut self, league: League, day: NaiveDate, records: Vec<EventRecord>) -> Self {
        self.boards.insert((league, day), records);
        self
    }

    pub fn with_summary(mut self, league: League, record: EventRecord) -> Self {
        let id = record.id.clone().unwrap_or_default();
        self.summaries.insert((league, id), record);
        self
    }

    /// Every call for `league` fails with a 503
    pub fn broken(mut self, league: League) -> Self {
        self.broken_leagues.insert(league);
        self
    }

    pub fn calls(&self, method: &str, league: League) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|((m, l), _)| *m == method && *l == league)
            .map(|(_, count)| *count)
            .sum()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    fn count(&self, method: &'static str, league: League) {
        *self.calls.lock().unwrap().entry((method, league)).or_default() += 1;
    }

    fn check(&self, league: League) -> Result<(), UpstreamError> {
        if self.broken_leagues.contains(&league) {
            return Err(UpstreamError::Status {
                status: 503,
                url: format!("http://fake/{}", league),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl UpstreamClient for FakeUpstream {
    fn provider(&self) -> Provider {
        Provider::Espn
    }

    async fn scoreboard(
        &self,
        date: NaiveDate,
        league: League,
    ) -> Result<Vec<EventRecord>, UpstreamError> {
        self.count("scoreboard", league);
        self.check(league)?;
        Ok(self.boards.get(&(league, date)).cloned().unwrap_or_default())
    }

    async fn summary(&self, event_id: &str, league: League) -> Result<EventRecord, UpstreamError> {
        self.count("summary", league);
        self.check(league)?;
        self.summaries
            .get(&(league, event_id.to_string()))
            .cloned()
            .ok_or_else(|| UpstreamError::not_found(format!("http://fake/{}/summary", league)))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn team(short: &str, full: &str, abbr: &str) -> TeamRecord {
    TeamRecord {
        name: short.split(' ').last().map(str::to_string),
        location: None,
        display_name: Some(full.to_string()),
        short_display_name: Some(short.to_string()),
        abbreviation: Some(abbr.to_string()),
        logo: Some(format!("https://a.espncdn.com/i/teamlogos/{}.png", abbr.to_lowercase())),
    }
}

/// A scoreboard entry with a status code and kickoff
pub fn event(id: &str, kickoff: DateTime<Utc>, code: &str) -> EventRecord {
    EventRecord {
        id: Some(id.to_string()),
        kickoff: Some(kickoff),
        status: StatusRecord {
            code: Some(code.to_string()),
            ..Default::default()
        },
        home: Some(CompetitorRecord {
            team: team("Chiefs", "Kansas City Chiefs", "KC"),
            ..Default::default()
        }),
        away: Some(CompetitorRecord {
            team: team("Ravens", "Baltimore Ravens", "BAL"),
            ..Default::default()
        }),
        ..EventRecord::new(Provider::Espn)
    }
}

/// A finished game with per-quarter deltas for both sides
pub fn scored_event(id: &str, home: &[i64], away: &[i64]) -> EventRecord {
    let mut record = event(id, at(2024, 9, 7, 19), "STATUS_FINAL");
    record.status.state = Some("post".to_string());
    record.status.completed = Some(true);
    if let Some(c) = record.home.as_mut() {
        c.team = team("Tigers", "LSU Tigers", "LSU");
        c.periods = PeriodLine::Deltas(home.iter().copied().map(Some).collect());
    }
    if let Some(c) = record.away.as_mut() {
        c.team = team("Trojans", "USC Trojans", "USC");
        c.periods = PeriodLine::Deltas(away.iter().copied().map(Some).collect());
    }
    record
}
