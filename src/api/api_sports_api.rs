use super::lenient;
use super::records::{
    CompetitorRecord, EventRecord, PeriodLine, Provider, StatusRecord, TeamRecord,
};
use super::{get_json, parse_kickoff, UpstreamClient};
use crate::error::UpstreamError;
use crate::models::League;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub const API_SPORTS_BASE_URL: &str = "https://v1.american-football.api-sports.io";

/// Response envelope from the sports-data API
#[derive(Debug, Deserialize, Default)]
pub struct GamesResponse {
    /// Object or array of error messages; empty on success
    #[serde(default)]
    pub errors: Value,
    #[serde(default, deserialize_with = "lenient::vec_of")]
    pub response: Vec<ApiSportsGame>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiSportsGame {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub game: Option<GameInfo>,
    /// Older payloads nest the same block under `fixture`
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub fixture: Option<GameInfo>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub league: Option<LeagueRef>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub teams: Teams,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub scores: Scores,
}

#[derive(Debug, Deserialize, Default)]
pub struct LeagueRef {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct GameInfo {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub date: GameDate,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub status: GameStatus,
}

#[derive(Debug, Deserialize, Default)]
pub struct GameDate {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub timestamp: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub time: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct GameStatus {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub short: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub long: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Teams {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub home: Option<ApiSportsTeam>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub away: Option<ApiSportsTeam>,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiSportsTeam {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub logo: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct Scores {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub home: TeamScores,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub away: TeamScores,
}

#[derive(Debug, Deserialize, Default)]
pub struct TeamScores {
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub quarter_1: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub quarter_2: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub quarter_3: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub quarter_4: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub overtime: Option<i64>,
    #[serde(default, deserialize_with = "lenient::opt_i64")]
    pub total: Option<i64>,
}

pub struct ApiSportsClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ApiSportsClient {
    pub fn new(base_url: impl Into<String>, api_key: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Fetch all games for `league` on `date`
    pub async fn fetch_games(
        &self,
        date: NaiveDate,
        league: League,
    ) -> Result<Vec<EventRecord>, UpstreamError> {
        let url = format!("{}/games", self.base_url);
        let day = date.format("%Y-%m-%d").to_string();
        let league_id = league.api_sports_id().to_string();

        let request = self
            .client
            .get(&url)
            .header("x-apisports-key", &self.api_key)
            .query(&[("date", day.as_str()), ("league", league_id.as_str())]);
        let response: GamesResponse = match get_json(request, &url).await {
            Ok(response) => response,
            Err(e) if e.is_not_found() => {
                debug!("No {} games listed for {} ({})", league, day, e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };
        check_errors(&response, &url)?;

        debug!(
            "API-Sports returned {} {} games for {}",
            response.response.len(),
            league,
            day
        );
        if response.response.is_empty() {
            warn!("No {} games found for {}", league, day);
        }

        Ok(response.response.iter().map(game_to_record).collect())
    }

    /// Fetch a single game by id
    pub async fn fetch_game(&self, game_id: &str) -> Result<EventRecord, UpstreamError> {
        let url = format!("{}/games", self.base_url);
        let request = self
            .client
            .get(&url)
            .header("x-apisports-key", &self.api_key)
            .query(&[("id", game_id.trim())]);
        let response: GamesResponse = get_json(request, &url).await?;
        check_errors(&response, &url)?;

        response
            .response
            .iter()
            .map(game_to_record)
            .find(|record| record.has_id(game_id))
            .ok_or_else(|| UpstreamError::not_found(format!("{}?id={}", url, game_id.trim())))
    }
}

#[async_trait]
impl UpstreamClient for ApiSportsClient {
    fn provider(&self) -> Provider {
        Provider::ApiSports
    }

    async fn scoreboard(
        &self,
        date: NaiveDate,
        league: League,
    ) -> Result<Vec<EventRecord>, UpstreamError> {
        self.fetch_games(date, league).await
    }

    /// Ids are global across leagues; a game from another league counts as
    /// not found so the caller moves on to that league's attempt.
    async fn summary(&self, event_id: &str, league: League) -> Result<EventRecord, UpstreamError> {
        let record = self.fetch_game(event_id).await?;
        if !record.belongs_to(league) {
            debug!("Game {} is not a {} game", event_id, league);
            return Err(UpstreamError::not_found(format!(
                "{}/games?id={}&league={}",
                self.base_url,
                event_id.trim(),
                league.api_sports_id()
            )));
        }
        Ok(record)
    }
}

/// The provider reports quota and key problems in a 200 body.
fn check_errors(response: &GamesResponse, url: &str) -> Result<(), UpstreamError> {
    let has_errors = match &response.errors {
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => false,
    };
    if has_errors {
        return Err(UpstreamError::Rejected {
            url: url.to_string(),
            message: response.errors.to_string(),
        });
    }
    Ok(())
}

pub fn game_to_record(game: &ApiSportsGame) -> EventRecord {
    let info = game.game.as_ref().or(game.fixture.as_ref());

    let id = game
        .game
        .as_ref()
        .and_then(|g| g.id.clone())
        .or_else(|| game.fixture.as_ref().and_then(|f| f.id.clone()))
        .or_else(|| game.id.clone());

    let kickoff = info.and_then(|g| kickoff_from(&g.date));

    let status_code = game
        .game
        .as_ref()
        .and_then(|g| g.status.short.clone())
        .or_else(|| game.fixture.as_ref().and_then(|f| f.status.short.clone()))
        .or_else(|| game.game.as_ref().and_then(|g| g.status.long.clone()));

    EventRecord {
        provider: Provider::ApiSports,
        id,
        league: game
            .league
            .as_ref()
            .and_then(|l| l.id)
            .and_then(League::from_api_sports_id),
        kickoff,
        status: StatusRecord {
            code: status_code,
            detail: info.and_then(|g| g.status.long.clone()),
            state: None,
            completed: None,
        },
        home: game
            .teams
            .home
            .as_ref()
            .map(|team| competitor(team, &game.scores.home)),
        away: game
            .teams
            .away
            .as_ref()
            .map(|team| competitor(team, &game.scores.away)),
        drives: Vec::new(),
    }
}

fn kickoff_from(date: &GameDate) -> Option<DateTime<Utc>> {
    if let Some(ts) = date.timestamp {
        if let Some(dt) = DateTime::from_timestamp(ts, 0) {
            return Some(dt);
        }
    }
    let day = date.date.as_deref()?;
    let time = date.time.as_deref().unwrap_or("00:00");
    parse_kickoff(&format!("{}T{}Z", day, time))
}

fn competitor(team: &ApiSportsTeam, scores: &TeamScores) -> CompetitorRecord {
    let name = team.name.clone().unwrap_or_else(|| "TBD".to_string());
    CompetitorRecord {
        team: TeamRecord {
            name: Some(name.clone()),
            location: None,
            display_name: Some(name.clone()),
            short_display_name: Some(name),
            abbreviation: None,
            logo: team.logo.clone(),
        },
        periods: PeriodLine::Deltas(quarter_line(scores)),
    }
}

/// Quarter points in order; unplayed trailing periods are dropped.
fn quarter_line(scores: &TeamScores) -> Vec<Option<i64>> {
    let mut line = vec![
        scores.quarter_1,
        scores.quarter_2,
        scores.quarter_3,
        scores.quarter_4,
        scores.overtime,
    ];
    while matches!(line.last(), Some(None)) {
        line.pop();
    }
    line
}
